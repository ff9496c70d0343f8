use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use bbscript::{
    bytecode::Endian,
    compiler::{compile_string, parse_string, ScriptError},
    decompiler::{decompile_script, list_labels, DecompileError, DecompileOptions},
    pretty_print::PrettyCalls,
    registry::{ConfigError, InstructionSet},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum Error {
    #[error("Configuration Error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Script Error: {0}")]
    ScriptError(#[from] ScriptError),

    #[error("Decompile Error: {0}")]
    DecompileError(#[from] DecompileError),

    #[error("IO Error: {0}")]
    IoError(#[from] io::Error),

    #[error("Refusing to overwrite the input file {0}")]
    OutputIsInput(PathBuf),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndianArg {
    Little,
    Big,
}

impl From<EndianArg> for Endian {
    fn from(value: EndianArg) -> Self {
        match value {
            EndianArg::Little => Endian::Little,
            EndianArg::Big => Endian::Big,
        }
    }
}

#[derive(Debug, Args)]
struct FileArgs {
    /// Instruction set configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Byte order of the binary, defaults to the host's
    #[arg(short, long, value_enum)]
    endian: Option<EndianArg>,
}

impl FileArgs {
    fn endian(&self) -> Endian {
        self.endian.map(Endian::from).unwrap_or_default()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a script into a binary
    Compile(FileArgs),

    /// Turn a binary back into a script
    Decompile {
        #[command(flatten)]
        files: FileArgs,

        /// Render undefined opcodes as Unknown<id>() instead of failing
        #[arg(long)]
        permissive: bool,
    },

    /// List the jump table of a binary
    Labels {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        endian: Option<EndianArg>,
    },

    /// Print the parsed form of a script
    Parse {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Debug, Parser)]
#[command(name = "bbscript")]
#[command(about = "Compile and decompile BBScript bytecode", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), Error> {
    match output {
        Some(path) => {
            fs::write(path, bytes)?;
            info!("wrote {0} bytes to {1}", bytes.len(), path.display());
        }

        None => io::stdout().write_all(bytes)?,
    }

    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Where compiled bytes go: `output` if given, else `input` with a `.bin` extension.
fn compile_output(input: &Path, output: Option<&Path>) -> Result<PathBuf, Error> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("bin"),
    };

    if same_file(input, &path) {
        return Err(Error::OutputIsInput(path));
    }

    Ok(path)
}

fn main_error() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile(files) => {
            let set = InstructionSet::load(&files.config)?;
            let code = fs::read_to_string(&files.input)?;

            let output = compile_output(&files.input, files.output.as_deref())?;
            let bytes = compile_string(&code, &set, files.endian())?;

            write_output(Some(&output), &bytes)
        }

        Command::Decompile { files, permissive } => {
            let set = InstructionSet::load(&files.config)?;
            let data = fs::read(&files.input)?;

            let options = DecompileOptions {
                endian: files.endian(),
                permissive,
            };

            if let Some(output) = &files.output {
                if same_file(&files.input, output) {
                    return Err(Error::OutputIsInput(output.clone()));
                }
            }

            let text = decompile_script(&data, &set, &options)?;

            write_output(files.output.as_deref(), text.as_bytes())
        }

        Command::Labels { input, endian } => {
            let data = fs::read(input)?;
            let text = list_labels(&data, endian.map(Endian::from).unwrap_or_default())?;

            write_output(None, text.as_bytes())
        }

        Command::Parse { input } => {
            let code = fs::read_to_string(input)?;
            let calls = parse_string(&code)?;

            write_output(None, PrettyCalls::new(&calls).to_string().as_bytes())
        }
    }
}

fn main() -> Result<(), ()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bbscript=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match main_error() {
        Ok(_) => Ok(()),

        Err(err) => {
            eprintln!("{0}", err);
            Err(())
        }
    }
}
