/// Size of the NUL-padded name field of a jump-table record.
pub const JUMP_ENTRY_NAME_SIZE: usize = 32;

/// Name plus u32 offset.
pub const JUMP_ENTRY_SIZE: usize = JUMP_ENTRY_NAME_SIZE + 4;

/// Operand tags.
pub const OPERAND_TAG_CONST: u32 = 0;
pub const OPERAND_TAG_VAR: u32 = 2;

/// Byte order of every multi-byte field of a script binary, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

impl Default for Endian {
    fn default() -> Self {
        Self::native()
    }
}

pub(crate) trait EncoderHelper {
    fn push_u8(&mut self, val: u8);

    fn push_u32(&mut self, val: u32, endian: Endian) {
        match endian {
            Endian::Little => {
                self.push_u8((val & 0x000000FF) as u8);
                self.push_u8(((val & 0x0000FF00) >> 8) as u8);
                self.push_u8(((val & 0x00FF0000) >> 16) as u8);
                self.push_u8(((val & 0xFF000000) >> 24) as u8);
            }

            Endian::Big => {
                self.push_u8(((val & 0xFF000000) >> 24) as u8);
                self.push_u8(((val & 0x00FF0000) >> 16) as u8);
                self.push_u8(((val & 0x0000FF00) >> 8) as u8);
                self.push_u8((val & 0x000000FF) as u8);
            }
        }
    }

    fn push_i32(&mut self, val: i32, endian: Endian) {
        self.push_u32(val as u32, endian);
    }

    /// Writes `bytes` followed by zeros up to `len` bytes in total.
    fn push_padded(&mut self, bytes: &[u8], len: usize) {
        for i in 0..len {
            self.push_u8(bytes.get(i).copied().unwrap_or(0));
        }
    }
}

impl EncoderHelper for Vec<u8> {
    fn push_u8(&mut self, val: u8) {
        self.push(val);
    }
}

mod decoder;
mod encoder;

pub use decoder::{decode_script, CodeReader, DecodeError};
pub use encoder::encode_script;
