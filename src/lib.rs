pub mod ast;
pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod decompiler;
pub mod ir;
pub mod pretty_print;
pub mod registry;
