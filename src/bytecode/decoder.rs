use thiserror::Error;

use crate::ir::{JumpEntry, Script};

use super::{Endian, JUMP_ENTRY_NAME_SIZE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of data at offset 0x{offset:X} (needed {needed} bytes, {available} left)")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Cursor over a script binary.
#[derive(Debug, Clone)]
pub struct CodeReader<'a> {
    data: &'a [u8],
    offset: usize,
    endian: Endian,
}

impl<'a> CodeReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            offset: 0,
            endian,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }

        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;

        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let buf = self.read_bytes(4)?;

        Ok(match self.endian {
            Endian::Little => {
                (buf[0] as u32)
                    | ((buf[1] as u32) << 8)
                    | ((buf[2] as u32) << 16)
                    | ((buf[3] as u32) << 24)
            }

            Endian::Big => {
                ((buf[0] as u32) << 24)
                    | ((buf[1] as u32) << 16)
                    | ((buf[2] as u32) << 8)
                    | (buf[3] as u32)
            }
        })
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_u32().map(|val| val as i32)
    }
}

/// Splits a script binary into its jump table and instruction stream.
pub fn decode_script(data: &[u8], endian: Endian) -> Result<Script, DecodeError> {
    let mut reader = CodeReader::new(data, endian);

    let count = reader.read_u32()? as usize;
    let mut jump_table = Vec::new();

    for _ in 0..count {
        let raw_name = reader.read_bytes(JUMP_ENTRY_NAME_SIZE)?;
        let offset = reader.read_u32()?;

        let end = raw_name.iter().position(|b| *b == 0).unwrap_or(raw_name.len());
        let name = String::from_utf8_lossy(&raw_name[..end]).into_owned();

        jump_table.push(JumpEntry::new(name, offset));
    }

    let code = reader.read_bytes(reader.remaining())?.to_vec();

    Ok(Script::new(jump_table, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader() {
        let data = [1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 7];
        let mut reader = CodeReader::new(&data, Endian::Little);

        assert_eq!(reader.read_u32(), Ok(1));
        assert_eq!(reader.read_i32(), Ok(-1));
        assert_eq!(reader.offset(), 8);
        assert!(!reader.is_at_end());

        assert_eq!(
            reader.read_u32(),
            Err(DecodeError::Truncated {
                offset: 8,
                needed: 4,
                available: 1
            })
        );

        reader.skip(1).unwrap();
        assert!(reader.is_at_end());
    }
}
