use tracing::warn;

use crate::ir::Script;

use super::{EncoderHelper, Endian, JUMP_ENTRY_NAME_SIZE};

/// Serializes the jump table header followed by the instruction stream.
pub fn encode_script(script: &Script, endian: Endian) -> Vec<u8> {
    let mut vec = Vec::new();

    vec.push_u32(script.jump_table.len() as u32, endian);

    for entry in &script.jump_table {
        let name = entry.name.as_bytes();

        if name.len() >= JUMP_ENTRY_NAME_SIZE {
            warn!("jump table name '{0}' truncated", entry.name);
        }

        /* keep the terminating NUL */
        let name = &name[..name.len().min(JUMP_ENTRY_NAME_SIZE - 1)];

        vec.push_padded(name, JUMP_ENTRY_NAME_SIZE);
        vec.push_u32(entry.offset, endian);
    }

    vec.extend_from_slice(&script.code);

    vec
}
