use thiserror::Error;
use crate::block::BlockIdParseError;
use crate::nbt::NbtKind;

/// Engine-side failures surfaced to callers. Over the C boundary these
/// travel as opaque owning handles (null = no error) and are rendered to
/// text through the buffer-growth protocol.
#[derive(Debug, Error)]
pub enum Error {
    #[error("tag is of kind {found}, but {expected} was requested")]
    TagTypeMismatch { expected: NbtKind, found: NbtKind },

    #[error("invalid block id \"{id}\": {reason}")]
    InvalidBlockId {
        id: String,
        reason: BlockIdParseError,
    },

    #[error("block index {index} out of range, palette has {palette_size} entries")]
    BlockIndexOutOfRange { index: u16, palette_size: usize },

    #[error("position {pos:?} outside region of shape {shape:?}")]
    BlockPosOutOfRange { pos: [i32; 3], shape: [i32; 3] },

    #[error("palette has {0} entries, more than a u16 index can address")]
    PaletteTooLong(usize),

    #[error("json codec error: {0}")]
    JsonCodec(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = Error::TagTypeMismatch {
            expected: NbtKind::Byte,
            found: NbtKind::String,
        };
        let msg = err.to_string();
        assert!(msg.contains("Byte"));
        assert!(msg.contains("String"));

        let err = Error::BlockPosOutOfRange {
            pos: [4, 5, 6],
            shape: [2, 2, 2],
        };
        assert!(err.to_string().contains("[4, 5, 6]"));
    }
}
