use serde::{Deserialize, Serialize};
use crate::nbt::{NbtCompound, NbtTag};

/// A block entity (tile entity): chest, furnace, sign. Its position is the
/// key of the region map that owns it, so the object itself only carries
/// tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockEntity {
    pub tags: NbtCompound,
}

impl BlockEntity {
    pub fn new() -> BlockEntity {
        BlockEntity {
            tags: NbtCompound::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: NbtTag) -> BlockEntity {
        self.tags.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::NbtKind;

    #[test]
    fn test_block_entity_tags() {
        let chest = BlockEntity::new()
            .with_tag("id", NbtTag::from("minecraft:chest"))
            .with_tag("Items", NbtTag::from(Vec::<NbtTag>::new()));

        assert_eq!(chest.tags.len(), 2);
        assert_eq!(chest.tags["Items"].kind(), NbtKind::List);
    }
}
