use serde::{Deserialize, Serialize};
use crate::nbt::{NbtCompound, NbtTag};

/// A mobile entity captured in a region: zombie, minecart, item frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Arbitrary NBT tags of the entity.
    pub tags: NbtCompound,
    /// Position in double precision.
    pub position: [f64; 3],
    /// Position rounded to the containing block.
    pub block_pos: [i32; 3],
}

impl Entity {
    pub fn new() -> Entity {
        Entity {
            tags: NbtCompound::new(),
            position: [0.0; 3],
            block_pos: [0; 3],
        }
    }

    pub fn with_tag(mut self, key: &str, value: NbtTag) -> Entity {
        self.tags.insert(key.to_string(), value);
        self
    }

    /// Shift both position representations by a block offset.
    pub fn pos_shift(&mut self, adder: [i32; 3]) {
        for dim in 0..3 {
            self.block_pos[dim] += adder[dim];
            self.position[dim] += adder[dim] as f64;
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation_and_shift() {
        let mut entity = Entity::new().with_tag("id", NbtTag::from("minecraft:creeper"));
        entity.position = [0.5, 64.0, 0.5];
        entity.block_pos = [0, 64, 0];

        entity.pos_shift([2, -1, 0]);
        assert_eq!(entity.block_pos, [2, 63, 0]);
        assert_eq!(entity.position, [2.5, 63.0, 0.5]);
        assert_eq!(entity.tags["id"].as_str().unwrap(), "minecraft:creeper");
    }
}
