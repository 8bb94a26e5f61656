use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::block::Block;
use crate::error::Error;
use crate::metadata::Metadata;
use crate::region::Region;

/// A saved capture of one or more regions, plus metadata. This is the root
/// owning object handed across the boundary; format codecs produce and
/// consume it through reader/writer adapters.
#[derive(Clone, Serialize, Deserialize)]
pub struct Schematic {
    pub metadata: Metadata,
    pub regions: Vec<Region>,
}

/// Options for the JSON debug dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSaveOption {
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoadOption {}

impl Schematic {
    pub fn new() -> Schematic {
        Schematic {
            metadata: Metadata::default(),
            regions: Vec::new(),
        }
    }

    pub fn named(name: &str) -> Schematic {
        Schematic {
            metadata: Metadata::named(name),
            regions: Vec::new(),
        }
    }

    pub fn volume(&self) -> u64 {
        self.regions.iter().map(|region| region.volume()).sum()
    }

    pub fn total_blocks(&self, include_air: bool) -> u64 {
        self.regions
            .iter()
            .map(|region| region.total_blocks(include_air))
            .sum()
    }

    /// Look a block up by global position, first matching region wins.
    pub fn block_at(&self, g_pos: [i32; 3]) -> Option<&Block> {
        self.regions
            .iter()
            .find_map(|region| region.block_at(region.global_pos_to_relative(g_pos)))
    }

    pub fn get_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Dump the whole object graph as JSON. This is a debug facility, not
    /// one of the schematic interchange formats.
    pub fn save_json<W: Write>(&self, writer: &mut W, option: &JsonSaveOption) -> Result<(), Error> {
        if option.pretty {
            serde_json::to_writer_pretty(&mut *writer, self)?;
        } else {
            serde_json::to_writer(&mut *writer, self)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load_json<R: Read>(reader: &mut R, _option: &JsonLoadOption) -> Result<Schematic, Error> {
        let schematic: Schematic = serde_json::from_reader(reader)?;
        debug!(
            "loaded schematic \"{}\" with {} region(s)",
            schematic.metadata.name,
            schematic.regions.len()
        );
        Ok(schematic)
    }

    pub fn save_json_file<P: AsRef<Path>>(
        &self,
        path: P,
        option: &JsonSaveOption,
    ) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save_json(&mut writer, option)
    }

    pub fn load_json_file<P: AsRef<Path>>(
        path: P,
        option: &JsonLoadOption,
    ) -> Result<Schematic, Error> {
        let mut reader = BufReader::new(File::open(path)?);
        Schematic::load_json(&mut reader, option)
    }
}

impl Default for Schematic {
    fn default() -> Self {
        Schematic::new()
    }
}

impl std::fmt::Debug for Schematic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schematic")
            .field("metadata", &self.metadata)
            .field(
                "regions",
                &self
                    .regions
                    .iter()
                    .map(|region| region.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schematic() -> Schematic {
        let mut schematic = Schematic::named("Test Schematic");
        let mut region = Region::new("Main", [2, 2, 2]);
        let stone = Block::from_id("minecraft:stone").unwrap();
        let wire = Block::from_id("minecraft:redstone_wire[north=side,south=none]").unwrap();
        region.set_block([0, 0, 0], &stone).unwrap();
        region.set_block([1, 1, 1], &wire).unwrap();
        schematic.regions.push(region);
        schematic
    }

    #[test]
    fn test_block_lookup_across_regions() {
        let mut schematic = sample_schematic();
        schematic.regions[0].offset = [10, 0, 0];
        let stone = Block::from_id("minecraft:stone").unwrap();
        assert_eq!(schematic.block_at([10, 0, 0]), Some(&stone));
        assert_eq!(schematic.block_at([0, 0, 0]), None);
    }

    #[test]
    fn test_json_round_trip() {
        let schematic = sample_schematic();
        let mut buffer = Vec::new();
        schematic
            .save_json(&mut buffer, &JsonSaveOption::default())
            .unwrap();

        let restored = Schematic::load_json(&mut buffer.as_slice(), &JsonLoadOption {}).unwrap();
        assert_eq!(restored.metadata.name, "Test Schematic");
        assert_eq!(restored.regions.len(), 1);
        assert_eq!(
            restored.regions[0].block_at([1, 1, 1]),
            schematic.regions[0].block_at([1, 1, 1])
        );
        assert_eq!(restored.total_blocks(false), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_pos_maps() {
        use crate::block_entity::BlockEntity;
        use crate::nbt::NbtTag;

        let mut schematic = sample_schematic();
        schematic.regions[0].set_block_entity_at(
            [1, 1, 1],
            BlockEntity::new().with_tag("id", NbtTag::from("minecraft:chest")),
        );

        let json = schematic.get_json_string().unwrap();
        let restored: Schematic = serde_json::from_str(&json).unwrap();
        let be = restored.regions[0].block_entity_at([1, 1, 1]).unwrap();
        assert_eq!(be.tags["id"].as_str().unwrap(), "minecraft:chest");
    }

    #[test]
    fn test_broken_json_is_a_typed_error() {
        let err = Schematic::load_json(&mut &b"{ not json"[..], &JsonLoadOption {}).unwrap_err();
        assert!(matches!(err, Error::JsonCodec(_)));
    }
}
