use std::collections::BTreeMap;
use log::debug;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::block::Block;
use crate::block_entity::BlockEntity;
use crate::entity::Entity;
use crate::error::Error;
use crate::pending_tick::PendingTick;

/// A rectangular volume of blocks plus its entities, block entities and
/// pending ticks.
///
/// Blocks are stored as a palette of distinct block states and one `u16`
/// palette index per voxel. The index array is laid out x-fastest:
/// `(y * shape_z + z) * shape_x + x`. Coordinates passed to the accessors
/// are relative to the region; `offset` places it inside the schematic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub offset: [i32; 3],
    shape: [i32; 3],
    pub palette: Vec<Block>,
    indices: Vec<u16>,
    pub entities: Vec<Entity>,
    #[serde(
        serialize_with = "serialize_pos_map",
        deserialize_with = "deserialize_pos_map"
    )]
    pub block_entities: BTreeMap<[i32; 3], BlockEntity>,
    #[serde(
        serialize_with = "serialize_pos_map",
        deserialize_with = "deserialize_pos_map"
    )]
    pub pending_ticks: BTreeMap<[i32; 3], Vec<PendingTick>>,
}

// JSON object keys must be strings, so position keys cross serde as
// "x,y,z". Adapted to both directions so a dumped schematic restores.
fn serialize_pos_map<S, V>(map: &BTreeMap<[i32; 3], V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (pos, value) in map {
        out.serialize_entry(&format!("{},{},{}", pos[0], pos[1], pos[2]), value)?;
    }
    out.end()
}

fn deserialize_pos_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<[i32; 3], V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let mut parts = key.split(',');
        let mut pos = [0i32; 3];
        for slot in &mut pos {
            *slot = parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(|| D::Error::custom(format!("invalid position key \"{}\"", key)))?;
        }
        if parts.next().is_some() {
            return Err(D::Error::custom(format!("invalid position key \"{}\"", key)));
        }
        out.insert(pos, value);
    }
    Ok(out)
}

impl Region {
    /// Create a region filled with air. Palette index 0 is always air at
    /// creation.
    pub fn new(name: &str, shape: [i32; 3]) -> Region {
        let volume = Region::volume_of(shape);
        Region {
            name: name.to_string(),
            offset: [0; 3],
            shape,
            palette: vec![Block::air()],
            indices: vec![0; volume],
            entities: Vec::new(),
            block_entities: BTreeMap::new(),
            pending_ticks: BTreeMap::new(),
        }
    }

    fn volume_of(shape: [i32; 3]) -> usize {
        shape.iter().map(|&dim| dim.max(0) as usize).product()
    }

    pub fn shape(&self) -> [i32; 3] {
        self.shape
    }

    pub fn volume(&self) -> u64 {
        self.indices.len() as u64
    }

    pub fn contains_coord(&self, r_pos: [i32; 3]) -> bool {
        (0..3).all(|dim| r_pos[dim] >= 0 && r_pos[dim] < self.shape[dim])
    }

    fn index_of(&self, r_pos: [i32; 3]) -> Option<usize> {
        if !self.contains_coord(r_pos) {
            return None;
        }
        let [x, y, z] = r_pos.map(|v| v as usize);
        let [sx, _, sz] = self.shape.map(|v| v as usize);
        Some((y * sz + z) * sx + x)
    }

    pub fn block_index_at(&self, r_pos: [i32; 3]) -> Option<u16> {
        self.index_of(r_pos).map(|idx| self.indices[idx])
    }

    pub fn block_at(&self, r_pos: [i32; 3]) -> Option<&Block> {
        let idx = self.block_index_at(r_pos)?;
        self.palette.get(idx as usize)
    }

    pub fn block_entity_at(&self, r_pos: [i32; 3]) -> Option<&BlockEntity> {
        self.block_entities.get(&r_pos)
    }

    pub fn pending_ticks_at(&self, r_pos: [i32; 3]) -> &[PendingTick] {
        self.pending_ticks
            .get(&r_pos)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Block index, block, block entity and pending ticks at `r_pos`, or
    /// `None` when the position is outside the region.
    pub fn block_info_at(
        &self,
        r_pos: [i32; 3],
    ) -> Option<(u16, &Block, Option<&BlockEntity>, &[PendingTick])> {
        let index = self.block_index_at(r_pos)?;
        let block = self.palette.get(index as usize)?;
        Some((
            index,
            block,
            self.block_entity_at(r_pos),
            self.pending_ticks_at(r_pos),
        ))
    }

    /// Write a palette index directly. The index must refer to an existing
    /// palette entry.
    pub fn set_block_index(&mut self, r_pos: [i32; 3], block_index: u16) -> Result<(), Error> {
        if (block_index as usize) >= self.palette.len() {
            return Err(Error::BlockIndexOutOfRange {
                index: block_index,
                palette_size: self.palette.len(),
            });
        }
        let idx = self.index_of(r_pos).ok_or(Error::BlockPosOutOfRange {
            pos: r_pos,
            shape: self.shape,
        })?;
        self.indices[idx] = block_index;
        Ok(())
    }

    pub fn set_block(&mut self, r_pos: [i32; 3], block: &Block) -> Result<(), Error> {
        let block_index = self.find_or_append_to_palette(block)?;
        self.set_block_index(r_pos, block_index)
    }

    pub fn set_block_entity_at(
        &mut self,
        r_pos: [i32; 3],
        block_entity: BlockEntity,
    ) -> Option<BlockEntity> {
        self.block_entities.insert(r_pos, block_entity)
    }

    pub fn set_pending_ticks_at(
        &mut self,
        r_pos: [i32; 3],
        ticks: Vec<PendingTick>,
    ) -> Option<Vec<PendingTick>> {
        self.pending_ticks.insert(r_pos, ticks)
    }

    pub fn find_in_palette(&self, block: &Block) -> Option<u16> {
        self.palette.iter().position(|b| b == block).map(|idx| idx as u16)
    }

    pub fn find_or_append_to_palette(&mut self, block: &Block) -> Result<u16, Error> {
        if let Some(idx) = self.find_in_palette(block) {
            return Ok(idx);
        }
        if self.palette.len() > u16::MAX as usize {
            return Err(Error::PaletteTooLong(self.palette.len()));
        }
        self.palette.push(block.clone());
        Ok((self.palette.len() - 1) as u16)
    }

    pub fn block_index_of_air(&self) -> Option<u16> {
        self.palette
            .iter()
            .position(|b| b.is_air())
            .map(|idx| idx as u16)
    }

    pub fn block_index_of_structure_void(&self) -> Option<u16> {
        self.palette
            .iter()
            .position(|b| b.is_structure_void())
            .map(|idx| idx as u16)
    }

    /// Count the blocks in the region. Air is counted only when
    /// `include_air` is set; structure void is never counted.
    pub fn total_blocks(&self, include_air: bool) -> u64 {
        let counted: Vec<bool> = self
            .palette
            .iter()
            .map(|b| !b.is_structure_void() && (include_air || !b.is_air()))
            .collect();
        self.indices
            .iter()
            .filter(|&&idx| counted.get(idx as usize).copied().unwrap_or(false))
            .count() as u64
    }

    /// Resize the region. Contents are discarded; the region comes back
    /// filled with air and keeps its palette.
    pub fn reshape(&mut self, new_shape: [i32; 3]) {
        self.shape = new_shape;
        self.indices = vec![0; Region::volume_of(new_shape)];
        self.block_entities.clear();
        self.pending_ticks.clear();
    }

    pub fn fill_with(&mut self, block: &Block) -> Result<(), Error> {
        let block_index = self.find_or_append_to_palette(block)?;
        self.indices.fill(block_index);
        Ok(())
    }

    /// Drop unused and duplicate palette entries and remap the index
    /// array. Fails if the index array refers outside the palette.
    pub fn shrink_palette(&mut self) -> Result<(), Error> {
        let old_len = self.palette.len();
        let mut used = vec![false; old_len];
        for &idx in &self.indices {
            match used.get_mut(idx as usize) {
                Some(slot) => *slot = true,
                None => {
                    return Err(Error::BlockIndexOutOfRange {
                        index: idx,
                        palette_size: old_len,
                    });
                }
            }
        }

        let mut remap = vec![0u16; old_len];
        let mut new_palette: Vec<Block> = Vec::new();
        for (old_idx, block) in self.palette.iter().enumerate() {
            if !used[old_idx] {
                continue;
            }
            let new_idx = match new_palette.iter().position(|b| b == block) {
                Some(existing) => existing,
                None => {
                    new_palette.push(block.clone());
                    new_palette.len() - 1
                }
            };
            remap[old_idx] = new_idx as u16;
        }
        for idx in &mut self.indices {
            *idx = remap[*idx as usize];
        }
        debug!(
            "shrunk palette of region \"{}\" from {} to {} entries",
            self.name,
            old_len,
            new_palette.len()
        );
        self.palette = new_palette;
        Ok(())
    }

    pub fn global_pos_to_relative(&self, g_pos: [i32; 3]) -> [i32; 3] {
        [
            g_pos[0] - self.offset[0],
            g_pos[1] - self.offset[1],
            g_pos[2] - self.offset[2],
        ]
    }

    pub fn relative_pos_to_global(&self, r_pos: [i32; 3]) -> [i32; 3] {
        [
            r_pos[0] + self.offset[0],
            r_pos[1] + self.offset[1],
            r_pos[2] + self.offset[2],
        ]
    }
}
