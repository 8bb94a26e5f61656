//! FFI surface of regions and their auxiliary objects. Maps handed out
//! here (tags, block entities, pending ticks) are borrowed views bound to
//! the lifetime of their parent handle.

use std::collections::BTreeMap;
use std::mem::swap;
use std::ptr::{null, null_mut};
use crate::block::Block;
use crate::block_entity::BlockEntity;
use crate::entity::Entity;
use crate::error::Error;
use crate::nbt::NbtCompound;
use crate::pending_tick::{PendingTick, PendingTickInfo};
use crate::region::Region;
use super::map::CMapRef;
use super::{error_to_box, CArrayView, CPosDouble, CPosInt, CStringView};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CPendingTickType {
    Fluid = 0,
    Block = 1,
}

/// Everything known about one voxel: palette index, block, and the
/// optional block entity / pending ticks at the same position.
#[repr(C)]
pub struct CRegionBlockInfo {
    pub block_index: u16,
    pub block: *const Block,
    pub block_entity: *mut BlockEntity,
    pub pending_ticks: CArrayView<PendingTick>,
}

impl Default for CRegionBlockInfo {
    fn default() -> Self {
        CRegionBlockInfo {
            block_index: u16::MAX,
            block: null(),
            block_entity: null_mut(),
            pending_ticks: CArrayView::empty(),
        }
    }
}

// ---- entity ----

#[no_mangle]
extern "C" fn MC_BRIDGE_create_entity() -> Box<Entity> {
    Box::new(Entity::new())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_entity(entity_box: *mut Option<Box<Entity>>) {
    if let Some(slot) = entity_box.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_entity(a: *mut Entity, b: *mut Entity) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_entity_get_pos(entity: *const Entity) -> CPosDouble {
    CPosDouble {
        pos: (*entity).position,
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_entity_get_block_pos(entity: *const Entity) -> CPosInt {
    CPosInt {
        pos: (*entity).block_pos,
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_entity_set_pos(entity: *mut Entity, pos: CPosDouble) {
    (*entity).position = pos.pos;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_entity_set_block_pos(entity: *mut Entity, pos: CPosInt) {
    (*entity).block_pos = pos.pos;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_entity_get_tags(entity: *const Entity) -> CMapRef {
    CMapRef::StrNbt(&(*entity).tags as *const NbtCompound as *mut NbtCompound)
}

// ---- block entity ----

#[no_mangle]
extern "C" fn MC_BRIDGE_create_block_entity() -> Box<BlockEntity> {
    Box::new(BlockEntity::new())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_block_entity(b: *mut Option<Box<BlockEntity>>) {
    if let Some(slot) = b.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_block_entity(a: *mut BlockEntity, b: *mut BlockEntity) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_entity_get_tags(block_entity: *const BlockEntity) -> CMapRef {
    CMapRef::StrNbt(&(*block_entity).tags as *const NbtCompound as *mut NbtCompound)
}

// ---- pending tick ----

#[no_mangle]
extern "C" fn MC_BRIDGE_create_pending_tick() -> Box<PendingTick> {
    Box::new(PendingTick::new())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_pending_tick(b: *mut Option<Box<PendingTick>>) {
    if let Some(slot) = b.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_pending_tick(a: *mut PendingTick, b: *mut PendingTick) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_get_priority(tick: *const PendingTick) -> i32 {
    (*tick).priority
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_set_priority(tick: *mut PendingTick, priority: i32) {
    (*tick).priority = priority;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_get_sub_tick(tick: *const PendingTick) -> i64 {
    (*tick).sub_tick
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_set_sub_tick(tick: *mut PendingTick, sub_tick: i64) {
    (*tick).sub_tick = sub_tick;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_get_time(tick: *const PendingTick) -> i32 {
    (*tick).time
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_set_time(tick: *mut PendingTick, time: i32) {
    (*tick).time = time;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_get_id(tick: *const PendingTick) -> CStringView {
    CStringView::from((*tick).id())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_get_type(tick: *const PendingTick) -> CPendingTickType {
    match &(*tick).info {
        PendingTickInfo::Fluid { .. } => CPendingTickType::Fluid,
        PendingTickInfo::Block { .. } => CPendingTickType::Block,
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_pending_tick_set_info(
    tick: *mut PendingTick,
    tick_type: CPendingTickType,
    id: CStringView,
) {
    (*tick).info = match tick_type {
        CPendingTickType::Fluid => PendingTickInfo::Fluid { id: id.to_string() },
        CPendingTickType::Block => PendingTickInfo::Block { id: id.to_string() },
    };
}

// ---- region ----

#[no_mangle]
extern "C" fn MC_BRIDGE_create_region() -> Box<Region> {
    Box::new(Region::new("", [0, 0, 0]))
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_region(b: *mut Option<Box<Region>>) {
    if let Some(slot) = b.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_region(a: *mut Region, b: *mut Region) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_name(region: *const Region) -> CStringView {
    CStringView::from(&(*region).name)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_set_name(region: *mut Region, name: CStringView) {
    (*region).name = name.to_string();
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_offset(region: *const Region) -> CPosInt {
    CPosInt {
        pos: (*region).offset,
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_set_offset(region: *mut Region, offset: CPosInt) {
    (*region).offset = offset.pos;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_shape(region: *const Region) -> CPosInt {
    CPosInt {
        pos: (*region).shape(),
    }
}

/// Reshaping discards the region's contents.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_reshape(region: *mut Region, new_shape: CPosInt) {
    (*region).reshape(new_shape.pos);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_palette(
    region: *const Region,
    len: *mut usize,
) -> *const Block {
    let palette = &(*region).palette;
    *len = palette.len();
    palette.as_ptr()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_set_palette(
    region: *mut Region,
    palette: *const *const Block,
    len: usize,
) {
    let mut new_palette = Vec::with_capacity(len);
    for idx in 0..len {
        new_palette.push((**palette.add(idx)).clone());
    }
    (*region).palette = new_palette;
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block_entities(region: *const Region) -> CMapRef {
    type M = BTreeMap<[i32; 3], BlockEntity>;
    CMapRef::PosBlockEntity(&(*region).block_entities as *const M as *mut M)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_pending_ticks(region: *const Region) -> CMapRef {
    type M = BTreeMap<[i32; 3], Vec<PendingTick>>;
    CMapRef::PosPendingTick(&(*region).pending_ticks as *const M as *mut M)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_entities(
    region: *const Region,
    len: *mut usize,
) -> *mut Entity {
    let region = &mut *(region as *mut Region);
    *len = region.entities.len();
    region.entities.as_mut_ptr()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_add_entity(region: *mut Region, entity: *const Entity) {
    (*region).entities.push((*entity).clone());
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block(
    region: *const Region,
    r_pos: CPosInt,
) -> *const Block {
    match (*region).block_at(r_pos.pos) {
        Some(block) => block as *const Block,
        None => null(),
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_set_block(
    region: *mut Region,
    r_pos: CPosInt,
    block: *const Block,
) -> bool {
    (*region).set_block(r_pos.pos, &*block).is_ok()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block_index(
    region: *const Region,
    r_pos: CPosInt,
    ok: *mut bool,
) -> u16 {
    match (*region).block_index_at(r_pos.pos) {
        Some(index) => {
            *ok = true;
            index
        }
        None => {
            *ok = false;
            u16::MAX
        }
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_set_block_index(
    region: *mut Region,
    r_pos: CPosInt,
    block_index: u16,
) -> bool {
    (*region).set_block_index(r_pos.pos, block_index).is_ok()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_volume(region: *const Region) -> u64 {
    (*region).volume()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_total_blocks(
    region: *const Region,
    include_air: bool,
) -> u64 {
    (*region).total_blocks(include_air)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block_index_of_air(
    region: *const Region,
    ok: *mut bool,
) -> u16 {
    match (*region).block_index_of_air() {
        Some(index) => {
            *ok = true;
            index
        }
        None => {
            *ok = false;
            u16::MAX
        }
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block_index_of_structure_void(
    region: *const Region,
    ok: *mut bool,
) -> u16 {
    match (*region).block_index_of_structure_void() {
        Some(index) => {
            *ok = true;
            index
        }
        None => {
            *ok = false;
            u16::MAX
        }
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_contains_coordinate(
    region: *const Region,
    r_pos: CPosInt,
) -> bool {
    (*region).contains_coord(r_pos.pos)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_get_block_info(
    region: *const Region,
    r_pos: CPosInt,
) -> CRegionBlockInfo {
    let region = &*region;
    match region.block_info_at(r_pos.pos) {
        Some((index, block, block_entity, ticks)) => CRegionBlockInfo {
            block_index: index,
            block: block as *const Block,
            block_entity: block_entity
                .map_or(null_mut(), |be| be as *const BlockEntity as *mut BlockEntity),
            pending_ticks: CArrayView::from_slice(ticks),
        },
        None => CRegionBlockInfo::default(),
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_region_shrink_palette(region: *mut Region) -> Option<Box<Error>> {
    error_to_box((*region).shrink_palette().err())
}
