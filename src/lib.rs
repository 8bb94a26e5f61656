mod block;
mod block_entity;
mod entity;
mod error;
mod ffi;
mod metadata;
mod nbt;
mod pending_tick;
mod print_utils;
mod region;
mod schematic;

// Public re-exports
pub use block::{parse_block_id, Block, BlockIdParseError};
pub use block_entity::BlockEntity;
pub use entity::Entity;
pub use error::Error;
pub use metadata::Metadata;
pub use nbt::{NbtCompound, NbtKind, NbtTag};
pub use pending_tick::{PendingTick, PendingTickInfo};
pub use print_utils::{format_block, format_region, format_schematic};
pub use region::Region;
pub use schematic::{JsonLoadOption, JsonSaveOption, Schematic};
