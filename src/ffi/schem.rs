//! FFI surface of the schematic root object: metadata crosses in a
//! fixed 1024-byte struct, load/save options in fixed 512-byte structs,
//! so the boundary stays stable across independent compilations. The
//! schematic interchange codecs plug in through `CReader`/`CWriter` and
//! the load-result pair; the JSON dump/restore here exercises that
//! contract end to end without any interchange-format semantics.

use std::mem::swap;
use std::ptr::null_mut;
use static_assertions as sa;
use crate::error::Error;
use crate::metadata::Metadata;
use crate::region::Region;
use crate::schematic::{JsonLoadOption, JsonSaveOption, Schematic};
use super::{error_to_box, COption, CPosInt, CReader, CStringView, CWriter};

#[repr(C, align(1024))]
pub struct CMetadata {
    pub name: CStringView,
    pub author: CStringView,
    pub description: CStringView,
    pub time_created: i64,
    pub time_modified: i64,
    pub mc_version: i32,
    pub we_version: COption<i32>,
    pub origin: COption<CPosInt>,
}
sa::const_assert!(std::mem::size_of::<CMetadata>() == 1024);

impl CMetadata {
    /// Views in the result borrow from `src`; they live only as long as
    /// the schematic that owns the metadata.
    pub fn new(src: &Metadata) -> CMetadata {
        CMetadata {
            name: CStringView::from(&src.name),
            author: CStringView::from(&src.author),
            description: CStringView::from(&src.description),
            time_created: src.time_created,
            time_modified: src.time_modified,
            mc_version: src.mc_version,
            we_version: COption::from(src.we_version),
            origin: COption::from(src.origin.map(|pos| CPosInt { pos })),
        }
    }

    pub unsafe fn to_metadata(&self) -> Metadata {
        Metadata {
            name: self.name.to_string(),
            author: self.author.to_string(),
            description: self.description.to_string(),
            time_created: self.time_created,
            time_modified: self.time_modified,
            mc_version: self.mc_version,
            we_version: self.we_version.to_option(),
            origin: self.origin.to_option().map(|p| p.pos),
        }
    }
}

#[repr(C, align(512))]
pub struct CJsonSaveOption {
    pub pretty: bool,
}
sa::const_assert!(std::mem::size_of::<CJsonSaveOption>() == 512);

impl CJsonSaveOption {
    pub fn to_option(&self) -> JsonSaveOption {
        JsonSaveOption {
            pretty: self.pretty,
        }
    }

    pub fn from_option(src: &JsonSaveOption) -> CJsonSaveOption {
        CJsonSaveOption { pretty: src.pretty }
    }
}

#[repr(C, align(512))]
pub struct CJsonLoadOption {
    reserved: [u8; 512],
}
sa::const_assert!(std::mem::size_of::<CJsonLoadOption>() == 512);

impl CJsonLoadOption {
    pub fn to_option(&self) -> JsonLoadOption {
        JsonLoadOption {}
    }

    pub fn from_option(_src: &JsonLoadOption) -> CJsonLoadOption {
        CJsonLoadOption { reserved: [0; 512] }
    }
}

/// Either a schematic or an error; exactly one side is non-null.
#[repr(C)]
pub struct CSchemLoadResult {
    pub schematic: Option<Box<Schematic>>,
    pub error: Option<Box<Error>>,
}

impl From<Result<Schematic, Error>> for CSchemLoadResult {
    fn from(src: Result<Schematic, Error>) -> CSchemLoadResult {
        match src {
            Ok(schematic) => CSchemLoadResult {
                schematic: Some(Box::new(schematic)),
                error: None,
            },
            Err(error) => CSchemLoadResult {
                schematic: None,
                error: Some(Box::new(error)),
            },
        }
    }
}

#[no_mangle]
extern "C" fn MC_BRIDGE_create_schem() -> Box<Schematic> {
    Box::new(Schematic::new())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_schem(b: *mut Option<Box<Schematic>>) {
    if let Some(slot) = b.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_schem(a: *mut Schematic, b: *mut Schematic) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_get_metadata(schem: *const Schematic) -> CMetadata {
    CMetadata::new(&(*schem).metadata)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_set_metadata(schem: *mut Schematic, metadata: *const CMetadata) {
    (*schem).metadata = (*metadata).to_metadata();
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_get_region_count(schem: *const Schematic) -> usize {
    (*schem).regions.len()
}

/// Borrowed access to a region; null when the index is out of range.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_get_region(
    schem: *const Schematic,
    index: usize,
) -> *mut Region {
    let schem = &mut *(schem as *mut Schematic);
    match schem.regions.get_mut(index) {
        Some(region) => region as *mut Region,
        None => null_mut(),
    }
}

/// Move a region into the schematic. The caller's handle slot is taken
/// and left null; a null slot is a no-op.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_push_region(
    schem: *mut Schematic,
    region_box: *mut Option<Box<Region>>,
) {
    if let Some(slot) = region_box.as_mut() {
        if let Some(region) = slot.take() {
            (*schem).regions.push(*region);
        }
    }
}

/// Move a region out of the schematic; null when the index is out of
/// range. The caller owns the returned handle.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_take_region(
    schem: *mut Schematic,
    index: usize,
) -> Option<Box<Region>> {
    let schem = &mut *schem;
    if index >= schem.regions.len() {
        return None;
    }
    Some(Box::new(schem.regions.remove(index)))
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_get_volume(schem: *const Schematic) -> u64 {
    (*schem).volume()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_get_total_blocks(
    schem: *const Schematic,
    include_air: bool,
) -> u64 {
    (*schem).total_blocks(include_air)
}

// ---- json dump / restore ----

#[no_mangle]
extern "C" fn MC_BRIDGE_save_option_json_default() -> CJsonSaveOption {
    CJsonSaveOption::from_option(&JsonSaveOption::default())
}

#[no_mangle]
extern "C" fn MC_BRIDGE_load_option_json_default() -> CJsonLoadOption {
    CJsonLoadOption::from_option(&JsonLoadOption {})
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_save_json(
    schem: *const Schematic,
    mut dst: CWriter,
    option: *const CJsonSaveOption,
) -> Option<Box<Error>> {
    let option = (*option).to_option();
    error_to_box((*schem).save_json(&mut dst, &option).err())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_save_json_file(
    schem: *const Schematic,
    filename: CStringView,
    option: *const CJsonSaveOption,
) -> Option<Box<Error>> {
    let option = (*option).to_option();
    error_to_box((*schem).save_json_file(filename.to_str(), &option).err())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_load_json(
    mut src: CReader,
    option: *const CJsonLoadOption,
) -> CSchemLoadResult {
    let option = (*option).to_option();
    Schematic::load_json(&mut src, &option).into()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_load_json_file(
    filename: CStringView,
    option: *const CJsonLoadOption,
) -> CSchemLoadResult {
    let option = (*option).to_option();
    Schematic::load_json_file(filename.to_str(), &option).into()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_schem_load_json_bytes(
    bytes: *const u8,
    length: usize,
    option: *const CJsonLoadOption,
) -> CSchemLoadResult {
    let option = (*option).to_option();
    let mut bytes = &*std::ptr::slice_from_raw_parts(bytes, length);
    Schematic::load_json(&mut bytes, &option).into()
}
