//! FFI surface of the block type and the id parser. `parse_block` fills a
//! caller-owned block and reports the first violated parse rule;
//! `block_to_full_id` renders under the buffer-growth protocol.

use std::collections::BTreeMap;
use std::ffi::c_char;
use std::mem::swap;
use std::ptr::null_mut;
use crate::block::{Block, BlockIdParseError};
use super::map::CMapRef;
use super::{write_str_to_buffer, CStringView};

#[no_mangle]
extern "C" fn MC_BRIDGE_create_block() -> Box<Block> {
    Box::new(Block::empty())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_block(block_box: *mut Option<Box<Block>>) {
    if let Some(slot) = block_box.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_block(a: *mut Block, b: *mut Block) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_get_namespace(block: *const Block) -> CStringView {
    CStringView::from(&(*block).namespace)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_get_id(block: *const Block) -> CStringView {
    CStringView::from(&(*block).id)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_get_attributes(block: *const Block) -> CMapRef {
    type M = BTreeMap<String, String>;
    CMapRef::StrStr(&(*block).attributes as *const M as *mut M)
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_set_namespace(block: *mut Block, namespace: CStringView) {
    (*block).namespace = namespace.to_string();
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_set_id(block: *mut Block, id: CStringView) {
    (*block).id = id.to_string();
}

/// The source must be a string-string map; anything else is reported
/// through `ok` and leaves the block untouched.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_set_attributes(
    block: *mut Block,
    map: CMapRef,
    ok: *mut bool,
) {
    if let CMapRef::StrStr(map) = map {
        *ok = true;
        (*block).attributes = (*map).clone();
    } else {
        *ok = false;
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_parse_block(
    id: CStringView,
    block: *mut Block,
    error_nullable: *mut BlockIdParseError,
) -> bool {
    match Block::from_id(id.to_str()) {
        Ok(parsed) => {
            *block = parsed;
            true
        }
        Err(reason) => {
            if error_nullable != null_mut() {
                *error_nullable = reason;
            }
            false
        }
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_block_to_full_id(
    block: *const Block,
    dest: *mut c_char,
    capacity: usize,
    length: *mut usize,
) {
    let full_id = (*block).full_id();
    write_str_to_buffer(&full_id, dest, capacity, length);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_parse_error_to_string(
    error: BlockIdParseError,
    dest: *mut c_char,
    capacity: usize,
    length: *mut usize,
) {
    write_str_to_buffer(&error.to_string(), dest, capacity, length);
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use super::*;

    #[test]
    fn test_parse_and_render_through_ffi() {
        let mut block = MC_BRIDGE_create_block();
        let mut error = BlockIdParseError::TooManyColons;
        unsafe {
            let parsed = MC_BRIDGE_parse_block(
                CStringView::from("minecraft:redstone_wire[north=side,south=none]"),
                block.as_mut(),
                &mut error,
            );
            assert!(parsed);
            assert_eq!(MC_BRIDGE_block_get_id(block.as_ref()).to_str(), "redstone_wire");
            assert_eq!(MC_BRIDGE_block_get_namespace(block.as_ref()).to_str(), "minecraft");

            let mut required = 0usize;
            MC_BRIDGE_block_to_full_id(block.as_ref(), null_mut(), 0, &mut required);
            let mut buffer = vec![0 as c_char; required];
            MC_BRIDGE_block_to_full_id(block.as_ref(), buffer.as_mut_ptr(), buffer.len(), &mut required);
            let rendered = CStr::from_ptr(buffer.as_ptr()).to_str().unwrap();
            assert_eq!(rendered, "minecraft:redstone_wire[north=side,south=none]");
        }
    }

    #[test]
    fn test_parse_failure_reports_error_kind() {
        let mut block = MC_BRIDGE_create_block();
        let mut error = BlockIdParseError::TooManyColons;
        unsafe {
            let parsed = MC_BRIDGE_parse_block(CStringView::from("stone["), block.as_mut(), &mut error);
            assert!(!parsed);
            assert_eq!(error, BlockIdParseError::BracketsNotInPairs);

            // a null error slot is allowed
            let parsed = MC_BRIDGE_parse_block(CStringView::from("a:b:c"), block.as_mut(), null_mut());
            assert!(!parsed);
        }
    }

    #[test]
    fn test_attribute_map_is_borrowed_view() {
        let mut block = MC_BRIDGE_create_block();
        let mut error = BlockIdParseError::TooManyColons;
        unsafe {
            assert!(MC_BRIDGE_parse_block(
                CStringView::from("piston[facing=up]"),
                block.as_mut(),
                &mut error,
            ));
            let attrs = MC_BRIDGE_block_get_attributes(block.as_ref());
            if let CMapRef::StrStr(map) = attrs {
                (*map).insert("extended".to_string(), "true".to_string());
            } else {
                panic!("attributes must be a string-string map");
            }
            assert_eq!(block.attributes.len(), 2);
            assert_eq!(block.full_id(), "minecraft:piston[extended=true,facing=up]");
        }
    }

    #[test]
    fn test_release_block_is_idempotent() {
        let mut handle = Some(MC_BRIDGE_create_block());
        unsafe {
            MC_BRIDGE_release_block(&mut handle);
            assert!(handle.is_none());
            MC_BRIDGE_release_block(&mut handle);
        }
    }
}
