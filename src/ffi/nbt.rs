//! FFI accessors for the tagged NBT value. The enum discriminant is the
//! authoritative kind: a getter for the wrong kind reports `ok = false`
//! and a zero/empty payload, a setter always succeeds and overwrites the
//! tag's kind in place. Array, list and compound payloads cross the
//! boundary as borrowed views; setters copy what they need so the tag
//! stays self-contained.

use std::ffi::{c_double, c_float};
use std::mem::swap;
use std::ptr::{null, null_mut};
use crate::nbt::{NbtCompound, NbtKind, NbtTag};
use super::map::CMapRef;
use super::{CArrayView, CByteArrayView, CIntArrayView, CLongArrayView, CStringView};

pub type CNbtListView = CArrayView<NbtTag>;

#[no_mangle]
extern "C" fn MC_BRIDGE_create_nbt() -> Box<NbtTag> {
    Box::new(NbtTag::default())
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_nbt(nbt_box: *mut Option<Box<NbtTag>>) {
    if let Some(slot) = nbt_box.as_mut() {
        slot.take();
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_swap_nbt(a: *mut NbtTag, b: *mut NbtTag) {
    swap(&mut *a, &mut *b);
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_get_kind(nbt: *const NbtTag) -> NbtKind {
    (*nbt).kind()
}

macro_rules! scalar_getter {
    ($name:ident, $variant:ident, $ret:ty, $zero:expr) => {
        #[no_mangle]
        unsafe extern "C" fn $name(nbt: *const NbtTag, ok: *mut bool) -> $ret {
            if let NbtTag::$variant(val) = &*nbt {
                *ok = true;
                *val
            } else {
                *ok = false;
                $zero
            }
        }
    };
}

scalar_getter!(MC_BRIDGE_nbt_get_byte, Byte, i8, 0);
scalar_getter!(MC_BRIDGE_nbt_get_short, Short, i16, 0);
scalar_getter!(MC_BRIDGE_nbt_get_int, Int, i32, 0);
scalar_getter!(MC_BRIDGE_nbt_get_long, Long, i64, 0);
scalar_getter!(MC_BRIDGE_nbt_get_float, Float, c_float, 0.0);
scalar_getter!(MC_BRIDGE_nbt_get_double, Double, c_double, 0.0);

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_get_string(nbt: *const NbtTag, ok: *mut bool) -> *const String {
    if let NbtTag::String(val) = &*nbt {
        *ok = true;
        val as *const String
    } else {
        *ok = false;
        null()
    }
}

macro_rules! array_getter {
    ($name:ident, $variant:ident, $view:ty) => {
        #[no_mangle]
        unsafe extern "C" fn $name(nbt: *const NbtTag, ok: *mut bool) -> $view {
            if let NbtTag::$variant(arr) = &*nbt {
                *ok = true;
                CArrayView::from_slice(arr)
            } else {
                *ok = false;
                CArrayView::empty()
            }
        }
    };
}

array_getter!(MC_BRIDGE_nbt_get_byte_array, ByteArray, CByteArrayView);
array_getter!(MC_BRIDGE_nbt_get_int_array, IntArray, CIntArrayView);
array_getter!(MC_BRIDGE_nbt_get_long_array, LongArray, CLongArrayView);
array_getter!(MC_BRIDGE_nbt_get_list, List, CNbtListView);

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_get_compound(nbt: *const NbtTag, ok: *mut bool) -> CMapRef {
    if let NbtTag::Compound(compound) = &*nbt {
        *ok = true;
        CMapRef::StrNbt(compound as *const NbtCompound as *mut NbtCompound)
    } else {
        *ok = false;
        CMapRef::StrNbt(null_mut())
    }
}

macro_rules! scalar_setter {
    ($name:ident, $variant:ident, $src:ty) => {
        #[no_mangle]
        unsafe extern "C" fn $name(nbt: *mut NbtTag, val: $src) {
            *nbt = NbtTag::$variant(val);
        }
    };
}

scalar_setter!(MC_BRIDGE_nbt_set_byte, Byte, i8);
scalar_setter!(MC_BRIDGE_nbt_set_short, Short, i16);
scalar_setter!(MC_BRIDGE_nbt_set_int, Int, i32);
scalar_setter!(MC_BRIDGE_nbt_set_long, Long, i64);
scalar_setter!(MC_BRIDGE_nbt_set_float, Float, f32);
scalar_setter!(MC_BRIDGE_nbt_set_double, Double, f64);

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_string(nbt: *mut NbtTag, val: CStringView) {
    *nbt = NbtTag::String(val.to_string());
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_byte_array(nbt: *mut NbtTag, val: CByteArrayView) {
    *nbt = NbtTag::ByteArray(val.to_vec());
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_int_array(nbt: *mut NbtTag, val: CIntArrayView) {
    *nbt = NbtTag::IntArray(val.to_vec());
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_long_array(nbt: *mut NbtTag, val: CLongArrayView) {
    *nbt = NbtTag::LongArray(val.to_vec());
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_list(nbt: *mut NbtTag, val: CNbtListView) {
    *nbt = NbtTag::List(val.to_vec());
}

/// The source must be a string-keyed, NBT-valued map; anything else is
/// reported through `ok` and leaves the tag untouched.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_nbt_set_compound(nbt: *mut NbtTag, val: CMapRef, ok: *mut bool) {
    if let CMapRef::StrNbt(map) = val {
        *ok = true;
        *nbt = NbtTag::Compound((*map).clone());
    } else {
        *ok = false;
    }
}
