//! The heterogeneous map bridge. A map handle pairs one of two key kinds
//! (string, block position) with one of four value kinds (string, NBT
//! tag, block entity, pending-tick list); the pairing is fixed when the
//! map is created and checked against the caller's declared kinds on
//! every typed access.
//!
//! All four shapes are ordered maps, so traversal is deterministic:
//! lexicographic for string keys, lexicographic on `[x, y, z]` for
//! position keys. Structural mutation (insert/remove) invalidates any
//! outstanding iterator; using one afterwards is undefined.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ffi::c_void;
use std::mem::take;
use std::ptr::{null, null_mut};
use log::warn;
use static_assertions as sa;
use crate::block_entity::BlockEntity;
use crate::nbt::{NbtCompound, NbtTag};
use crate::pending_tick::PendingTick;
use super::{CArrayView, CStringView};

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CMapKeyType {
    String = 0,
    Pos = 1,
}

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum CMapValueType {
    String = 0,
    Nbt = 1,
    BlockEntity = 2,
    PendingTickList = 3,
}

/// Borrowed reference to a map owned by some parent object (a block's
/// attributes, a compound tag, a region's block entities). No release
/// function exists for this type.
#[repr(C)]
pub enum CMapRef {
    StrStr(*mut BTreeMap<String, String>),
    StrNbt(*mut NbtCompound),
    PosBlockEntity(*mut BTreeMap<[i32; 3], BlockEntity>),
    PosPendingTick(*mut BTreeMap<[i32; 3], Vec<PendingTick>>),
}
sa::const_assert!(std::mem::size_of::<CMapRef>() == 2 * std::mem::size_of::<usize>());

/// Owning map handle. Released by `MC_BRIDGE_release_map`, which leaves
/// the slot at `None`.
#[repr(C)]
pub enum CMapBox {
    StrStr(Box<BTreeMap<String, String>>),
    StrNbt(Box<NbtCompound>),
    PosBlockEntity(Box<BTreeMap<[i32; 3], BlockEntity>>),
    PosPendingTick(Box<BTreeMap<[i32; 3], Vec<PendingTick>>>),
    None,
}
sa::const_assert!(std::mem::size_of::<CMapBox>() == 2 * std::mem::size_of::<usize>());

/// Key passed by value; which field is live follows the map's key kind.
#[repr(C)]
pub union CMapKeyWrapper {
    pub string: CStringView,
    pub pos: [i32; 3],
}

/// Borrowed value slot; which field is live follows the map's value kind.
/// A null pointer (or empty view) means "absent".
#[repr(C)]
pub union CMapValueWrapper {
    pub string: *mut String,
    pub nbt: *mut NbtTag,
    pub block_entity: *mut BlockEntity,
    pub pending_tick_list: CArrayView<PendingTick>,
}

pub struct KVRef<K, V> {
    pub key: *const K,
    pub value: *mut V,
}

impl<K, V> KVRef<K, V> {
    pub fn new(src: Option<(&K, &mut V)>) -> KVRef<K, V> {
        match src {
            Some((key, value)) => KVRef {
                key: key as *const K,
                value: value as *mut V,
            },
            None => KVRef {
                key: null(),
                value: null_mut(),
            },
        }
    }

    pub fn is_null(&self) -> bool {
        self.key.is_null()
    }
}

/// Cursor over a map. `None` doubles as the canonical end iterator.
#[repr(C)]
pub enum CMapIterator {
    StrStr {
        iter: btree_map::IterMut<'static, String, String>,
        deref: KVRef<String, String>,
    },
    StrNbt {
        iter: btree_map::IterMut<'static, String, NbtTag>,
        deref: KVRef<String, NbtTag>,
    },
    PosBlockEntity {
        iter: btree_map::IterMut<'static, [i32; 3], BlockEntity>,
        deref: KVRef<[i32; 3], BlockEntity>,
    },
    PosPendingTick {
        iter: btree_map::IterMut<'static, [i32; 3], Vec<PendingTick>>,
        deref: KVRef<[i32; 3], Vec<PendingTick>>,
    },
    None,
}

#[repr(C)]
pub struct IterDerefResult {
    pub key: CMapKeyWrapper,
    pub value: CMapValueWrapper,
}

impl CMapRef {
    pub fn key_value_type(&self) -> (CMapKeyType, CMapValueType) {
        match self {
            CMapRef::StrStr(_) => (CMapKeyType::String, CMapValueType::String),
            CMapRef::StrNbt(_) => (CMapKeyType::String, CMapValueType::Nbt),
            CMapRef::PosBlockEntity(_) => (CMapKeyType::Pos, CMapValueType::BlockEntity),
            CMapRef::PosPendingTick(_) => (CMapKeyType::Pos, CMapValueType::PendingTickList),
        }
    }
}

impl CMapBox {
    pub fn to_c_map_ref(&self) -> CMapRef {
        match self {
            CMapBox::StrStr(map) => {
                type M = BTreeMap<String, String>;
                CMapRef::StrStr(map.as_ref() as *const M as *mut M)
            }
            CMapBox::StrNbt(map) => {
                CMapRef::StrNbt(map.as_ref() as *const NbtCompound as *mut NbtCompound)
            }
            CMapBox::PosBlockEntity(map) => {
                type M = BTreeMap<[i32; 3], BlockEntity>;
                CMapRef::PosBlockEntity(map.as_ref() as *const M as *mut M)
            }
            CMapBox::PosPendingTick(map) => {
                type M = BTreeMap<[i32; 3], Vec<PendingTick>>;
                CMapRef::PosPendingTick(map.as_ref() as *const M as *mut M)
            }
            CMapBox::None => panic!("unwrapping a released map handle"),
        }
    }
}

#[no_mangle]
extern "C" fn MC_BRIDGE_create_map(
    key_t: CMapKeyType,
    val_t: CMapValueType,
    ok: *mut bool,
) -> CMapBox {
    let map_box = match (key_t, val_t) {
        (CMapKeyType::String, CMapValueType::String) => CMapBox::StrStr(Box::default()),
        (CMapKeyType::String, CMapValueType::Nbt) => CMapBox::StrNbt(Box::default()),
        (CMapKeyType::Pos, CMapValueType::BlockEntity) => CMapBox::PosBlockEntity(Box::default()),
        (CMapKeyType::Pos, CMapValueType::PendingTickList) => {
            CMapBox::PosPendingTick(Box::default())
        }
        _ => {
            warn!("rejected map creation: no map has key {:?} and value {:?}", key_t, val_t);
            unsafe {
                *ok = false;
            }
            return CMapBox::None;
        }
    };
    unsafe {
        *ok = true;
    }
    map_box
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_release_map(map_box: *mut CMapBox) {
    if let Some(slot) = map_box.as_mut() {
        *slot = CMapBox::None;
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_unwrap_box(src: *const CMapBox) -> CMapRef {
    (*src).to_c_map_ref()
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_get_key_type(map: *const CMapRef) -> CMapKeyType {
    (*map).key_value_type().0
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_get_value_type(map: *const CMapRef) -> CMapValueType {
    (*map).key_value_type().1
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_length(map: *const CMapRef) -> usize {
    match &*map {
        CMapRef::StrStr(map) => (**map).len(),
        CMapRef::StrNbt(map) => (**map).len(),
        CMapRef::PosBlockEntity(map) => (**map).len(),
        CMapRef::PosPendingTick(map) => (**map).len(),
    }
}

/// Ordered maps have no spare capacity; this reports the length so the
/// capacity >= length contract still holds.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_capacity(map: *const CMapRef) -> usize {
    MC_BRIDGE_map_length(map)
}

/// Growth hint. A no-op for ordered maps; contents are untouched.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_reserve(_map: *mut CMapRef, _new_capacity: usize) {}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_contains_key(
    map: *const CMapRef,
    key: CMapKeyWrapper,
) -> bool {
    match &*map {
        CMapRef::StrStr(map) => (**map).contains_key(key.string.to_str()),
        CMapRef::StrNbt(map) => (**map).contains_key(key.string.to_str()),
        CMapRef::PosBlockEntity(map) => (**map).contains_key(&key.pos),
        CMapRef::PosPendingTick(map) => (**map).contains_key(&key.pos),
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_find(
    map: *const CMapRef,
    key_t: CMapKeyType,
    val_t: CMapValueType,
    key: CMapKeyWrapper,
    ok: *mut bool,
) -> CMapValueWrapper {
    let map = &*map;
    if (key_t, val_t) != map.key_value_type() {
        *ok = false;
        return CMapValueWrapper { string: null_mut() };
    }
    *ok = true;
    match map {
        CMapRef::StrStr(map) => {
            let found = (**map).get_mut(key.string.to_str());
            CMapValueWrapper {
                string: found.map_or(null_mut(), |v| v as *mut String),
            }
        }
        CMapRef::StrNbt(map) => {
            let found = (**map).get_mut(key.string.to_str());
            CMapValueWrapper {
                nbt: found.map_or(null_mut(), |v| v as *mut NbtTag),
            }
        }
        CMapRef::PosBlockEntity(map) => {
            let found = (**map).get_mut(&key.pos);
            CMapValueWrapper {
                block_entity: found.map_or(null_mut(), |v| v as *mut BlockEntity),
            }
        }
        CMapRef::PosPendingTick(map) => {
            let view = match (**map).get(&key.pos) {
                Some(list) => CArrayView::from_slice(list),
                None => CArrayView::empty(),
            };
            CMapValueWrapper {
                pending_tick_list: view,
            }
        }
    }
}

/// Insert an entry, overwriting on key collision. The value is moved out
/// of the caller's object: the caller keeps an empty shell and must still
/// release it. Pending-tick lists are copied from the borrowed view.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_insert(
    map: *mut CMapRef,
    key: CMapKeyWrapper,
    value: CMapValueWrapper,
) {
    match &*map {
        CMapRef::StrStr(map) => {
            (**map).insert(key.string.to_string(), take(&mut *value.string));
        }
        CMapRef::StrNbt(map) => {
            (**map).insert(key.string.to_string(), take(&mut *value.nbt));
        }
        CMapRef::PosBlockEntity(map) => {
            (**map).insert(key.pos, take(&mut *value.block_entity));
        }
        CMapRef::PosPendingTick(map) => {
            (**map).insert(key.pos, value.pending_tick_list.to_vec());
        }
    }
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_remove(
    map: *mut CMapRef,
    key: CMapKeyWrapper,
    existed_nullable: *mut bool,
) {
    let existed = match &*map {
        CMapRef::StrStr(map) => (**map).remove(key.string.to_str()).is_some(),
        CMapRef::StrNbt(map) => (**map).remove(key.string.to_str()).is_some(),
        CMapRef::PosBlockEntity(map) => (**map).remove(&key.pos).is_some(),
        CMapRef::PosPendingTick(map) => (**map).remove(&key.pos).is_some(),
    };
    if !existed_nullable.is_null() {
        *existed_nullable = existed;
    }
}

pub type ForeachFn = extern "C" fn(
    idx: usize,
    key: CMapKeyWrapper,
    value: CMapValueWrapper,
    custom_data: *mut c_void,
);

/// Visit every entry in traversal order with a zero-based index, borrowed
/// key and mutably borrowed value.
#[no_mangle]
#[allow(improper_ctypes_definitions)]
unsafe extern "C" fn MC_BRIDGE_map_foreach(
    map: *const CMapRef,
    fun: ForeachFn,
    custom_data: *mut c_void,
) {
    match &*map {
        CMapRef::StrStr(map) => {
            for (idx, (key, value)) in (**map).iter_mut().enumerate() {
                fun(
                    idx,
                    CMapKeyWrapper {
                        string: CStringView::from(key),
                    },
                    CMapValueWrapper { string: value },
                    custom_data,
                );
            }
        }
        CMapRef::StrNbt(map) => {
            for (idx, (key, value)) in (**map).iter_mut().enumerate() {
                fun(
                    idx,
                    CMapKeyWrapper {
                        string: CStringView::from(key),
                    },
                    CMapValueWrapper { nbt: value },
                    custom_data,
                );
            }
        }
        CMapRef::PosBlockEntity(map) => {
            for (idx, (key, value)) in (**map).iter_mut().enumerate() {
                fun(
                    idx,
                    CMapKeyWrapper { pos: *key },
                    CMapValueWrapper {
                        block_entity: value,
                    },
                    custom_data,
                );
            }
        }
        CMapRef::PosPendingTick(map) => {
            for (idx, (key, value)) in (**map).iter_mut().enumerate() {
                fun(
                    idx,
                    CMapKeyWrapper { pos: *key },
                    CMapValueWrapper {
                        pending_tick_list: CArrayView::from_slice(value),
                    },
                    custom_data,
                );
            }
        }
    }
}

#[no_mangle]
#[allow(improper_ctypes_definitions)]
unsafe extern "C" fn MC_BRIDGE_map_iterator_first(
    map: *const CMapRef,
    key_t: CMapKeyType,
    val_t: CMapValueType,
    ok: *mut bool,
) -> CMapIterator {
    let map = &*map;
    if (key_t, val_t) != map.key_value_type() {
        *ok = false;
        return CMapIterator::None;
    }
    *ok = true;
    match map {
        CMapRef::StrStr(map) => {
            let mut iter = (**map).iter_mut();
            let deref = KVRef::new(iter.next());
            CMapIterator::StrStr { iter, deref }
        }
        CMapRef::StrNbt(map) => {
            let mut iter = (**map).iter_mut();
            let deref = KVRef::new(iter.next());
            CMapIterator::StrNbt { iter, deref }
        }
        CMapRef::PosBlockEntity(map) => {
            let mut iter = (**map).iter_mut();
            let deref = KVRef::new(iter.next());
            CMapIterator::PosBlockEntity { iter, deref }
        }
        CMapRef::PosPendingTick(map) => {
            let mut iter = (**map).iter_mut();
            let deref = KVRef::new(iter.next());
            CMapIterator::PosPendingTick { iter, deref }
        }
    }
}

/// The canonical end iterator for equality comparisons.
#[no_mangle]
#[allow(improper_ctypes_definitions)]
unsafe extern "C" fn MC_BRIDGE_map_iterator_end(
    map: *const CMapRef,
    key_t: CMapKeyType,
    val_t: CMapValueType,
    ok: *mut bool,
) -> CMapIterator {
    *ok = (key_t, val_t) == (*map).key_value_type();
    CMapIterator::None
}

#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_iterator_add(it: *mut CMapIterator) {
    match &mut *it {
        CMapIterator::None => {}
        CMapIterator::StrStr { iter, deref } => *deref = KVRef::new(iter.next()),
        CMapIterator::StrNbt { iter, deref } => *deref = KVRef::new(iter.next()),
        CMapIterator::PosBlockEntity { iter, deref } => *deref = KVRef::new(iter.next()),
        CMapIterator::PosPendingTick { iter, deref } => *deref = KVRef::new(iter.next()),
    }
}

/// Borrow the current entry. Dereferencing an end iterator is a caller
/// bug; it is answered with a fatal assertion rather than a garbage pair.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_iterator_deref(it: *const CMapIterator) -> IterDerefResult {
    deref_checked(&*it)
}

unsafe fn deref_checked(it: &CMapIterator) -> IterDerefResult {
    let end: bool = match it {
        CMapIterator::None => true,
        CMapIterator::StrStr { deref, .. } => deref.is_null(),
        CMapIterator::StrNbt { deref, .. } => deref.is_null(),
        CMapIterator::PosBlockEntity { deref, .. } => deref.is_null(),
        CMapIterator::PosPendingTick { deref, .. } => deref.is_null(),
    };
    assert!(!end, "dereferencing an end iterator");

    match it {
        CMapIterator::None => unreachable!(),
        CMapIterator::StrStr { deref, .. } => IterDerefResult {
            key: CMapKeyWrapper {
                string: CStringView::from(&*deref.key),
            },
            value: CMapValueWrapper {
                string: deref.value,
            },
        },
        CMapIterator::StrNbt { deref, .. } => IterDerefResult {
            key: CMapKeyWrapper {
                string: CStringView::from(&*deref.key),
            },
            value: CMapValueWrapper { nbt: deref.value },
        },
        CMapIterator::PosBlockEntity { deref, .. } => IterDerefResult {
            key: CMapKeyWrapper { pos: *deref.key },
            value: CMapValueWrapper {
                block_entity: deref.value,
            },
        },
        CMapIterator::PosPendingTick { deref, .. } => IterDerefResult {
            key: CMapKeyWrapper { pos: *deref.key },
            value: CMapValueWrapper {
                pending_tick_list: CArrayView::from_slice(&*deref.value),
            },
        },
    }
}

impl CMapIterator {
    fn to_kv_pointer(&self) -> (*const c_void, *mut c_void) {
        match self {
            CMapIterator::None => (null(), null_mut()),
            CMapIterator::StrStr { deref, .. } => {
                (deref.key as *const c_void, deref.value as *mut c_void)
            }
            CMapIterator::StrNbt { deref, .. } => {
                (deref.key as *const c_void, deref.value as *mut c_void)
            }
            CMapIterator::PosBlockEntity { deref, .. } => {
                (deref.key as *const c_void, deref.value as *mut c_void)
            }
            CMapIterator::PosPendingTick { deref, .. } => {
                (deref.key as *const c_void, deref.value as *mut c_void)
            }
        }
    }
}

/// Two iterators are equal when they reference the same entry; all end
/// iterators compare equal, whichever map they came from.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_iterator_equal(
    a: *const CMapIterator,
    b: *const CMapIterator,
) -> bool {
    (*a).to_kv_pointer() == (*b).to_kv_pointer()
}

/// Entries not yet visited, the current one included.
#[no_mangle]
unsafe extern "C" fn MC_BRIDGE_map_iterator_remaining(it: *const CMapIterator) -> usize {
    match &*it {
        CMapIterator::None => 0,
        CMapIterator::StrStr { iter, deref } => iter.len() + usize::from(!deref.is_null()),
        CMapIterator::StrNbt { iter, deref } => iter.len() + usize::from(!deref.is_null()),
        CMapIterator::PosBlockEntity { iter, deref } => iter.len() + usize::from(!deref.is_null()),
        CMapIterator::PosPendingTick { iter, deref } => iter.len() + usize::from(!deref.is_null()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn str_key(key: &str) -> CMapKeyWrapper {
        CMapKeyWrapper {
            string: CStringView::from(key),
        }
    }

    #[test]
    fn test_create_checks_kind_pairing() {
        let mut ok = false;
        let map_box = MC_BRIDGE_create_map(CMapKeyType::String, CMapValueType::String, &mut ok);
        assert!(ok);
        assert!(matches!(map_box, CMapBox::StrStr(_)));

        let bad = MC_BRIDGE_create_map(CMapKeyType::Pos, CMapValueType::String, &mut ok);
        assert!(!ok);
        assert!(matches!(bad, CMapBox::None));
    }

    #[test]
    fn test_release_map_is_idempotent() {
        let mut ok = false;
        let mut map_box = MC_BRIDGE_create_map(CMapKeyType::String, CMapValueType::Nbt, &mut ok);
        unsafe {
            MC_BRIDGE_release_map(&mut map_box);
            assert!(matches!(map_box, CMapBox::None));
            MC_BRIDGE_release_map(&mut map_box);
            MC_BRIDGE_release_map(std::ptr::null_mut());
        }
    }

    #[test]
    fn test_insert_find_remove() {
        let mut ok = false;
        let map_box = MC_BRIDGE_create_map(CMapKeyType::String, CMapValueType::String, &mut ok);
        unsafe {
            let mut map = MC_BRIDGE_map_unwrap_box(&map_box);

            let mut north = "side".to_string();
            MC_BRIDGE_map_insert(
                &mut map,
                str_key("north"),
                CMapValueWrapper { string: &mut north },
            );
            // insert moves the value out; the caller keeps an empty shell
            assert!(north.is_empty());

            assert_eq!(MC_BRIDGE_map_length(&map), 1);
            assert!(MC_BRIDGE_map_contains_key(&map, str_key("north")));
            assert!(MC_BRIDGE_map_capacity(&map) >= MC_BRIDGE_map_length(&map));

            let found = MC_BRIDGE_map_find(
                &map,
                CMapKeyType::String,
                CMapValueType::String,
                str_key("north"),
                &mut ok,
            );
            assert!(ok);
            assert_eq!((*found.string).as_str(), "side");

            let absent = MC_BRIDGE_map_find(
                &map,
                CMapKeyType::String,
                CMapValueType::String,
                str_key("south"),
                &mut ok,
            );
            assert!(ok);
            assert!(absent.string.is_null());

            // declared kinds that disagree with the map are rejected
            MC_BRIDGE_map_find(
                &map,
                CMapKeyType::Pos,
                CMapValueType::BlockEntity,
                str_key("north"),
                &mut ok,
            );
            assert!(!ok);

            let mut existed = false;
            MC_BRIDGE_map_remove(&mut map, str_key("north"), &mut existed);
            assert!(existed);
            MC_BRIDGE_map_remove(&mut map, str_key("north"), &mut existed);
            assert!(!existed);
            assert_eq!(MC_BRIDGE_map_length(&map), 0);
        }
    }

    #[test]
    fn test_insert_overwrites_on_collision() {
        let mut ok = false;
        let map_box = MC_BRIDGE_create_map(CMapKeyType::String, CMapValueType::String, &mut ok);
        unsafe {
            let mut map = MC_BRIDGE_map_unwrap_box(&map_box);
            let mut first = "none".to_string();
            let mut second = "up".to_string();
            MC_BRIDGE_map_insert(
                &mut map,
                str_key("west"),
                CMapValueWrapper { string: &mut first },
            );
            MC_BRIDGE_map_insert(
                &mut map,
                str_key("west"),
                CMapValueWrapper {
                    string: &mut second,
                },
            );
            assert_eq!(MC_BRIDGE_map_length(&map), 1);

            let found = MC_BRIDGE_map_find(
                &map,
                CMapKeyType::String,
                CMapValueType::String,
                str_key("west"),
                &mut ok,
            );
            assert_eq!((*found.string).as_str(), "up");
        }
    }

    #[test]
    fn test_iterator_walks_in_key_order() {
        let mut ok = false;
        let map_box = MC_BRIDGE_create_map(CMapKeyType::String, CMapValueType::String, &mut ok);
        unsafe {
            let mut map = MC_BRIDGE_map_unwrap_box(&map_box);
            for (key, value) in [("south", "none"), ("east", "up"), ("north", "side")] {
                let mut value = value.to_string();
                MC_BRIDGE_map_insert(
                    &mut map,
                    str_key(key),
                    CMapValueWrapper { string: &mut value },
                );
            }

            let mut it = MC_BRIDGE_map_iterator_first(
                &map,
                CMapKeyType::String,
                CMapValueType::String,
                &mut ok,
            );
            assert!(ok);
            assert_eq!(MC_BRIDGE_map_iterator_remaining(&it), 3);
            let end = MC_BRIDGE_map_iterator_end(
                &map,
                CMapKeyType::String,
                CMapValueType::String,
                &mut ok,
            );
            assert!(ok);

            let mut visited = Vec::new();
            while !MC_BRIDGE_map_iterator_equal(&it, &end) {
                let entry = MC_BRIDGE_map_iterator_deref(&it);
                visited.push(entry.key.string.to_str().to_string());
                MC_BRIDGE_map_iterator_add(&mut it);
            }
            assert_eq!(visited, vec!["east", "north", "south"]);
            assert_eq!(MC_BRIDGE_map_iterator_remaining(&it), 0);
        }
    }

    #[test]
    fn test_empty_map_first_equals_end() {
        let mut ok = false;
        let map_box =
            MC_BRIDGE_create_map(CMapKeyType::Pos, CMapValueType::BlockEntity, &mut ok);
        unsafe {
            let map = MC_BRIDGE_map_unwrap_box(&map_box);
            let it = MC_BRIDGE_map_iterator_first(
                &map,
                CMapKeyType::Pos,
                CMapValueType::BlockEntity,
                &mut ok,
            );
            let end = MC_BRIDGE_map_iterator_end(
                &map,
                CMapKeyType::Pos,
                CMapValueType::BlockEntity,
                &mut ok,
            );
            assert!(MC_BRIDGE_map_iterator_equal(&it, &end));
        }
    }

    #[test]
    #[should_panic(expected = "dereferencing an end iterator")]
    fn test_deref_at_end_is_fatal() {
        let it = CMapIterator::None;
        unsafe {
            deref_checked(&it);
        }
    }

    #[test]
    fn test_foreach_passes_indices_and_entries() {
        extern "C" fn collect(
            idx: usize,
            key: CMapKeyWrapper,
            value: CMapValueWrapper,
            custom_data: *mut c_void,
        ) {
            unsafe {
                let out = &mut *(custom_data as *mut Vec<(usize, [i32; 3], usize)>);
                out.push((idx, key.pos, value.pending_tick_list.to_slice().len()));
            }
        }

        let mut ok = false;
        let map_box =
            MC_BRIDGE_create_map(CMapKeyType::Pos, CMapValueType::PendingTickList, &mut ok);
        unsafe {
            let mut map = MC_BRIDGE_map_unwrap_box(&map_box);
            let ticks = vec![PendingTick::new(), PendingTick::new()];
            MC_BRIDGE_map_insert(
                &mut map,
                CMapKeyWrapper { pos: [1, 2, 3] },
                CMapValueWrapper {
                    pending_tick_list: CArrayView::from_slice(&ticks),
                },
            );
            MC_BRIDGE_map_insert(
                &mut map,
                CMapKeyWrapper { pos: [0, 0, 1] },
                CMapValueWrapper {
                    pending_tick_list: CArrayView::from_slice(&ticks[..1]),
                },
            );

            let mut visited: Vec<(usize, [i32; 3], usize)> = Vec::new();
            MC_BRIDGE_map_foreach(&map, collect, &mut visited as *mut _ as *mut c_void);
            assert_eq!(visited, vec![(0, [0, 0, 1], 1), (1, [1, 2, 3], 2)]);
        }
    }
}
