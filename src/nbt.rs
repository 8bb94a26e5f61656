use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::Error;

/// String-keyed map of child tags. A `BTreeMap` keeps traversal in
/// lexicographic key order, which the map bridge relies on.
pub type NbtCompound = BTreeMap<String, NbtTag>;

/// The twelve NBT payload kinds, numbered like the binary tag ids.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NbtKind {
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl fmt::Display for NbtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NbtKind::Byte => "Byte",
            NbtKind::Short => "Short",
            NbtKind::Int => "Int",
            NbtKind::Long => "Long",
            NbtKind::Float => "Float",
            NbtKind::Double => "Double",
            NbtKind::ByteArray => "ByteArray",
            NbtKind::String => "String",
            NbtKind::List => "List",
            NbtKind::Compound => "Compound",
            NbtKind::IntArray => "IntArray",
            NbtKind::LongArray => "LongArray",
        };
        write!(f, "{}", name)
    }
}

/// A single NBT value. The enum discriminant is the authoritative kind
/// tag; accessors for the wrong kind fail instead of reinterpreting the
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Default for NbtTag {
    fn default() -> Self {
        NbtTag::Byte(0)
    }
}

macro_rules! typed_getter {
    ($name:ident, $variant:ident, $ret:ty) => {
        pub fn $name(&self) -> Result<$ret, Error> {
            if let NbtTag::$variant(val) = self {
                Ok(*val)
            } else {
                Err(self.mismatch(NbtKind::$variant))
            }
        }
    };
}

impl NbtTag {
    pub fn kind(&self) -> NbtKind {
        match self {
            NbtTag::Byte(_) => NbtKind::Byte,
            NbtTag::Short(_) => NbtKind::Short,
            NbtTag::Int(_) => NbtKind::Int,
            NbtTag::Long(_) => NbtKind::Long,
            NbtTag::Float(_) => NbtKind::Float,
            NbtTag::Double(_) => NbtKind::Double,
            NbtTag::ByteArray(_) => NbtKind::ByteArray,
            NbtTag::String(_) => NbtKind::String,
            NbtTag::List(_) => NbtKind::List,
            NbtTag::Compound(_) => NbtKind::Compound,
            NbtTag::IntArray(_) => NbtKind::IntArray,
            NbtTag::LongArray(_) => NbtKind::LongArray,
        }
    }

    fn mismatch(&self, expected: NbtKind) -> Error {
        Error::TagTypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    typed_getter!(as_byte, Byte, i8);
    typed_getter!(as_short, Short, i16);
    typed_getter!(as_int, Int, i32);
    typed_getter!(as_long, Long, i64);
    typed_getter!(as_float, Float, f32);
    typed_getter!(as_double, Double, f64);

    pub fn as_str(&self) -> Result<&str, Error> {
        if let NbtTag::String(s) = self {
            Ok(s)
        } else {
            Err(self.mismatch(NbtKind::String))
        }
    }

    pub fn as_byte_array(&self) -> Result<&[i8], Error> {
        if let NbtTag::ByteArray(arr) = self {
            Ok(arr)
        } else {
            Err(self.mismatch(NbtKind::ByteArray))
        }
    }

    pub fn as_int_array(&self) -> Result<&[i32], Error> {
        if let NbtTag::IntArray(arr) = self {
            Ok(arr)
        } else {
            Err(self.mismatch(NbtKind::IntArray))
        }
    }

    pub fn as_long_array(&self) -> Result<&[i64], Error> {
        if let NbtTag::LongArray(arr) = self {
            Ok(arr)
        } else {
            Err(self.mismatch(NbtKind::LongArray))
        }
    }

    pub fn as_list(&self) -> Result<&[NbtTag], Error> {
        if let NbtTag::List(list) = self {
            Ok(list)
        } else {
            Err(self.mismatch(NbtKind::List))
        }
    }

    pub fn as_list_mut(&mut self) -> Result<&mut Vec<NbtTag>, Error> {
        if let NbtTag::List(list) = self {
            Ok(list)
        } else {
            Err(self.mismatch(NbtKind::List))
        }
    }

    pub fn as_compound(&self) -> Result<&NbtCompound, Error> {
        if let NbtTag::Compound(compound) = self {
            Ok(compound)
        } else {
            Err(self.mismatch(NbtKind::Compound))
        }
    }

    pub fn as_compound_mut(&mut self) -> Result<&mut NbtCompound, Error> {
        if let NbtTag::Compound(compound) = self {
            Ok(compound)
        } else {
            Err(self.mismatch(NbtKind::Compound))
        }
    }
}

macro_rules! tag_from {
    ($src:ty, $variant:ident) => {
        impl From<$src> for NbtTag {
            fn from(value: $src) -> Self {
                NbtTag::$variant(value.into())
            }
        }
    };
}

tag_from!(i8, Byte);
tag_from!(i16, Short);
tag_from!(i32, Int);
tag_from!(i64, Long);
tag_from!(f32, Float);
tag_from!(f64, Double);
tag_from!(Vec<i8>, ByteArray);
tag_from!(String, String);
tag_from!(&str, String);
tag_from!(Vec<NbtTag>, List);
tag_from!(NbtCompound, Compound);
tag_from!(Vec<i32>, IntArray);
tag_from!(Vec<i64>, LongArray);
