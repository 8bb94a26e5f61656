use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A block state: `namespace:id[key=value,...]`. Attributes live in a
/// `BTreeMap` so rendering and traversal follow key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub namespace: String,
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

/// Everything that can go wrong while parsing a textual block id. The
/// parser reports the first rule violated in scan order.
#[repr(u8)]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BlockIdParseError {
    #[error("more than one colon")]
    TooManyColons = 0,
    #[error("more than one left bracket")]
    TooManyLeftBrackets = 1,
    #[error("more than one right bracket")]
    TooManyRightBrackets = 2,
    #[error("block id is empty")]
    MissingBlockId = 3,
    #[error("left bracket is never closed")]
    BracketsNotInPairs = 4,
    #[error("bracket in wrong position")]
    BracketInWrongPosition = 5,
    #[error("colon in wrong position")]
    ColonsInWrongPosition = 6,
    #[error("attribute has no equal sign")]
    MissingEqualInAttributes = 7,
    #[error("attribute has more than one equal sign")]
    TooManyEqualsInAttributes = 8,
    #[error("attribute name is empty")]
    MissingAttributeName = 9,
    #[error("attribute value is empty")]
    MissingAttributeValue = 10,
    #[error("trailing characters after right bracket")]
    ExtraStringAfterRightBracket = 11,
    #[error("character outside the resource location charset")]
    InvalidCharacter = 12,
}

// Charset for namespace, id and attribute keys.
fn is_ident_char(ch: u8) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, b'_' | b'.' | b'/' | b'-')
}

// Attribute values accept the wider printable-ASCII set, minus the
// characters that structure the id string itself.
fn is_value_char(ch: u8) -> bool {
    ch.is_ascii_graphic() && !matches!(ch, b'[' | b']' | b',' | b'=' | b':')
}

/// Parse a full block id in a single left-to-right scan, no backtracking.
/// The namespace defaults to `minecraft` when the colon is omitted.
pub fn parse_block_id(full_id: &str) -> Result<Block, BlockIdParseError> {
    use BlockIdParseError::*;

    let bytes = full_id.as_bytes();
    let mut colon_pos: Option<usize> = None;
    let mut left_bracket: Option<usize> = None;
    let mut closed = false;
    let mut attributes = BTreeMap::new();

    // state of the attribute segment currently being scanned
    let mut seg_start = 0usize;
    let mut eq_pos: Option<usize> = None;
    let mut seen_comma = false;

    for (idx, &ch) in bytes.iter().enumerate() {
        if closed {
            // the right bracket must be the final character
            return Err(match ch {
                b']' => TooManyRightBrackets,
                b'[' => TooManyLeftBrackets,
                _ => ExtraStringAfterRightBracket,
            });
        }
        if left_bracket.is_none() {
            match ch {
                b':' => {
                    if colon_pos.is_some() {
                        return Err(TooManyColons);
                    }
                    if idx == 0 {
                        return Err(ColonsInWrongPosition);
                    }
                    colon_pos = Some(idx);
                }
                b'[' => {
                    let id_start = colon_pos.map_or(0, |c| c + 1);
                    if idx == id_start {
                        return Err(MissingBlockId);
                    }
                    left_bracket = Some(idx);
                    seg_start = idx + 1;
                }
                b']' => return Err(BracketInWrongPosition),
                c if is_ident_char(c) => {}
                _ => return Err(InvalidCharacter),
            }
        } else {
            match ch {
                b']' | b',' => {
                    if idx == seg_start {
                        // `id[]` means no attributes, but an empty segment
                        // after a comma is broken
                        if ch == b',' || seen_comma {
                            return Err(MissingEqualInAttributes);
                        }
                    } else {
                        let eq = match eq_pos {
                            Some(eq) => eq,
                            None => return Err(MissingEqualInAttributes),
                        };
                        if eq == seg_start {
                            return Err(MissingAttributeName);
                        }
                        if eq + 1 == idx {
                            return Err(MissingAttributeValue);
                        }
                        attributes.insert(
                            full_id[seg_start..eq].to_string(),
                            full_id[eq + 1..idx].to_string(),
                        );
                    }
                    if ch == b']' {
                        closed = true;
                    } else {
                        seen_comma = true;
                        seg_start = idx + 1;
                        eq_pos = None;
                    }
                }
                b'=' => {
                    if eq_pos.is_some() {
                        return Err(TooManyEqualsInAttributes);
                    }
                    eq_pos = Some(idx);
                }
                b'[' => return Err(TooManyLeftBrackets),
                b':' => return Err(ColonsInWrongPosition),
                c => {
                    let valid = match eq_pos {
                        None => is_ident_char(c),
                        Some(_) => is_value_char(c),
                    };
                    if !valid {
                        return Err(InvalidCharacter);
                    }
                }
            }
        }
    }

    if left_bracket.is_some() && !closed {
        return Err(BracketsNotInPairs);
    }

    let id_start = colon_pos.map_or(0, |c| c + 1);
    let id_end = left_bracket.unwrap_or(bytes.len());
    let id = &full_id[id_start..id_end];
    if id.is_empty() {
        return Err(MissingBlockId);
    }
    let namespace = match colon_pos {
        Some(colon) => &full_id[..colon],
        None => "minecraft",
    };

    Ok(Block {
        namespace: namespace.to_string(),
        id: id.to_string(),
        attributes,
    })
}

impl Block {
    pub fn new() -> Block {
        Block {
            namespace: "minecraft".to_string(),
            id: "air".to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn empty() -> Block {
        Block {
            namespace: String::new(),
            id: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn air() -> Block {
        Block::new()
    }

    pub fn structure_void() -> Block {
        Block {
            namespace: "minecraft".to_string(),
            id: "structure_void".to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn from_id(full_id: &str) -> Result<Block, BlockIdParseError> {
        parse_block_id(full_id)
    }

    pub fn is_air(&self) -> bool {
        self.namespace == "minecraft" && self.id == "air" && self.attributes.is_empty()
    }

    pub fn is_structure_void(&self) -> bool {
        self.namespace == "minecraft" && self.id == "structure_void" && self.attributes.is_empty()
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Render the full textual id, attributes in map order.
    pub fn full_id(&self) -> String {
        self.to_string()
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::new()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_empty() {
            write!(f, "{}:", self.namespace)?;
        }
        write!(f, "{}", self.id)?;
        if !self.attributes.is_empty() {
            write!(f, "[")?;
            for (idx, (key, value)) in self.attributes.iter().enumerate() {
                if idx > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
