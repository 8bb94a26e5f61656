use serde::{Deserialize, Serialize};

/// Descriptive data carried by a schematic. Fields that not every source
/// format provides stay optional; across the C boundary they travel as
/// `COption` slots in the fixed-size metadata struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub author: String,
    pub description: String,
    /// Seconds since the epoch.
    pub time_created: i64,
    pub time_modified: i64,
    /// Minecraft data version the blocks were captured under.
    pub mc_version: i32,
    pub we_version: Option<i32>,
    pub origin: Option<[i32; 3]>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            name: String::new(),
            author: String::new(),
            description: String::new(),
            time_created: 0,
            time_modified: 0,
            mc_version: 0,
            we_version: None,
            origin: None,
        }
    }
}

impl Metadata {
    pub fn named(name: &str) -> Metadata {
        Metadata {
            name: name.to_string(),
            ..Metadata::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_metadata() {
        let metadata = Metadata::named("Piston Door");
        assert_eq!(metadata.name, "Piston Door");
        assert_eq!(metadata.we_version, None);
        assert_eq!(metadata, Metadata {
            name: "Piston Door".to_string(),
            ..Metadata::default()
        });
    }
}
