use serde::{Deserialize, Serialize};

/// Whether a scheduled update targets a block or a fluid, and which id it
/// applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingTickInfo {
    Fluid { id: String },
    Block { id: String },
}

impl Default for PendingTickInfo {
    fn default() -> Self {
        PendingTickInfo::Block {
            id: String::new(),
        }
    }
}

/// A block or fluid update captured at save time, waiting to be processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingTick {
    pub priority: i32,
    pub sub_tick: i64,
    pub time: i32,
    pub info: PendingTickInfo,
}

impl PendingTick {
    pub fn new() -> PendingTick {
        PendingTick::default()
    }

    pub fn id(&self) -> &str {
        match &self.info {
            PendingTickInfo::Fluid { id } => id,
            PendingTickInfo::Block { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_tick_id() {
        let mut tick = PendingTick::new();
        assert_eq!(tick.id(), "");

        tick.info = PendingTickInfo::Fluid {
            id: "minecraft:water".to_string(),
        };
        tick.time = 4;
        assert_eq!(tick.id(), "minecraft:water");
    }
}
