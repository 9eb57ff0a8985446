//! Scene graph node identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node inside one scene graph.
///
/// Ids are handed out densely by the graph that owns the node, so the same
/// scene always produces the same ids. They are not meaningful across graphs.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a NodeId from a raw value (for deserialization/testing)
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Position of the node in its graph's arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = NodeId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
        assert_eq!(format!("{:?}", NodeId(7)), "NodeId(7)");
    }

    #[test]
    fn test_ordering() {
        assert!(NodeId(1) < NodeId(2));
    }
}
