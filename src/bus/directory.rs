//! Directory of nodes observed on the bus.
//!
//! Fed from heartbeat announcements by the monitor. Lock-free reads and
//! writes so the receive task and any number of readers can share it
//! without coordination.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::core::identifier::{NodeClass, NodeId};
use crate::network::FirmwareVersion;

/// What the directory knows about one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub class: NodeClass,
    pub id: NodeId,
    pub version: FirmwareVersion,
    /// When the latest heartbeat arrived.
    pub last_seen: DateTime<Utc>,
    /// Heartbeats observed since the directory was created.
    pub heartbeats: u64,
}

/// Concurrent map of every node that announced itself.
#[derive(Debug, Default)]
pub struct NodeDirectory {
    nodes: DashMap<(u8, u8), NodeRecord>,
}

impl NodeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heartbeat from `class`/`id`.
    ///
    /// A version-less heartbeat keeps a previously announced version.
    pub fn observe(&self, class: NodeClass, id: NodeId, version: FirmwareVersion) {
        self.nodes
            .entry((class.0, id.0))
            .and_modify(|record| {
                if !version.is_unknown() {
                    record.version = version;
                }
                record.last_seen = Utc::now();
                record.heartbeats += 1;
            })
            .or_insert_with(|| NodeRecord {
                class,
                id,
                version,
                last_seen: Utc::now(),
                heartbeats: 1,
            });
    }

    /// Look up one node.
    pub fn get(&self, class: NodeClass, id: NodeId) -> Option<NodeRecord> {
        self.nodes.get(&(class.0, id.0)).map(|r| *r)
    }

    /// All known nodes, ordered by class then id.
    pub fn snapshot(&self) -> Vec<NodeRecord> {
        let mut records: Vec<NodeRecord> = self.nodes.iter().map(|r| *r.value()).collect();
        records.sort_by_key(|r| (r.class.0, r.id));
        records
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_and_snapshot() {
        let directory = NodeDirectory::new();
        assert!(directory.is_empty());

        directory.observe(NodeClass::ZEUS, NodeId(1), FirmwareVersion::new(1, 0, 0, 0));
        directory.observe(NodeClass::CELAENO, NodeId(2), FirmwareVersion::default());
        directory.observe(NodeClass::ZEUS, NodeId(1), FirmwareVersion::default());

        assert_eq!(directory.len(), 2);

        let zeus = directory.get(NodeClass::ZEUS, NodeId(1)).unwrap();
        assert_eq!(zeus.heartbeats, 2);
        // The version-less second heartbeat must not erase the version.
        assert_eq!(zeus.version, FirmwareVersion::new(1, 0, 0, 0));

        let snapshot = directory.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].class, NodeClass::CELAENO);
        assert_eq!(snapshot[1].class, NodeClass::ZEUS);
    }
}
