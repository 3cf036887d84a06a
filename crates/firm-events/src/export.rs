//! Network Export Types
//!
//! Serializable form of the final employment network, with enough
//! per-node state to reconstruct firm groupings and net worth.

use serde::{Deserialize, Serialize};

/// One node in the exported network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExport {
    pub id: u32,
    pub savings: f64,
    pub wage: f64,
    pub loan: f64,
    /// Firm head the agent currently works under (its own id if self-employed)
    pub firm: u32,
}

impl NodeExport {
    pub fn net_worth(&self) -> f64 {
        self.savings - self.loan
    }
}

/// One `worker -> employer` edge in the exported network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: u32,
    pub target: u32,
}

/// The full employment network at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkExport {
    /// Always true; kept explicit so readers of the export need no context
    pub directed: bool,
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

impl NetworkExport {
    pub fn new(nodes: Vec<NodeExport>, edges: Vec<EdgeExport>) -> Self {
        Self {
            directed: true,
            nodes,
            edges,
        }
    }
}
