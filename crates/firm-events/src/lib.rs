//! Shared data types for the emergent firms simulation.
//!
//! This crate contains pure data structures with no simulation logic:
//! decision events, per-step agent records, firm and census records, and
//! the final network export. It is a dependency for all other crates in
//! the workspace.

pub mod event;
pub mod export;
pub mod record;

// Re-export event types
pub use event::{CandidateEval, DecisionEvent, DecisionKind, LoanDecision};

// Re-export record types
pub use record::{AgentRecord, CensusRecord, FirmRecord};

// Re-export network export types
pub use export::{EdgeExport, NetworkExport, NodeExport};
