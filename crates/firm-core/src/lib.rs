//! Emergent firms simulation engine.
//!
//! A population of self-interested agents chooses, each discrete step,
//! whether to work alone, join another agent as an employee, start a firm,
//! or borrow to finance the change. Firms are not stored entities: they
//! emerge as groupings of the directed employment network and dissolve the
//! same way.

pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod network;
pub mod output;
pub mod scheduler;
pub mod setup;
pub mod systems;

pub use agent::{AgentState, DecisionOutcome};
pub use config::SimConfig;
pub use error::SimError;
pub use network::{EmploymentNetwork, SocialNetwork};
pub use scheduler::{RunSummary, Simulation};
