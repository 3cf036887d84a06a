//! Run outputs.
//!
//! Everything a run leaves on disk besides the event log: per-agent and
//! per-firm history tables, the per-step census, and the final employment
//! network in GML form.

pub mod census;
pub mod gml;
pub mod history;

pub use census::{economic_census, firms_report, gini};
pub use gml::write_gml;
pub use history::{write_agent_history, write_census_history, write_firm_history};
