//! Simulation systems: utility optimization, lending, per-agent decision
//! reviews, and output distribution.

pub mod decision;
pub mod distribution;
pub mod lending;
pub mod optimizer;

pub use decision::review_agent;
pub use distribution::distribute_output;
pub use lending::{accrue_and_repay, lending_policy, DebtAwareLending, LendingPolicy, NaiveLending};
pub use optimizer::{optimize_effort, singleton_utility, utility, UtilityParams};
