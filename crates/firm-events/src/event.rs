//! Decision Event Types
//!
//! One event is emitted for every agent review, carrying the utilities
//! that were compared and the lending outcome. Events are serialized to
//! an append-only JSONL log for downstream analysis.

use serde::{Deserialize, Serialize};

/// The branch of the decision engine that fired for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Agent kept its current role
    Stay,
    /// Self-employed agent joined an existing firm
    BecomeEmployee,
    /// Employed agent switched to a different firm
    Move,
    /// Agent left to run its own firm
    Startup,
    /// Desired action was denied (insufficient capital, loan refused)
    Thwart,
}

impl DecisionKind {
    /// Whether this outcome changed the employment network.
    pub fn changes_role(&self) -> bool {
        matches!(
            self,
            DecisionKind::BecomeEmployee | DecisionKind::Move | DecisionKind::Startup
        )
    }
}

/// Outcome of the lending consultation for a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum LoanDecision {
    /// The agent could pay from savings, no loan was needed
    NotNeeded,
    /// A loan for the shortfall was approved
    Approved { amount: f64 },
    /// The loan was refused and the action thwarted
    Rejected { amount: f64 },
}

/// Utility evaluation of one prospective employer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateEval {
    /// Firm head the candidate neighbor works under
    pub firm: u32,
    /// Optimal effort under this employer
    pub e_trial: f64,
    /// Utility at that effort
    pub u_trial: f64,
}

/// A single decision-engine review, logged as one JSONL entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub event_id: String,
    pub step: u64,
    pub agent_id: u32,
    pub kind: DecisionKind,
    /// Firm head before the review
    pub old_firm: u32,
    /// Firm head after the review
    pub new_firm: u32,
    /// Utility of going it alone
    pub u_self: f64,
    /// Utility in the current firm (None for singleton agents)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u_current: Option<f64>,
    /// Best utility found among reachable employers
    pub u_other: f64,
    /// All employers that were evaluated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<CandidateEval>,
    /// Capital required by the chosen action, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Lending outcome, if borrowing was consulted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanDecision>,
    /// Set when the optimizer failed and the review fell back to Stay
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optimizer_fallback: bool,
}

impl DecisionEvent {
    /// Create a minimal Stay event, the common case.
    pub fn stay(event_id: String, step: u64, agent_id: u32, firm: u32, u_self: f64) -> Self {
        Self {
            event_id,
            step,
            agent_id,
            kind: DecisionKind::Stay,
            old_firm: firm,
            new_firm: firm,
            u_self,
            u_current: None,
            u_other: 0.0,
            candidates: Vec::new(),
            cost: None,
            loan: None,
            optimizer_fallback: false,
        }
    }
}
