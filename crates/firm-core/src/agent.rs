//! Agent state.
//!
//! Each agent carries fixed parameter draws (production coefficients,
//! preference, saving rate), mutable economic state (savings, loan, wage,
//! effort levels) and the outcome of its most recent review. The review
//! outcome is a tagged enum rather than a set of boolean flags, so
//! inconsistent flag combinations cannot be represented; the flags only
//! reappear as 0/1 columns when a record row is emitted.

use firm_events::{AgentRecord, DecisionKind};

/// Outcome of one decision-engine review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionOutcome {
    /// Not selected for review this step
    #[default]
    Idle,
    /// Reviewed and kept the current role
    Stay,
    /// Self-employed agent joined a firm
    BecomeEmployee { employer: u32, borrowed: bool },
    /// Employed agent switched firms
    Move { employer: u32, borrowed: bool },
    /// Left to run its own firm
    Startup { borrowed: bool },
    /// Desired action denied; agent kept its prior role
    Thwart,
}

impl DecisionOutcome {
    /// Whether the agent was selected for review at all.
    pub fn reviewed(&self) -> bool {
        !matches!(self, DecisionOutcome::Idle)
    }

    /// Whether a loan was originated by this review.
    pub fn borrowed(&self) -> bool {
        matches!(
            self,
            DecisionOutcome::BecomeEmployee { borrowed: true, .. }
                | DecisionOutcome::Move { borrowed: true, .. }
                | DecisionOutcome::Startup { borrowed: true }
        )
    }

    /// Event-log kind for this outcome, if the agent was reviewed.
    pub fn kind(&self) -> Option<DecisionKind> {
        match self {
            DecisionOutcome::Idle => None,
            DecisionOutcome::Stay => Some(DecisionKind::Stay),
            DecisionOutcome::BecomeEmployee { .. } => Some(DecisionKind::BecomeEmployee),
            DecisionOutcome::Move { .. } => Some(DecisionKind::Move),
            DecisionOutcome::Startup { .. } => Some(DecisionKind::Startup),
            DecisionOutcome::Thwart => Some(DecisionKind::Thwart),
        }
    }
}

/// Full per-agent state.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Stable identity for the simulation lifetime
    pub id: u32,
    /// Time endowment
    pub omega: f64,
    /// Consumption/leisure preference, in (0, 1)
    pub theta: f64,
    /// Linear production coefficient
    pub a: f64,
    /// Increasing-returns production coefficient
    pub b: f64,
    /// Returns-to-scale exponent
    pub beta: f64,
    /// Saving rate
    pub rate: f64,
    /// Last computed self-employment utility
    pub u_self: f64,
    /// Optimal self-employment effort
    pub e_self: f64,
    /// Chosen effort in the current role
    pub e_star: f64,
    /// Firm head the agent currently works under (own id if self-employed)
    pub firm: u32,
    /// Last realized payment
    pub wage: f64,
    pub savings: f64,
    /// Outstanding loan principal, always >= 0
    pub loan: f64,
    /// Social network degree (fixed at setup)
    pub links: u32,
    /// Social network component index (fixed at setup)
    pub component: u32,
    /// Outcome of this step's review, reset at the start of each step
    pub outcome: DecisionOutcome,
}

impl AgentState {
    /// A fresh self-employed agent with the given fixed draws.
    pub fn new(id: u32, theta: f64, a: f64, b: f64, beta: f64, rate: f64) -> Self {
        Self {
            id,
            omega: 1.0,
            theta,
            a,
            b,
            beta,
            rate,
            u_self: 0.0,
            e_self: 0.0,
            e_star: 0.0,
            firm: id,
            wage: 0.0,
            savings: 0.0,
            loan: 0.0,
            links: 0,
            component: 0,
            outcome: DecisionOutcome::Idle,
        }
    }

    pub fn net_worth(&self) -> f64 {
        self.savings - self.loan
    }

    pub fn is_self_employed(&self) -> bool {
        self.firm == self.id
    }

    /// Snapshot this agent as one history row for step `t`.
    pub fn to_record(&self, t: u64) -> AgentRecord {
        let (startup, moved, thwart) = match self.outcome {
            DecisionOutcome::Startup { .. } => (1, 0, 0),
            DecisionOutcome::BecomeEmployee { .. } | DecisionOutcome::Move { .. } => (0, 1, 0),
            DecisionOutcome::Thwart => (0, 0, 1),
            DecisionOutcome::Stay | DecisionOutcome::Idle => (0, 0, 0),
        };

        AgentRecord {
            t,
            id: self.id,
            omega: self.omega,
            theta: self.theta,
            links: self.links,
            component: self.component,
            a: self.a,
            b: self.b,
            beta: self.beta,
            rate: self.rate,
            u_self: self.u_self,
            e_self: self.e_self,
            e_star: self.e_star,
            firm: self.firm,
            wage: self.wage,
            savings: self.savings,
            loan: self.loan,
            borrow: u8::from(self.outcome.borrowed()),
            startup,
            moved,
            thwart,
            go: u8::from(self.outcome.reviewed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> AgentState {
        AgentState::new(3, 0.5, 0.25, 1.0, 1.25, 0.03)
    }

    #[test]
    fn test_new_agent_is_self_employed() {
        let a = agent();
        assert!(a.is_self_employed());
        assert_eq!(a.firm, 3);
        assert_eq!(a.loan, 0.0);
        assert_eq!(a.outcome, DecisionOutcome::Idle);
    }

    #[test]
    fn test_outcome_flags_are_mutually_exclusive() {
        let mut a = agent();

        a.outcome = DecisionOutcome::Startup { borrowed: true };
        let rec = a.to_record(0);
        assert_eq!(
            (rec.go, rec.startup, rec.moved, rec.thwart, rec.borrow),
            (1, 1, 0, 0, 1)
        );

        a.outcome = DecisionOutcome::Thwart;
        let rec = a.to_record(0);
        assert_eq!(
            (rec.go, rec.startup, rec.moved, rec.thwart, rec.borrow),
            (1, 0, 0, 1, 0)
        );

        a.outcome = DecisionOutcome::Idle;
        let rec = a.to_record(0);
        assert_eq!(
            (rec.go, rec.startup, rec.moved, rec.thwart, rec.borrow),
            (0, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_become_employee_counts_as_move() {
        let mut a = agent();
        a.outcome = DecisionOutcome::BecomeEmployee {
            employer: 1,
            borrowed: false,
        };
        let rec = a.to_record(7);
        assert_eq!(rec.moved, 1);
        assert_eq!(rec.borrow, 0);
        assert_eq!(rec.t, 7);
    }

    #[test]
    fn test_net_worth() {
        let mut a = agent();
        a.savings = 1.0;
        a.loan = 0.4;
        assert!((a.net_worth() - 0.6).abs() < 1e-12);
    }
}
