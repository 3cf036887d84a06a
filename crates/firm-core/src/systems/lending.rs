//! Lending subsystem.
//!
//! Two interchangeable lending policies, selected by configuration. The
//! naive policy approves any in-cap request without a repayment check and
//! exhibits a known debt-spiral behavior; it is kept selectable on purpose
//! for comparative experiments, not silently fixed. The debt-aware policy
//! projects repayment capacity over a lookahead horizon before approving.
//!
//! Loan servicing is the same under both policies: outstanding principal
//! compounds once per step, then the agent's savings are applied to it.
//! Savings are never forced negative and the loan never goes below zero;
//! any shortfall is simply carried forward as principal.

use crate::agent::AgentState;
use crate::config::SimConfig;

/// Loan approval policy, consulted by the decision engine whenever a
/// chosen role change costs more than the agent has saved.
pub trait LendingPolicy {
    /// May this agent originate a loan of `amount`, given the wage it
    /// anticipates in its chosen role?
    fn can_borrow(&self, agent: &AgentState, amount: f64, expected_wage: f64) -> bool;

    /// Candidate filter: can the agent keep servicing its existing debt
    /// on the wage a prospective employer pays? Policies without
    /// repayment reasoning accept every candidate.
    fn wage_covers_debt(&self, agent: &AgentState, expected_wage: f64) -> bool;
}

/// True when `amount` compounded at `rate` over `lookahead` steps is
/// covered by current savings plus projected repayment inflow.
///
/// The inflow is what actually reaches the loan each step: servicing
/// draws on savings, and savings grow by the banked share of the wage
/// (`wage * saving_rate`), never the whole wage.
pub fn repayable(
    savings: f64,
    wage: f64,
    saving_rate: f64,
    amount: f64,
    rate: f64,
    lookahead: u32,
) -> bool {
    savings + wage * saving_rate * f64::from(lookahead)
        >= amount * (1.0 + rate).powi(lookahead as i32)
}

fn within_cap(loan_cap: f64, outstanding: f64, amount: f64) -> bool {
    loan_cap <= 0.0 || outstanding + amount <= loan_cap
}

/// No repayment check; approves anything within the cap.
#[derive(Debug, Clone, Copy)]
pub struct NaiveLending {
    pub loan_cap: f64,
}

impl LendingPolicy for NaiveLending {
    fn can_borrow(&self, agent: &AgentState, amount: f64, _expected_wage: f64) -> bool {
        agent.loan == 0.0 && within_cap(self.loan_cap, agent.loan, amount)
    }

    fn wage_covers_debt(&self, _agent: &AgentState, _expected_wage: f64) -> bool {
        true
    }
}

/// Approves only loans the agent can plausibly repay within the horizon,
/// assuming its anticipated wage regime persists.
#[derive(Debug, Clone, Copy)]
pub struct DebtAwareLending {
    pub loan_cap: f64,
    pub lendingrate: f64,
    pub lookahead: u32,
}

impl LendingPolicy for DebtAwareLending {
    fn can_borrow(&self, agent: &AgentState, amount: f64, expected_wage: f64) -> bool {
        // Savings on hand go toward the role-change cost at origination
        // (the loan is the shortfall after them), so they cannot also
        // service the loan and are excluded from the projection.
        agent.loan == 0.0
            && within_cap(self.loan_cap, agent.loan, amount)
            && repayable(
                0.0,
                expected_wage,
                agent.rate,
                amount,
                self.lendingrate,
                self.lookahead,
            )
    }

    fn wage_covers_debt(&self, agent: &AgentState, expected_wage: f64) -> bool {
        repayable(
            agent.savings,
            expected_wage,
            agent.rate,
            agent.loan,
            self.lendingrate,
            self.lookahead,
        )
    }
}

/// Build the policy the configuration asks for.
pub fn lending_policy(config: &SimConfig) -> Box<dyn LendingPolicy> {
    if config.debt_awareness {
        Box::new(DebtAwareLending {
            loan_cap: config.loan_cap,
            lendingrate: config.lendingrate,
            lookahead: config.loan_repayment_lookahead,
        })
    } else {
        Box::new(NaiveLending {
            loan_cap: config.loan_cap,
        })
    }
}

/// Compound the outstanding loan by one period, then repay from savings.
pub fn accrue_and_repay(agent: &mut AgentState, lendingrate: f64) {
    if agent.loan == 0.0 {
        return;
    }
    let due = agent.loan * (1.0 + lendingrate);
    if due <= agent.savings {
        agent.savings -= due;
        agent.loan = 0.0;
    } else {
        agent.loan = due - agent.savings;
        agent.savings = 0.0;
    }
}
