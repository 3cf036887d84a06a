//! Effort optimization.
//!
//! An agent working under a firm with production coefficients `(a, b,
//! beta)` alongside co-workers supplying total effort `E_o` receives an
//! equal share of firm output and gives up leisure for effort:
//!
//! ```text
//! U(e) = ((a(e + E_o) + b(e + E_o)^beta) / n)^theta * (omega - e)^(1 - theta)
//! ```
//!
//! The optimum over `e in [0, 1]` is found by golden-section search on
//! the bounded interval. The function is unimodal on the domain for all
//! admissible parameter draws, and the search is deterministic for fixed
//! inputs, so repeated calls always agree.

use crate::agent::AgentState;

/// Convergence tolerance on the effort interval.
const TOLERANCE: f64 = 1e-10;

const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Inputs to one utility evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityParams {
    /// Linear production coefficient of the firm worked for
    pub a: f64,
    /// Increasing-returns coefficient of the firm worked for
    pub b: f64,
    /// Returns-to-scale exponent of the firm worked for
    pub beta: f64,
    /// The deciding agent's time endowment
    pub omega: f64,
    /// The deciding agent's consumption/leisure preference
    pub theta: f64,
    /// Total effort supplied by the other firm members
    pub e_others: f64,
    /// Firm size including the deciding agent
    pub n: f64,
}

impl UtilityParams {
    /// Parameters for an agent working alone under its own coefficients.
    pub fn singleton(agent: &AgentState) -> Self {
        Self {
            a: agent.a,
            b: agent.b,
            beta: agent.beta,
            omega: agent.omega,
            theta: agent.theta,
            e_others: 0.0,
            n: 1.0,
        }
    }
}

/// Utility at a given effort level.
pub fn utility(params: &UtilityParams, e: f64) -> f64 {
    let total_effort = e + params.e_others;
    let output_share = (params.a * total_effort + params.b * total_effort.powf(params.beta))
        / params.n;
    output_share.powf(params.theta) * (params.omega - e).powf(1.0 - params.theta)
}

/// Maximize utility over `e in [0, 1]` by golden-section search.
///
/// Returns `(e_star, u_star)`, or `None` when the evaluation is not
/// finite (a numerical failure the caller degrades to a Stay).
pub fn optimize_effort(params: &UtilityParams) -> Option<(f64, f64)> {
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;

    let mut c = hi - INV_PHI * (hi - lo);
    let mut d = lo + INV_PHI * (hi - lo);
    let mut fc = utility(params, c);
    let mut fd = utility(params, d);

    while hi - lo > TOLERANCE {
        if fc > fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - INV_PHI * (hi - lo);
            fc = utility(params, c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + INV_PHI * (hi - lo);
            fd = utility(params, d);
        }
    }

    let e_star = 0.5 * (lo + hi);
    let u_star = utility(params, e_star);
    (e_star.is_finite() && u_star.is_finite()).then_some((e_star, u_star))
}

/// Self-employment optimum: `(e_self, u_self, own_output)`.
///
/// The output value doubles as the agent's initial wage expectation.
pub fn singleton_utility(agent: &AgentState) -> Option<(f64, f64, f64)> {
    let params = UtilityParams::singleton(agent);
    let (e_star, u_star) = optimize_effort(&params)?;
    let output = agent.a * e_star + agent.b * e_star.powf(agent.beta);
    output.is_finite().then_some((e_star, u_star, output))
}
