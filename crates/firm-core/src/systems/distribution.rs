//! Output distribution.
//!
//! Runs once per step over the whole network, after every review for the
//! step has been applied. Pooling groups are the strongly-connected
//! components of the directed employment graph; members split the group's
//! output equally and bank their share at their individual saving rate.
//!
//! Pooling by strong rather than weak connectivity is a deliberate,
//! documented choice carried over from the model's revision to directed
//! semantics. Under it a plain worker -> employer chain does not share
//! output with the employer, only mutual-employment cycles do; the weak
//! grouping remains available from the network for comparison.

use crate::agent::AgentState;
use crate::network::EmploymentNetwork;

/// Distribute every firm's output to its members, updating wages and
/// savings in place.
pub fn distribute_output(agents: &mut [AgentState], network: &EmploymentNetwork) {
    for group in network.strong_components() {
        let n = group.len() as f64;

        // Production runs on the coefficients of the firm the group works
        // under; for singletons that is the agent's own firm head.
        let firm = agents[group[0] as usize].firm as usize;
        let (a, b, beta) = (agents[firm].a, agents[firm].b, agents[firm].beta);

        let total_effort: f64 = group.iter().map(|&j| agents[j as usize].e_star).sum();
        let total_output = a * total_effort + b * total_effort.powf(beta);
        let share = total_output / n;

        for &j in &group {
            let agent = &mut agents[j as usize];
            agent.wage = share;
            agent.savings += share * agent.rate;
        }
    }
}
