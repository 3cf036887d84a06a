//! Firm reports and the economy-wide census.
//!
//! Both aggregate over the directed firm groupings (everyone reachable
//! from the same firm head), so a plain worker -> employer chain counts
//! as one firm here even though output pooling treats its members
//! separately.

use std::collections::BTreeMap;

use firm_events::{CensusRecord, FirmRecord};

use crate::agent::AgentState;
use crate::network::EmploymentNetwork;

/// Group the population by firm head.
fn firm_groups(agents: &[AgentState], network: &EmploymentNetwork) -> BTreeMap<u32, Vec<u32>> {
    let mut groups: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for agent in agents {
        let head = network.firm_head(agent.id);
        groups.entry(head).or_default().push(agent.id);
    }
    groups
}

/// One record per multi-member firm. Singletons are left out; the census
/// counts them instead.
pub fn firms_report(agents: &[AgentState], network: &EmploymentNetwork, t: u64) -> Vec<FirmRecord> {
    let mut records = Vec::new();
    for (head, members) in firm_groups(agents, network) {
        if members.len() < 2 {
            continue;
        }
        let size = members.len() as u32;
        let total_effort: f64 = members.iter().map(|&j| agents[j as usize].e_star).sum();
        let total_wages: f64 = members.iter().map(|&j| agents[j as usize].wage).sum();
        let total_savings: f64 = members.iter().map(|&j| agents[j as usize].savings).sum();
        let total_loans: f64 = members.iter().map(|&j| agents[j as usize].loan).sum();

        let firm = &agents[head as usize];
        let total_output = firm.a * total_effort + firm.b * total_effort.powf(firm.beta);

        records.push(FirmRecord {
            t,
            firm_id: head,
            size,
            total_effort,
            total_output,
            average_wage: total_wages / f64::from(size),
            total_savings,
            total_loans,
        });
    }
    records
}

/// Aggregate state of the whole economy at step `t`.
pub fn economic_census(
    agents: &[AgentState],
    network: &EmploymentNetwork,
    t: u64,
) -> CensusRecord {
    let n = agents.len() as f64;
    let groups = firm_groups(agents, network);

    let num_firms = groups.len() as u32;
    let num_singletons = groups.values().filter(|m| m.len() == 1).count() as u32;
    let largest_firm_size = groups.values().map(|m| m.len()).max().unwrap_or(0) as u32;
    let employed: usize = groups
        .values()
        .filter(|m| m.len() > 1)
        .map(|m| m.len())
        .sum();

    let wages: Vec<f64> = agents.iter().map(|a| a.wage).collect();
    let wealth: Vec<f64> = agents.iter().map(|a| a.net_worth()).collect();

    CensusRecord {
        t,
        num_firms,
        num_singletons,
        largest_firm_size,
        mean_firm_size: n / f64::from(num_firms.max(1)),
        employment_rate: employed as f64 / n,
        total_savings: agents.iter().map(|a| a.savings).sum(),
        total_loans: agents.iter().map(|a| a.loan).sum(),
        total_wages: wages.iter().sum(),
        total_effort: agents.iter().map(|a| a.e_star).sum(),
        mean_u_self: agents.iter().map(|a| a.u_self).sum::<f64>() / n,
        wage_gini: gini(&wages),
        wealth_gini: gini(&wealth),
    }
}

/// Gini coefficient as half the relative mean absolute difference.
///
/// Zero for an empty slice or a zero-mean distribution (the measure is
/// undefined there, and the census treats both as perfectly equal).
pub fn gini(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean.abs() < f64::EPSILON {
        return 0.0;
    }

    let mut abs_diff_sum = 0.0;
    for (i, &x) in values.iter().enumerate() {
        for &y in &values[i + 1..] {
            abs_diff_sum += (x - y).abs();
        }
    }
    // The i<j sum covers each pair once, hence the factor of two
    2.0 * abs_diff_sum / (2.0 * n * n * mean)
}
