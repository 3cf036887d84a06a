//! Per-agent decision engine.
//!
//! When an agent is selected to review its situation it compares the
//! utility of staying put, of working for each employer reachable through
//! its social neighborhood, and of going it alone. The winning role is
//! applied to the employment network immediately, so later reviewers in
//! the same step observe the updated economy. Ties keep the current role.
//!
//! A role change costs a multiple of the agent's wage. If savings do not
//! cover it the lending policy is consulted; approval composes a loan
//! with the role change, rejection thwarts the review and the agent keeps
//! its prior role.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::warn;

use firm_events::{CandidateEval, DecisionEvent, DecisionKind, LoanDecision};

use crate::agent::{AgentState, DecisionOutcome};
use crate::config::SimConfig;
use crate::network::{EmploymentNetwork, SocialNetwork};
use crate::systems::lending::LendingPolicy;
use crate::systems::optimizer::{optimize_effort, UtilityParams};

/// The role the review decided to take, before the capital gate.
enum ChosenRole {
    Join(u32),
    Startup,
}

/// Run one review for agent `i`, mutating agent state and the employment
/// network, and returning the event to log.
#[allow(clippy::too_many_arguments)]
pub fn review_agent(
    i: u32,
    agents: &mut [AgentState],
    employment: &mut EmploymentNetwork,
    social: &SocialNetwork,
    policy: &dyn LendingPolicy,
    config: &SimConfig,
    rng: &mut SmallRng,
    step: u64,
    event_id: String,
) -> DecisionEvent {
    let idx = i as usize;
    let old_firm = agents[idx].firm;
    let wage = agents[idx].wage;
    let u_single = agents[idx].u_self;
    let e_single = agents[idx].e_self;

    let coworkers: Vec<u32> = employment
        .firm_members(i)
        .into_iter()
        .filter(|&m| m != i)
        .collect();

    let (best, candidates) = evaluate_candidates(i, agents, employment, social, policy, &coworkers);
    let u_other = best.map_or(0.0, |(_, _, u)| u);

    let mut event = DecisionEvent::stay(event_id, step, i, old_firm, u_single);
    event.u_other = u_other;
    event.candidates = candidates;

    if coworkers.is_empty() {
        // Singleton firm: the only alternative is joining someone else.
        match best {
            Some((firm_other, e_other, u_trial)) if u_trial > u_single => {
                let cost = wage * config.cost;
                apply_role_change(
                    i,
                    ChosenRole::Join(firm_other),
                    e_other,
                    e_single,
                    cost,
                    agents,
                    employment,
                    &coworkers,
                    policy,
                    config,
                    rng,
                    &mut event,
                );
            }
            _ => {
                agents[idx].e_star = e_single;
                agents[idx].outcome = DecisionOutcome::Stay;
            }
        }
        return event;
    }

    // Employed (or employing): compare current role, best outside offer,
    // and going it alone.
    let e_coworkers: f64 = coworkers.iter().map(|&k| agents[k as usize].e_star).sum();
    let current_params = UtilityParams {
        a: agents[idx].a,
        b: agents[idx].b,
        beta: agents[idx].beta,
        omega: agents[idx].omega,
        theta: agents[idx].theta,
        e_others: e_coworkers,
        n: coworkers.len() as f64 + 1.0,
    };

    let Some((e_current, u_current)) = optimize_effort(&current_params) else {
        // Numerical failure: degrade to Stay with previous levels.
        warn!(agent = i, step, "optimizer failed, review degraded to stay");
        agents[idx].outcome = DecisionOutcome::Stay;
        event.optimizer_fallback = true;
        return event;
    };
    event.u_current = Some(u_current);

    if u_single > u_current && u_single >= u_other {
        let cost = wage * config.startup_rate();
        apply_role_change(
            i,
            ChosenRole::Startup,
            e_single,
            e_current,
            cost,
            agents,
            employment,
            &coworkers,
            policy,
            config,
            rng,
            &mut event,
        );
    } else {
        match best {
            Some((firm_other, e_other, u_trial)) if u_trial > u_current => {
                let cost = wage * config.cost;
                apply_role_change(
                    i,
                    ChosenRole::Join(firm_other),
                    e_other,
                    e_current,
                    cost,
                    agents,
                    employment,
                    &coworkers,
                    policy,
                    config,
                    rng,
                    &mut event,
                );
            }
            _ => {
                agents[idx].e_star = e_current;
                agents[idx].outcome = DecisionOutcome::Stay;
            }
        }
    }

    event
}

/// Evaluate every employer reachable through the social neighborhood.
///
/// Returns the best `(firm, e_trial, u_trial)` with positive utility, if
/// any, plus the full evaluation list for the event log. Indebted agents
/// skip firms whose wage cannot service their existing loan (the
/// debt-aware candidate filter; the naive policy filters nothing).
fn evaluate_candidates(
    i: u32,
    agents: &[AgentState],
    employment: &EmploymentNetwork,
    social: &SocialNetwork,
    policy: &dyn LendingPolicy,
    coworkers: &[u32],
) -> (Option<(u32, f64, f64)>, Vec<CandidateEval>) {
    let mut best: Option<(u32, f64, f64)> = None;
    let mut evals = Vec::new();

    for j in social.neighbors(i) {
        if coworkers.contains(&j) {
            continue;
        }
        let trial = agents[j as usize].firm;
        if !policy.wage_covers_debt(&agents[i as usize], agents[trial as usize].wage) {
            continue;
        }

        let others: Vec<u32> = employment
            .firm_members(j)
            .into_iter()
            .filter(|&m| m != j)
            .collect();
        let e_others: f64 = others.iter().map(|&k| agents[k as usize].e_star).sum();
        let params = UtilityParams {
            a: agents[trial as usize].a,
            b: agents[trial as usize].b,
            beta: agents[trial as usize].beta,
            omega: agents[i as usize].omega,
            theta: agents[i as usize].theta,
            e_others,
            n: others.len() as f64 + 1.0,
        };
        let Some((e_trial, u_trial)) = optimize_effort(&params) else {
            warn!(agent = i, firm = trial, "optimizer failed on candidate firm");
            continue;
        };

        evals.push(CandidateEval {
            firm: trial,
            e_trial,
            u_trial,
        });
        if u_trial > best.map_or(0.0, |(_, _, u)| u) {
            best = Some((trial, e_trial, u_trial));
        }
    }

    (best, evals)
}

/// Apply the chosen role change, gated on capital.
#[allow(clippy::too_many_arguments)]
fn apply_role_change(
    i: u32,
    role: ChosenRole,
    e_new: f64,
    e_fallback: f64,
    cost: f64,
    agents: &mut [AgentState],
    employment: &mut EmploymentNetwork,
    coworkers: &[u32],
    policy: &dyn LendingPolicy,
    config: &SimConfig,
    rng: &mut SmallRng,
    event: &mut DecisionEvent,
) {
    let idx = i as usize;
    let old_firm = agents[idx].firm;
    event.cost = Some(cost);

    // The wage regime the agent anticipates after the change, used by the
    // debt-aware origination check.
    let expected_wage = match role {
        ChosenRole::Join(firm) => agents[firm as usize].wage,
        ChosenRole::Startup => agents[idx].wage,
    };

    let mut borrowed = false;
    if agents[idx].savings >= cost {
        agents[idx].savings -= cost;
        event.loan = Some(LoanDecision::NotNeeded);
    } else {
        let shortfall = cost - agents[idx].savings;
        if config.lending && policy.can_borrow(&agents[idx], shortfall, expected_wage) {
            agents[idx].loan = shortfall;
            agents[idx].savings = 0.0;
            borrowed = true;
            event.loan = Some(LoanDecision::Approved { amount: shortfall });
        } else {
            agents[idx].e_star = e_fallback;
            agents[idx].outcome = DecisionOutcome::Thwart;
            event.kind = DecisionKind::Thwart;
            event.loan = Some(LoanDecision::Rejected { amount: shortfall });
            return;
        }
    }

    // A departing firm head hands the firm to a surviving member before
    // leaving; its remaining employees re-point to the new owner.
    let departing_head = old_firm == i && !coworkers.is_empty();

    match role {
        ChosenRole::Join(new_firm) => {
            if departing_head {
                transfer_ownership(coworkers, agents, employment, rng);
            }
            employment.set_employer(i, Some(new_firm));
            agents[idx].firm = new_firm;
            agents[idx].e_star = e_new;
            let kind = if coworkers.is_empty() {
                DecisionKind::BecomeEmployee
            } else {
                DecisionKind::Move
            };
            agents[idx].outcome = match kind {
                DecisionKind::BecomeEmployee => DecisionOutcome::BecomeEmployee {
                    employer: new_firm,
                    borrowed,
                },
                _ => DecisionOutcome::Move {
                    employer: new_firm,
                    borrowed,
                },
            };
            event.kind = kind;
            event.new_firm = new_firm;
        }
        ChosenRole::Startup => {
            if old_firm != i {
                employment.set_employer(i, None);
                agents[idx].firm = i;
            }
            agents[idx].e_star = e_new;
            agents[idx].outcome = DecisionOutcome::Startup { borrowed };
            event.kind = DecisionKind::Startup;
            event.new_firm = i;
        }
    }
}

/// Hand a departing head's firm to one surviving member, chosen from the
/// run's generator; everyone else re-points to the new owner.
fn transfer_ownership(
    coworkers: &[u32],
    agents: &mut [AgentState],
    employment: &mut EmploymentNetwork,
    rng: &mut SmallRng,
) {
    let Some(&new_owner) = coworkers.choose(rng) else {
        return;
    };

    employment.set_employer(new_owner, None);
    agents[new_owner as usize].firm = new_owner;

    for &j in coworkers {
        if j == new_owner {
            continue;
        }
        employment.set_employer(j, Some(new_owner));
        agents[j as usize].firm = new_owner;
    }
}
