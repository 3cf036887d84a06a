//! Simulation loop.
//!
//! Single-threaded, fully synchronous discrete time steps. Within a step,
//! reviewing agents act in a shuffled order and each sees the network
//! state left by earlier reviewers; that ordering dependency is part of
//! the model, not an artifact. Output distribution and loan servicing run
//! once over the whole population after all reviews.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{debug, info};

use firm_events::{AgentRecord, CensusRecord, EdgeExport, FirmRecord, NetworkExport, NodeExport};

use crate::agent::{AgentState, DecisionOutcome};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::events::EventLogger;
use crate::network::{EmploymentNetwork, SocialNetwork};
use crate::output::census::{economic_census, firms_report};
use crate::setup::{annotate_social_position, create_agents, social_network};
use crate::systems::decision::review_agent;
use crate::systems::distribution::distribute_output;
use crate::systems::lending::{accrue_and_repay, lending_policy, LendingPolicy};

/// Outcome summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub reviews: u64,
    pub agent_records: usize,
    pub final_edges: usize,
}

/// One simulation run: owns every piece of mutable state for its
/// duration, including the seeded generator driving all stochastic calls.
pub struct Simulation {
    config: SimConfig,
    agents: Vec<AgentState>,
    social: SocialNetwork,
    employment: EmploymentNetwork,
    policy: Box<dyn LendingPolicy>,
    rng: SmallRng,
    logger: EventLogger,
    step: u64,
    agent_history: Vec<AgentRecord>,
    firm_history: Vec<FirmRecord>,
    census_history: Vec<CensusRecord>,
}

impl Simulation {
    /// Validate the configuration and set up the initial economy:
    /// every agent self-employed at its solo optimum, social links fixed,
    /// employment network empty.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut agents = create_agents(&config, &mut rng)?;
        let social = social_network(&config, &mut rng);
        annotate_social_position(&mut agents, &social);

        let employment = EmploymentNetwork::new(config.n);
        let policy = lending_policy(&config);

        Ok(Self {
            config,
            agents,
            social,
            employment,
            policy,
            rng,
            logger: EventLogger::null(),
            step: 0,
            agent_history: Vec::new(),
            firm_history: Vec::new(),
            census_history: Vec::new(),
        })
    }

    /// Stream decision events to a JSONL file instead of discarding them.
    pub fn with_event_log(mut self, path: impl AsRef<Path>) -> Result<Self, SimError> {
        self.logger = EventLogger::new(path)?;
        Ok(self)
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> Result<(), SimError> {
        let t = self.step;

        for agent in &mut self.agents {
            agent.outcome = DecisionOutcome::Idle;
        }

        let mut order: Vec<u32> = (0..self.config.n).collect();
        order.shuffle(&mut self.rng);
        for i in order {
            if self.rng.gen::<f64>() > self.config.churn {
                continue;
            }
            let event_id = self.logger.next_id();
            let event = review_agent(
                i,
                &mut self.agents,
                &mut self.employment,
                &self.social,
                self.policy.as_ref(),
                &self.config,
                &mut self.rng,
                t,
                event_id,
            );
            self.logger.log(&event)?;
        }

        // A review can only add or retarget single employment edges; if
        // the invariant broke anyway the run must not continue.
        self.employment.validate()?;

        distribute_output(&mut self.agents, &self.employment);

        if self.config.lending {
            for agent in &mut self.agents {
                accrue_and_repay(agent, self.config.lendingrate);
            }
        }

        for agent in &self.agents {
            self.agent_history.push(agent.to_record(t));
        }
        self.firm_history
            .extend(firms_report(&self.agents, &self.employment, t));
        self.census_history
            .push(economic_census(&self.agents, &self.employment, t));

        self.step += 1;
        Ok(())
    }

    /// Run all `tmax` steps. There is no early exit: a run either
    /// completes or fails.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        info!(
            n = self.config.n,
            tmax = self.config.tmax,
            seed = self.config.seed,
            debt_awareness = self.config.debt_awareness,
            "starting run"
        );

        for t in 0..self.config.tmax {
            self.step()?;
            if t > 0 && t % 100 == 0 {
                debug!(
                    step = t,
                    reviews = self.logger.event_count(),
                    edges = self.employment.edge_count(),
                    "progress"
                );
            }
        }

        self.logger.flush()?;
        let summary = RunSummary {
            steps: self.step,
            reviews: self.logger.event_count(),
            agent_records: self.agent_history.len(),
            final_edges: self.employment.edge_count(),
        };
        info!(
            steps = summary.steps,
            reviews = summary.reviews,
            edges = summary.final_edges,
            "run complete"
        );
        Ok(summary)
    }

    /// The final employment network with per-node economic state.
    pub fn network_export(&self) -> NetworkExport {
        let nodes = self
            .agents
            .iter()
            .map(|a| NodeExport {
                id: a.id,
                savings: a.savings,
                wage: a.wage,
                loan: a.loan,
                firm: a.firm,
            })
            .collect();
        let edges = self
            .employment
            .edges()
            .into_iter()
            .map(|(source, target)| EdgeExport { source, target })
            .collect();
        NetworkExport::new(nodes, edges)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn employment(&self) -> &EmploymentNetwork {
        &self.employment
    }

    pub fn social(&self) -> &SocialNetwork {
        &self.social
    }

    pub fn agent_history(&self) -> &[AgentRecord] {
        &self.agent_history
    }

    pub fn firm_history(&self) -> &[FirmRecord] {
        &self.firm_history
    }

    pub fn census_history(&self) -> &[CensusRecord] {
        &self.census_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            n: 12,
            tmax: 10,
            churn: 0.3,
            maxdegree: 4,
            seed: 42,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_one_record_per_agent_per_step() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.steps, 10);
        assert_eq!(summary.agent_records, 12 * 10);
        assert_eq!(sim.census_history().len(), 10);
    }

    #[test]
    fn test_network_invariants_hold_every_step() {
        let mut sim = Simulation::new(small_config()).unwrap();
        for _ in 0..10 {
            sim.step().unwrap();
            sim.employment().validate().unwrap();

            // SCC grouping partitions the population
            let mut covered: Vec<u32> = sim
                .employment()
                .strong_components()
                .into_iter()
                .flatten()
                .collect();
            covered.sort_unstable();
            assert_eq!(covered, (0..12).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_loans_never_negative() {
        let mut sim = Simulation::new(SimConfig {
            churn: 0.5,
            ..small_config()
        })
        .unwrap();
        sim.run().unwrap();

        for record in sim.agent_history() {
            assert!(record.loan >= 0.0);
            assert!(record.savings >= 0.0);
        }
    }

    #[test]
    fn test_export_matches_population() {
        let mut sim = Simulation::new(small_config()).unwrap();
        sim.run().unwrap();

        let export = sim.network_export();
        assert!(export.directed);
        assert_eq!(export.nodes.len(), 12);
        assert_eq!(export.edges.len(), sim.employment().edge_count());
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let config = SimConfig {
            tmax: 0,
            ..SimConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }
}
