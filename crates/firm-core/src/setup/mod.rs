//! Population and social network setup.
//!
//! Agents are created once with sampled parameter draws; the social
//! network is a random graph with per-node degrees drawn uniformly from
//! the configured range, built configuration-model style from the run's
//! seeded generator.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use crate::agent::AgentState;
use crate::config::{ConfigError, SimConfig};
use crate::network::SocialNetwork;
use crate::systems::optimizer::singleton_utility;

/// Pairing attempts before falling back to dropping conflicting stubs.
const MAX_PAIRING_ATTEMPTS: u32 = 500;

/// Create the agent population with sampled draws and their
/// self-employment optima precomputed.
pub fn create_agents(config: &SimConfig, rng: &mut SmallRng) -> Result<Vec<AgentState>, ConfigError> {
    let normal = if config.sigma > 0.0 {
        Some(
            Normal::new(config.savingrate, config.sigma).map_err(|_| {
                ConfigError::InvalidParameter {
                    parameter: "sigma",
                    reason: "not a valid normal spread".to_string(),
                }
            })?,
        )
    } else {
        None
    };

    let mut agents = Vec::with_capacity(config.n as usize);
    for id in 0..config.n {
        let theta = rng.gen_range(0.0..1.0);
        let a = rng.gen_range(0.0..0.5);
        let b = rng.gen_range(0.75..1.25);
        let beta = rng.gen_range(1.0..1.5);
        let rate = match &normal {
            // Truncated normal: resample until the draw lands in [0, 1]
            Some(dist) => loop {
                let draw = dist.sample(rng);
                if (0.0..=1.0).contains(&draw) {
                    break draw;
                }
            },
            None => config.savingrate,
        };

        let mut agent = AgentState::new(id, theta, a, b, beta, rate);
        match singleton_utility(&agent) {
            Some((e_self, u_self, output)) => {
                agent.e_self = e_self;
                agent.u_self = u_self;
                agent.e_star = e_self;
                agent.wage = output;
            }
            None => warn!(agent = id, "self-employment optimum not finite at setup"),
        }
        agents.push(agent);
    }
    Ok(agents)
}

/// Build the static social network from a random degree sequence.
///
/// Degrees are drawn uniformly from `[mindegree, maxdegree]`, resampled
/// until their sum is even, then stubs are shuffled and paired. A pairing
/// that produces a self-loop or duplicate edge is retried wholesale; if
/// no clean pairing is found the conflicting pairs are dropped, which
/// shaves at most a link or two off a handful of nodes.
pub fn social_network(config: &SimConfig, rng: &mut SmallRng) -> SocialNetwork {
    let n = config.n;

    for attempt in 0u32.. {
        let degrees: Vec<u32> = (0..n)
            .map(|_| rng.gen_range(config.mindegree..=config.maxdegree))
            .collect();
        if degrees.iter().sum::<u32>() % 2 != 0 {
            continue;
        }

        let mut stubs: Vec<u32> = Vec::new();
        for (id, &degree) in degrees.iter().enumerate() {
            for _ in 0..degree {
                stubs.push(id as u32);
            }
        }
        stubs.shuffle(rng);

        let lenient = attempt >= MAX_PAIRING_ATTEMPTS;
        let mut network = SocialNetwork::new(n);
        let mut clean = true;
        for pair in stubs.chunks_exact(2) {
            if !network.add_link(pair[0], pair[1]) {
                clean = false;
                if !lenient {
                    break;
                }
            }
        }

        if clean {
            return network;
        }
        if lenient {
            warn!(attempt, "social network pairing kept conflicts dropped");
            return network;
        }
    }
    unreachable!("pairing loop always returns")
}

/// Stamp each agent with its social degree and component index, which
/// stay fixed for the run.
pub fn annotate_social_position(agents: &mut [AgentState], social: &SocialNetwork) {
    for (index, component) in social.components().iter().enumerate() {
        for &id in component {
            agents[id as usize].component = index as u32;
            agents[id as usize].links = social.degree(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn config(n: u32) -> SimConfig {
        SimConfig {
            n,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_agents_start_self_employed_with_optima() {
        let mut rng = SmallRng::seed_from_u64(42);
        let agents = create_agents(&config(20), &mut rng).unwrap();

        assert_eq!(agents.len(), 20);
        for agent in &agents {
            assert!(agent.is_self_employed());
            assert!(agent.u_self > 0.0);
            assert!(agent.e_self > 0.0 && agent.e_self < 1.0);
            assert_eq!(agent.e_star, agent.e_self);
            assert!(agent.wage > 0.0);
            assert_eq!(agent.savings, 0.0);
            assert_eq!(agent.loan, 0.0);
        }
    }

    #[test]
    fn test_parameter_draws_respect_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let agents = create_agents(&config(200), &mut rng).unwrap();

        for agent in &agents {
            assert!((0.0..1.0).contains(&agent.theta));
            assert!((0.0..0.5).contains(&agent.a));
            assert!((0.75..1.25).contains(&agent.b));
            assert!((1.0..1.5).contains(&agent.beta));
            assert!((0.0..=1.0).contains(&agent.rate));
        }
    }

    #[test]
    fn test_zero_sigma_gives_uniform_saving_rate() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = SimConfig {
            sigma: 0.0,
            ..config(10)
        };
        let agents = create_agents(&cfg, &mut rng).unwrap();
        for agent in &agents {
            assert_eq!(agent.rate, cfg.savingrate);
        }
    }

    #[test]
    fn test_social_network_degrees_in_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let cfg = config(50);
        let social = social_network(&cfg, &mut rng);

        for id in 0..50 {
            let degree = social.degree(id);
            assert!(
                degree <= cfg.maxdegree,
                "agent {id} has degree {degree} above the maximum"
            );
        }
    }

    #[test]
    fn test_social_network_is_deterministic() {
        let cfg = config(30);
        let mut rng1 = SmallRng::seed_from_u64(5);
        let mut rng2 = SmallRng::seed_from_u64(5);

        let net1 = social_network(&cfg, &mut rng1);
        let net2 = social_network(&cfg, &mut rng2);

        for id in 0..30 {
            assert_eq!(net1.neighbors(id), net2.neighbors(id));
        }
    }

    #[test]
    fn test_annotate_social_position() {
        let cfg = config(30);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut agents = create_agents(&cfg, &mut rng).unwrap();
        let social = social_network(&cfg, &mut rng);

        annotate_social_position(&mut agents, &social);

        for agent in &agents {
            assert_eq!(agent.links, social.degree(agent.id));
        }
        // Agents in the same component share its index
        let components = social.components();
        for (index, component) in components.iter().enumerate() {
            for &id in component {
                assert_eq!(agents[id as usize].component, index as u32);
            }
        }
    }
}
