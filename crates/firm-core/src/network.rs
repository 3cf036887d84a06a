//! Employment and social networks.
//!
//! The employment network is a directed graph in which an edge
//! `worker -> employer` means the worker currently supplies labor to that
//! employer. Every node has out-degree at most one; in-degree is
//! unbounded. Firms are not stored anywhere: output pooling uses the
//! strongly-connected-component partition, while the decision engine and
//! census use the directed-reachability grouping under a common firm head.
//! Both groupings are exposed so downstream analysis can compare them.
//!
//! The social network is a static undirected graph fixed at setup; it
//! bounds each agent's employer search to its neighborhood.

use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::Direction;

use crate::error::SimError;

/// Directed graph of current employment relations.
#[derive(Debug, Clone)]
pub struct EmploymentNetwork {
    graph: DiGraph<u32, ()>,
}

impl EmploymentNetwork {
    /// An edgeless network over agents `0..n`.
    pub fn new(n: u32) -> Self {
        let mut graph = DiGraph::with_capacity(n as usize, n as usize);
        for id in 0..n {
            graph.add_node(id);
        }
        Self { graph }
    }

    pub fn agent_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn idx(id: u32) -> NodeIndex {
        NodeIndex::new(id as usize)
    }

    /// Point `worker` at `employer`, replacing any existing employment
    /// edge. `None` makes the worker self-employed.
    pub fn set_employer(&mut self, worker: u32, employer: Option<u32>) {
        let w = Self::idx(worker);
        while let Some(edge) = self.graph.first_edge(w, Direction::Outgoing) {
            self.graph.remove_edge(edge);
        }
        if let Some(e) = employer {
            if e != worker {
                self.graph.add_edge(w, Self::idx(e), ());
            }
        }
    }

    /// The agent this worker currently supplies labor to, if any.
    pub fn employer_of(&self, worker: u32) -> Option<u32> {
        self.graph
            .neighbors_directed(Self::idx(worker), Direction::Outgoing)
            .next()
            .map(|n| self.graph[n])
    }

    /// Direct employees of an agent, ascending by id.
    pub fn employees_of(&self, agent: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .graph
            .neighbors_directed(Self::idx(agent), Direction::Incoming)
            .map(|n| self.graph[n])
            .collect();
        out.sort_unstable();
        out
    }

    /// Follow employment edges up the chain to the firm head: the first
    /// agent with no employer. If the chain closes into a cycle, the
    /// smallest id on the cycle is the head, which keeps the grouping
    /// deterministic.
    pub fn firm_head(&self, agent: u32) -> u32 {
        let mut seen = vec![agent];
        let mut current = agent;
        while let Some(next) = self.employer_of(current) {
            if let Some(pos) = seen.iter().position(|&s| s == next) {
                return seen[pos..].iter().copied().min().unwrap_or(next);
            }
            seen.push(next);
            current = next;
        }
        current
    }

    /// All agents in the same firm grouping: everyone whose employer
    /// chain leads to the same head, head included. Ascending by id.
    pub fn firm_members(&self, agent: u32) -> Vec<u32> {
        let head = self.firm_head(agent);
        let mut members = vec![head];
        let mut frontier = vec![Self::idx(head)];
        let mut visited = vec![false; self.graph.node_count()];
        visited[head as usize] = true;

        while let Some(node) = frontier.pop() {
            for worker in self.graph.neighbors_directed(node, Direction::Incoming) {
                let id = self.graph[worker];
                if !visited[id as usize] {
                    visited[id as usize] = true;
                    members.push(id);
                    frontier.push(worker);
                }
            }
        }

        members.sort_unstable();
        members
    }

    /// Strongly-connected-component partition, the grouping used for
    /// output pooling. Members ascend within each group; groups ascend by
    /// their smallest member.
    pub fn strong_components(&self) -> Vec<Vec<u32>> {
        let mut groups: Vec<Vec<u32>> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .map(|scc| {
                let mut ids: Vec<u32> = scc.into_iter().map(|n| self.graph[n]).collect();
                ids.sort_unstable();
                ids
            })
            .collect();
        groups.sort_unstable_by_key(|g| g[0]);
        groups
    }

    /// Weakly-connected-component partition (edge direction ignored),
    /// exposed for comparison against the strong grouping.
    pub fn weak_components(&self) -> Vec<Vec<u32>> {
        let n = self.graph.node_count();
        let mut uf = UnionFind::<usize>::new(n);
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                uf.union(a.index(), b.index());
            }
        }

        let mut groups: Vec<Vec<u32>> = Vec::new();
        let mut group_of_root = vec![usize::MAX; n];
        for id in 0..n {
            let root = uf.find(id);
            if group_of_root[root] == usize::MAX {
                group_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[group_of_root[root]].push(id as u32);
        }
        groups
    }

    /// All `worker -> employer` edges, ascending by worker id.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut out: Vec<(u32, u32)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a], self.graph[b]))
            .collect();
        out.sort_unstable();
        out
    }

    /// Check the structural invariant: out-degree <= 1 everywhere.
    pub fn validate(&self) -> Result<(), SimError> {
        for node in self.graph.node_indices() {
            let out_degree = self
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .count();
            if out_degree > 1 {
                return Err(SimError::InvariantViolation(format!(
                    "agent {} has {} employers",
                    self.graph[node], out_degree
                )));
            }
        }
        Ok(())
    }
}

/// Static undirected social network bounding the employer search.
#[derive(Debug, Clone)]
pub struct SocialNetwork {
    graph: UnGraph<u32, ()>,
}

impl SocialNetwork {
    /// An edgeless network over agents `0..n`.
    pub fn new(n: u32) -> Self {
        let mut graph = UnGraph::with_capacity(n as usize, (n as usize) * 3);
        for id in 0..n {
            graph.add_node(id);
        }
        Self { graph }
    }

    fn idx(id: u32) -> NodeIndex {
        NodeIndex::new(id as usize)
    }

    /// Add an undirected link. Self-loops and duplicates are rejected.
    pub fn add_link(&mut self, a: u32, b: u32) -> bool {
        if a == b || self.has_link(a, b) {
            return false;
        }
        self.graph.add_edge(Self::idx(a), Self::idx(b), ());
        true
    }

    pub fn has_link(&self, a: u32, b: u32) -> bool {
        self.graph.find_edge(Self::idx(a), Self::idx(b)).is_some()
    }

    pub fn degree(&self, agent: u32) -> u32 {
        self.graph.neighbors(Self::idx(agent)).count() as u32
    }

    /// Neighbors of an agent, ascending by id.
    pub fn neighbors(&self, agent: u32) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .graph
            .neighbors(Self::idx(agent))
            .map(|n| self.graph[n])
            .collect();
        out.sort_unstable();
        out
    }

    /// Connected components, groups ascending by their smallest member.
    pub fn components(&self) -> Vec<Vec<u32>> {
        let n = self.graph.node_count();
        let mut uf = UnionFind::<usize>::new(n);
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                uf.union(a.index(), b.index());
            }
        }

        let mut groups: Vec<Vec<u32>> = Vec::new();
        let mut group_of_root = vec![usize::MAX; n];
        for id in 0..n {
            let root = uf.find(id);
            if group_of_root[root] == usize::MAX {
                group_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[group_of_root[root]].push(id as u32);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_employer_replaces_edge() {
        let mut net = EmploymentNetwork::new(4);
        net.set_employer(0, Some(1));
        assert_eq!(net.employer_of(0), Some(1));

        net.set_employer(0, Some(2));
        assert_eq!(net.employer_of(0), Some(2));
        assert_eq!(net.edge_count(), 1);

        net.set_employer(0, None);
        assert_eq!(net.employer_of(0), None);
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn test_out_degree_invariant_holds_after_mutation() {
        let mut net = EmploymentNetwork::new(5);
        for employer in [1, 2, 3, 4, 2] {
            net.set_employer(0, Some(employer));
            net.validate().unwrap();
        }
        assert_eq!(net.employer_of(0), Some(2));
    }

    #[test]
    fn test_firm_head_follows_chain() {
        let mut net = EmploymentNetwork::new(4);
        net.set_employer(0, Some(1));
        net.set_employer(1, Some(2));

        assert_eq!(net.firm_head(0), 2);
        assert_eq!(net.firm_head(1), 2);
        assert_eq!(net.firm_head(2), 2);
        assert_eq!(net.firm_head(3), 3);
    }

    #[test]
    fn test_firm_head_on_cycle_is_smallest_member() {
        let mut net = EmploymentNetwork::new(3);
        net.set_employer(1, Some(2));
        net.set_employer(2, Some(1));

        assert_eq!(net.firm_head(1), 1);
        assert_eq!(net.firm_head(2), 1);
    }

    #[test]
    fn test_firm_members_collects_whole_chain() {
        let mut net = EmploymentNetwork::new(5);
        net.set_employer(0, Some(2));
        net.set_employer(1, Some(2));
        net.set_employer(3, Some(0));

        assert_eq!(net.firm_members(2), vec![0, 1, 2, 3]);
        assert_eq!(net.firm_members(3), vec![0, 1, 2, 3]);
        assert_eq!(net.firm_members(4), vec![4]);
    }

    #[test]
    fn test_strong_components_partition_the_population() {
        let mut net = EmploymentNetwork::new(6);
        net.set_employer(0, Some(1));
        net.set_employer(2, Some(3));
        net.set_employer(3, Some(2)); // mutual employment, one SCC

        let groups = net.strong_components();
        let mut seen: Vec<u32> = groups.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);

        // Chain edges do not merge SCCs, mutual edges do
        assert!(groups.contains(&vec![0]));
        assert!(groups.contains(&vec![1]));
        assert!(groups.contains(&vec![2, 3]));
    }

    #[test]
    fn test_weak_components_differ_from_strong() {
        let mut net = EmploymentNetwork::new(3);
        net.set_employer(0, Some(1));

        let weak = net.weak_components();
        let strong = net.strong_components();

        assert!(weak.contains(&vec![0, 1]));
        assert!(strong.contains(&vec![0]));
        assert!(strong.contains(&vec![1]));
    }

    #[test]
    fn test_social_network_rejects_duplicates_and_self_loops() {
        let mut net = SocialNetwork::new(3);
        assert!(net.add_link(0, 1));
        assert!(!net.add_link(1, 0));
        assert!(!net.add_link(2, 2));

        assert_eq!(net.neighbors(0), vec![1]);
        assert_eq!(net.neighbors(1), vec![0]);
        assert_eq!(net.degree(2), 0);
    }

    #[test]
    fn test_social_components() {
        let mut net = SocialNetwork::new(4);
        net.add_link(0, 1);
        net.add_link(2, 3);

        let components = net.components();
        assert_eq!(components.len(), 2);
        assert!(components.contains(&vec![0, 1]));
        assert!(components.contains(&vec![2, 3]));
    }
}
