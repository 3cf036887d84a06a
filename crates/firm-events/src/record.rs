//! History Record Types
//!
//! Row schemas for the tabular outputs: one agent row per agent per step,
//! one firm row per multi-member firm per step, and one census row per
//! step. The agent record schema is the contract consumed by downstream
//! analysis tooling and must be preserved field-for-field.

use serde::{Deserialize, Serialize};

/// One row per agent per step in `agents.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub t: u64,
    pub id: u32,
    /// Time endowment
    pub omega: f64,
    /// Consumption/leisure preference
    pub theta: f64,
    /// Social network degree
    pub links: u32,
    /// Social network component index (fixed at setup)
    pub component: u32,
    pub a: f64,
    pub b: f64,
    pub beta: f64,
    /// Saving rate
    pub rate: f64,
    pub u_self: f64,
    pub e_self: f64,
    pub e_star: f64,
    /// Current firm head
    pub firm: u32,
    pub wage: f64,
    pub savings: f64,
    pub loan: f64,
    pub borrow: u8,
    pub startup: u8,
    #[serde(rename = "move")]
    pub moved: u8,
    pub thwart: u8,
    pub go: u8,
}

/// One row per multi-member firm per step in `firms.csv`.
///
/// Singleton firms are omitted, matching the firms report of the
/// reference outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmRecord {
    pub t: u64,
    /// Firm head agent id
    pub firm_id: u32,
    /// Member count, head included
    pub size: u32,
    pub total_effort: f64,
    pub total_output: f64,
    pub average_wage: f64,
    pub total_savings: f64,
    pub total_loans: f64,
}

/// One aggregate row per step in `census.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    pub t: u64,
    /// Distinct firm groupings, singletons included
    pub num_firms: u32,
    pub num_singletons: u32,
    pub largest_firm_size: u32,
    pub mean_firm_size: f64,
    /// Share of agents working in a multi-member firm
    pub employment_rate: f64,
    pub total_savings: f64,
    pub total_loans: f64,
    pub total_wages: f64,
    pub total_effort: f64,
    pub mean_u_self: f64,
    pub wage_gini: f64,
    /// Gini over savings minus loan
    pub wealth_gini: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_record_move_field_name() {
        let record = AgentRecord {
            t: 0,
            id: 4,
            omega: 1.0,
            theta: 0.5,
            links: 3,
            component: 0,
            a: 0.2,
            b: 1.0,
            beta: 1.2,
            rate: 0.03,
            u_self: 0.4,
            e_self: 0.5,
            e_star: 0.5,
            firm: 4,
            wage: 0.6,
            savings: 0.1,
            loan: 0.0,
            borrow: 0,
            startup: 0,
            moved: 1,
            thwart: 0,
            go: 1,
        };

        // The serialized field must be called `move`, not `moved`
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""move":1"#));
        assert!(!json.contains("moved"));

        let parsed: AgentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
