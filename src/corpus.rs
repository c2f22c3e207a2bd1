//! # Policy Corpus
//! Record type for the historical policy corpus supplied by the
//! persistence collaborator. Immutable once loaded for a training pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One historical policy with its observed outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: i64,
    /// Full policy text; the unit of similarity search.
    pub text: String,
    pub year: i32,
    /// Category such as "trade", "labor", "fiscal".
    pub policy_type: String,
    pub jurisdiction: String,
    #[serde(default)]
    pub risk_factors: BTreeSet<String>,
    /// Free-text narrative of what happened after enactment.
    /// Drives the keyword-based outcome classification in risk scoring.
    pub outcome_narrative: String,
}

impl PolicyRecord {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            year: 0,
            policy_type: String::new(),
            jurisdiction: String::new(),
            risk_factors: BTreeSet::new(),
            outcome_narrative: String::new(),
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn policy_type(mut self, t: impl Into<String>) -> Self {
        self.policy_type = t.into();
        self
    }

    pub fn jurisdiction(mut self, j: impl Into<String>) -> Self {
        self.jurisdiction = j.into();
        self
    }

    pub fn outcome(mut self, narrative: impl Into<String>) -> Self {
        self.outcome_narrative = narrative.into();
        self
    }

    pub fn risk_factor(mut self, f: impl Into<String>) -> Self {
        self.risk_factors.insert(f.into());
        self
    }
}
