//! # Risk Scorer
//! Pure logic that maps ranked similarity matches to a risk verdict.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Outcome classification is a deliberate keyword heuristic, not NLP:
//! the base-score matrix below is defined relative to these exact word
//! lists and their mixed-wins-on-conflict precedence, so "improving"
//! the classifier would silently move every downstream score.

use crate::similarity::SimilarityMatch;
use serde::{Deserialize, Serialize};

const INCREASE_WORDS: [&str; 3] = ["increase", "growth", "improve"];
const DECREASE_WORDS: [&str; 3] = ["decrease", "reduction", "decline"];

/// Graded verdict for the assessed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Insufficient,
    Low,
    LowMedium,
    Medium,
    High,
}

/// How a historical analog's narrative reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Positive,
    Negative,
    Mixed,
}

/// One contributing analog whose outcome was not positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub narrative: String,
    pub year: i32,
    pub policy_type: String,
    pub similarity: f64,
}

/// Aggregate verdict over all analogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: f64,
    /// In `[0, 1]`; how much total similarity mass backs the verdict.
    pub confidence: f64,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// Sentinel returned when there is no usable signal.
    pub fn insufficient() -> Self {
        Self {
            level: RiskLevel::Insufficient,
            score: 0.0,
            confidence: 0.0,
            factors: Vec::new(),
            recommendations: vec!["No historical analogs found for assessment".to_string()],
        }
    }
}

/// Classify a narrative by keyword. Conflicting signals win: a text
/// with both an increase-class and a decrease-class word is `Mixed`,
/// regardless of counts. Texts matching neither list default to `Mixed`.
pub fn classify_outcome(narrative: &str) -> OutcomeClass {
    let lower = narrative.to_lowercase();
    let has_increase = INCREASE_WORDS.iter().any(|w| lower.contains(w));
    let has_decrease = DECREASE_WORDS.iter().any(|w| lower.contains(w));
    match (has_increase, has_decrease) {
        (true, true) => OutcomeClass::Mixed,
        (true, false) => OutcomeClass::Positive,
        (false, true) => OutcomeClass::Negative,
        (false, false) => OutcomeClass::Mixed,
    }
}

/// Per-match base score from the (outcome x similarity-band) matrix.
/// Bands: similarity > 0.85 high, > 0.70 mid, else low.
pub fn base_score(outcome: OutcomeClass, similarity: f64) -> f64 {
    match outcome {
        OutcomeClass::Negative => {
            if similarity > 0.85 {
                0.90
            } else if similarity > 0.70 {
                0.70
            } else {
                0.50
            }
        }
        OutcomeClass::Mixed => {
            if similarity > 0.85 {
                0.60
            } else if similarity > 0.70 {
                0.40
            } else {
                0.30
            }
        }
        OutcomeClass::Positive => {
            if similarity > 0.85 {
                0.20
            } else if similarity > 0.70 {
                0.10
            } else {
                0.05
            }
        }
    }
}

fn level_for(score: f64) -> RiskLevel {
    if score > 0.7 {
        RiskLevel::High
    } else if score > 0.5 {
        RiskLevel::Medium
    } else if score > 0.3 {
        RiskLevel::LowMedium
    } else if score > 0.1 {
        RiskLevel::Low
    } else {
        RiskLevel::Insufficient
    }
}

/// Assess risk from ranked analogs. Always returns an assessment;
/// an empty match list yields the `Insufficient` sentinel.
pub fn assess_risk(matches: &[SimilarityMatch]) -> RiskAssessment {
    if matches.is_empty() {
        return RiskAssessment::insufficient();
    }

    let mut weighted_sum = 0.0;
    let mut total_similarity = 0.0;
    let mut factors = Vec::new();

    for m in matches {
        let outcome = classify_outcome(&m.record.outcome_narrative);
        weighted_sum += base_score(outcome, m.score) * m.score;
        total_similarity += m.score;

        if outcome != OutcomeClass::Positive {
            factors.push(RiskFactor {
                narrative: m.record.outcome_narrative.clone(),
                year: m.record.year,
                policy_type: m.record.policy_type.clone(),
                similarity: m.score,
            });
        }
    }

    let score = if total_similarity > 0.0 {
        weighted_sum / total_similarity
    } else {
        0.0
    };
    let confidence = (total_similarity / matches.len() as f64).min(1.0);
    let level = level_for(score);

    RiskAssessment {
        level,
        score,
        confidence,
        recommendations: recommendations(level, &factors),
        factors,
    }
}

/// Level-based guidance first, then one line per triggered factor rule.
/// Repeated triggers repeat their line; several independent analogs
/// tripping the same rule is itself a signal.
fn recommendations(level: RiskLevel, factors: &[RiskFactor]) -> Vec<String> {
    let mut out = Vec::new();

    match level {
        RiskLevel::High => {
            out.push("Strongly consider policy redesign or mitigation strategies".to_string());
            out.push("Implement phased rollout with monitoring checkpoints".to_string());
        }
        RiskLevel::Medium => {
            out.push("Consider targeted adjustments to high-risk aspects".to_string());
            out.push("Establish monitoring framework for key indicators".to_string());
        }
        _ => {}
    }

    for f in factors {
        let narrative = f.narrative.to_lowercase();
        if f.policy_type.to_lowercase().contains("trade") {
            out.push(format!(
                "Review trade agreements from {} for lessons",
                f.year
            ));
        }
        if narrative.contains("employment") && narrative.contains("reduction") {
            out.push("Develop workforce transition programs".to_string());
        }
        if narrative.contains("price") && narrative.contains("increase") {
            out.push("Consider price stabilization measures".to_string());
        }
    }

    if out.is_empty() {
        out.push("No significant risks identified based on historical analogs".to_string());
    }
    out
}
