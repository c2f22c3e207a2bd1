//! # Alert Thresholds
//! Severity-banded threshold checks over indicator readings, plus the
//! decay-weighted sentiment aggregation that feeds the sentiment check.
//!
//! Bands share one direction convention: after normalization, "bad"
//! means the evaluated value is at or below the band limit. Bands for
//! metrics whose raw positive direction is harmful (inflation) are
//! configured as positive magnitudes and flipped, value and limits
//! together, into that convention at evaluation time.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

static RELATED_INDICATORS: Lazy<HashMap<AlertKind, BTreeSet<String>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (kind, names) in [
        (
            AlertKind::Sentiment,
            &["consumer_confidence", "business_sentiment"][..],
        ),
        (AlertKind::Inflation, &["cpi", "ppi", "wages"][..]),
        (
            AlertKind::Gdp,
            &["industrial_production", "retail_sales"][..],
        ),
    ] {
        map.insert(kind, names.iter().map(|s| s.to_string()).collect());
    }
    map
});

/// Neutral sentiment baseline; deviation is measured against this.
pub const SENTIMENT_BASELINE: f64 = 0.5;
/// Linear decay horizon for news sources, in days.
pub const SENTIMENT_DECAY_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Sentiment,
    Inflation,
    Gdp,
    Employment,
    Trade,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Sentiment => "sentiment",
            AlertKind::Inflation => "inflation",
            AlertKind::Gdp => "gdp",
            AlertKind::Employment => "employment",
            AlertKind::Trade => "trade",
        }
    }
}

/// Three ascending-severity limits for one alert kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityBands {
    pub warning: f64,
    pub alert: f64,
    pub critical: f64,
}

/// Per-kind band configuration, loaded from JSON or seeded defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default)]
    pub bands: HashMap<AlertKind, SeverityBands>,
}

impl AlertThresholds {
    /// Load configuration from a JSON file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Built-in bands: sentiment deviation and GDP change are signed
    /// negative-is-bad; inflation is a positive monthly magnitude
    /// evaluated with the sign flip. Kinds without bands never alert.
    pub fn default_seed() -> Self {
        let mut bands = HashMap::new();
        bands.insert(
            AlertKind::Sentiment,
            SeverityBands {
                warning: -0.15,
                alert: -0.25,
                critical: -0.40,
            },
        );
        bands.insert(
            AlertKind::Inflation,
            SeverityBands {
                warning: 0.01, // 1% monthly
                alert: 0.02,
                critical: 0.03,
            },
        );
        bands.insert(
            AlertKind::Gdp,
            SeverityBands {
                warning: -0.003, // -0.3% quarterly
                alert: -0.006,
                critical: -0.010,
            },
        );
        Self { bands }
    }

    pub fn bands_for(&self, kind: AlertKind) -> Option<&SeverityBands> {
        self.bands.get(&kind)
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self::default_seed()
    }
}

/// One severity-graded alert. Transient, caller-owned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: String,
    pub policy_id: i64,
    pub kind: AlertKind,
    pub metric: String,
    pub current_value: f64,
    /// Reference limit: the warning band, as configured.
    pub threshold: f64,
    pub severity: AlertSeverity,
    pub message: String,
    pub related_indicators: BTreeSet<String>,
    pub timestamp: DateTime<Utc>,
}

/// A timestamped news source with sentiment in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub date: DateTime<Utc>,
    pub sentiment: f64,
}

/// Economic delta for one indicator kind, as the feed reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDelta {
    pub change: f64,
}

/// Per-kind deltas from the indicator feed; absent kinds are unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(default)]
    pub inflation: Option<IndicatorDelta>,
    #[serde(default)]
    pub gdp: Option<IndicatorDelta>,
    #[serde(default)]
    pub employment: Option<IndicatorDelta>,
    #[serde(default)]
    pub trade: Option<IndicatorDelta>,
}

/// Most severe matching band wins: critical, then alert, then warning.
/// Returns `None` when even the warning band is not crossed.
pub fn evaluate_severity(
    value: f64,
    bands: &SeverityBands,
    positive_is_good: bool,
) -> Option<AlertSeverity> {
    let sign = if positive_is_good { -1.0 } else { 1.0 };
    let test = sign * value;

    if test <= sign * bands.critical {
        Some(AlertSeverity::Critical)
    } else if test <= sign * bands.alert {
        Some(AlertSeverity::High)
    } else if test <= sign * bands.warning {
        Some(AlertSeverity::Medium)
    } else {
        None
    }
}

/// Decay-weighted mean sentiment over news sources.
///
/// Weight decays linearly to zero at [`SENTIMENT_DECAY_DAYS`]; a source
/// at or past the horizon is fully excluded, from the weighted sum and
/// from the weight total alike. `None` when no source carries weight.
pub fn weighted_sentiment(sources: &[NewsSource], now: DateTime<Utc>) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for s in sources {
        let age_days = (now - s.date).num_seconds() as f64 / 86_400.0;
        let weight = (1.0 - age_days / SENTIMENT_DECAY_DAYS).max(0.0);
        if weight > 0.0 {
            weighted += s.sentiment * weight;
            total_weight += weight;
        }
    }

    if total_weight > 0.0 {
        Some(weighted / total_weight)
    } else {
        None
    }
}

/// Fixed indicator context attached to each alert kind. Kinds without
/// an entry carry an empty set.
pub fn related_indicators(kind: AlertKind) -> BTreeSet<String> {
    RELATED_INDICATORS.get(&kind).cloned().unwrap_or_default()
}

/// Human-readable message; kinds without a dedicated template fall back
/// to the generic one.
pub fn alert_message(kind: AlertKind, metric: &str, value: f64, threshold: f64) -> String {
    match kind {
        AlertKind::Sentiment => format!(
            "Policy sentiment changed by {:.1}% (threshold: {:.1}%)",
            value * 100.0,
            threshold * 100.0
        ),
        AlertKind::Inflation => format!(
            "Inflation impact detected: {:.1}% (threshold: {:.1}%)",
            value * 100.0,
            threshold * 100.0
        ),
        _ => format!(
            "{} changed by {:.1}% (threshold: {:.1}%)",
            metric,
            value * 100.0,
            threshold * 100.0
        ),
    }
}

/// Band checks keyed by alert kind.
#[derive(Debug, Clone, Default)]
pub struct AlertThresholdEngine {
    thresholds: AlertThresholds,
}

impl AlertThresholdEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Check one reading against its kind's bands. Absence of an alert
    /// is the normal case, not an error.
    pub fn check_value(
        &self,
        policy_id: i64,
        kind: AlertKind,
        metric: &str,
        value: f64,
        positive_is_good: bool,
    ) -> Option<Alert> {
        let bands = self.thresholds.bands_for(kind)?;
        let severity = evaluate_severity(value, bands, positive_is_good)?;
        Some(self.build_alert(policy_id, kind, metric, value, bands.warning, severity))
    }

    /// Sentiment check: aggregate the sources, measure deviation from
    /// the neutral baseline, evaluate as a negative-is-bad metric.
    pub fn check_sentiment(&self, policy_id: i64, sources: &[NewsSource]) -> Option<Alert> {
        let aggregate = weighted_sentiment(sources, Utc::now())?;
        let deviation = aggregate - SENTIMENT_BASELINE;
        self.check_value(
            policy_id,
            AlertKind::Sentiment,
            "sentiment_change",
            deviation,
            false,
        )
    }

    /// Indicator checks for every kind present in the snapshot.
    /// A rising inflation delta is harmful, so it evaluates flipped.
    pub fn check_indicators(&self, policy_id: i64, snapshot: &IndicatorSnapshot) -> Vec<Alert> {
        let checks = [
            (AlertKind::Inflation, "inflation_rate", snapshot.inflation, true),
            (AlertKind::Gdp, "gdp_change", snapshot.gdp, false),
            (
                AlertKind::Employment,
                "employment_change",
                snapshot.employment,
                false,
            ),
            (AlertKind::Trade, "trade_balance_change", snapshot.trade, false),
        ];

        let mut alerts = Vec::new();
        for (kind, metric, delta, positive_is_good) in checks {
            if let Some(d) = delta {
                if let Some(a) =
                    self.check_value(policy_id, kind, metric, d.change, positive_is_good)
                {
                    alerts.push(a);
                }
            }
        }
        alerts
    }

    fn build_alert(
        &self,
        policy_id: i64,
        kind: AlertKind,
        metric: &str,
        value: f64,
        threshold: f64,
        severity: AlertSeverity,
    ) -> Alert {
        let now = Utc::now();
        Alert {
            id: format!("ALERT-{}-{}", now.format("%Y%m%d%H%M%S"), kind.as_str()),
            policy_id,
            kind,
            metric: metric.to_string(),
            current_value: value,
            threshold,
            severity,
            message: alert_message(kind, metric, value, threshold),
            related_indicators: related_indicators(kind),
            timestamp: now,
        }
    }
}
