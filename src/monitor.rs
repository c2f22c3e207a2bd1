//! # Policy Monitor
//! Async monitoring pass over the two external collaborators: the news
//! analysis service (sentiment) and the economic indicator feed.
//!
//! The two checks are independent suspension points with no ordering
//! between them. A failure or timeout in one is logged and degrades
//! that check to an empty contribution; the pass returns whatever
//! alerts the other check produced. Retry policy belongs to callers.

use crate::alert::{Alert, AlertThresholdEngine, IndicatorSnapshot, NewsSource};
use crate::error::EngineError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// News analysis payload for one policy text.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewsAnalysis {
    #[serde(default)]
    pub sources: Vec<NewsSource>,
}

/// External news-analysis collaborator.
#[async_trait]
pub trait PolicyAnalysisClient: Send + Sync {
    async fn analyze_policy(&self, policy_text: &str) -> Result<NewsAnalysis, EngineError>;
}

/// External economic-indicator collaborator.
#[async_trait]
pub trait IndicatorFeed: Send + Sync {
    async fn indicators(&self, policy_type: &str) -> Result<IndicatorSnapshot, EngineError>;
}

pub type DynAnalysisClient = Arc<dyn PolicyAnalysisClient>;
pub type DynIndicatorFeed = Arc<dyn IndicatorFeed>;

/// Runs threshold checks against both collaborators for one policy.
pub struct PolicyMonitor {
    analysis: DynAnalysisClient,
    feed: DynIndicatorFeed,
    engine: AlertThresholdEngine,
    call_timeout: Duration,
}

impl PolicyMonitor {
    pub fn new(
        analysis: DynAnalysisClient,
        feed: DynIndicatorFeed,
        engine: AlertThresholdEngine,
    ) -> Self {
        Self {
            analysis,
            feed,
            engine,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Caller-supplied timeout applied to each external call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Sentiment check alone; propagates collaborator failures.
    pub async fn sentiment_check(
        &self,
        policy_id: i64,
        policy_text: &str,
    ) -> Result<Vec<Alert>, EngineError> {
        let analysis = tokio::time::timeout(
            self.call_timeout,
            self.analysis.analyze_policy(policy_text),
        )
        .await
        .map_err(|_| EngineError::ExternalService("news analysis call timed out".into()))??;

        Ok(self
            .engine
            .check_sentiment(policy_id, &analysis.sources)
            .into_iter()
            .collect())
    }

    /// Indicator check alone; propagates collaborator failures.
    pub async fn indicator_check(
        &self,
        policy_id: i64,
        policy_type: &str,
    ) -> Result<Vec<Alert>, EngineError> {
        let snapshot =
            tokio::time::timeout(self.call_timeout, self.feed.indicators(policy_type))
                .await
                .map_err(|_| {
                    EngineError::ExternalService("indicator feed call timed out".into())
                })??;

        Ok(self.engine.check_indicators(policy_id, &snapshot))
    }

    /// Full monitoring pass. Each check is isolated: a failure is
    /// logged and the pass still returns the other check's alerts.
    pub async fn monitor_policy(
        &self,
        policy_id: i64,
        policy_text: &str,
        policy_type: &str,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        match self.sentiment_check(policy_id, policy_text).await {
            Ok(mut a) => alerts.append(&mut a),
            Err(e) => warn!(policy_id, error = %e, "sentiment check failed"),
        }

        match self.indicator_check(policy_id, policy_type).await {
            Ok(mut a) => alerts.append(&mut a),
            Err(e) => warn!(policy_id, error = %e, "indicator check failed"),
        }

        alerts
    }
}
