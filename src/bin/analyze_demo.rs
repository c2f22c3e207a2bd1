//! Demo that runs the full pipeline on a small sample corpus and one
//! monitoring pass against in-process mock collaborators.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

use policy_risk_analyzer::{
    assess_risk, find_similar, AlertThresholdEngine, AlertThresholds, EngineError,
    EmbeddingEngine, IndicatorDelta, IndicatorFeed, IndicatorSnapshot, NewsAnalysis, NewsSource,
    PolicyAnalysisClient, PolicyMonitor, PolicyRecord,
};

struct DemoAnalysis;

#[async_trait]
impl PolicyAnalysisClient for DemoAnalysis {
    async fn analyze_policy(&self, _policy_text: &str) -> Result<NewsAnalysis, EngineError> {
        Ok(NewsAnalysis {
            sources: vec![
                NewsSource {
                    date: Utc::now(),
                    sentiment: 0.25,
                },
                NewsSource {
                    date: Utc::now() - ChronoDuration::days(10),
                    sentiment: 0.35,
                },
            ],
        })
    }
}

struct DemoFeed;

#[async_trait]
impl IndicatorFeed for DemoFeed {
    async fn indicators(&self, _policy_type: &str) -> Result<IndicatorSnapshot, EngineError> {
        Ok(IndicatorSnapshot {
            inflation: Some(IndicatorDelta { change: 0.025 }),
            gdp: Some(IndicatorDelta { change: -0.004 }),
            ..Default::default()
        })
    }
}

fn sample_corpus() -> Vec<PolicyRecord> {
    vec![
        PolicyRecord::new(1, "broad tariff on imported steel and aluminum")
            .year(1984)
            .policy_type("trade")
            .jurisdiction("US")
            .outcome("price increase in downstream manufacturing and export decline"),
        PolicyRecord::new(2, "payroll tax credit for small business hiring")
            .year(2004)
            .policy_type("labor")
            .jurisdiction("US")
            .outcome("modest employment growth in covered sectors"),
        PolicyRecord::new(3, "import tariff on finished steel goods")
            .year(2002)
            .policy_type("trade")
            .jurisdiction("US")
            .outcome("employment reduction in steel-consuming industries"),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let corpus = sample_corpus();
    let engine = EmbeddingEngine::default();
    let texts: Vec<&str> = corpus.iter().map(|r| r.text.as_str()).collect();
    engine.train(&texts);

    let query = "new tariff on imported steel products";
    let matches = find_similar(&engine, query, &corpus, 0.1, None)?;
    println!("matches: {}", serde_json::to_string_pretty(&matches)?);

    let assessment = assess_risk(&matches);
    println!("assessment: {}", serde_json::to_string_pretty(&assessment)?);

    let monitor = PolicyMonitor::new(
        Arc::new(DemoAnalysis),
        Arc::new(DemoFeed),
        AlertThresholdEngine::new(AlertThresholds::default_seed()),
    );
    let alerts = monitor.monitor_policy(1, query, "trade").await;
    println!("alerts: {}", serde_json::to_string_pretty(&alerts)?);

    println!("analyze-demo done");
    Ok(())
}
