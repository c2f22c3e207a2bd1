// tests/pipeline.rs
//
// End-to-end checks over the public surface: train -> find_similar ->
// assess_risk, with the ordering, threshold, and sentinel guarantees
// callers rely on.

use policy_risk_analyzer::{
    assess_risk, cosine_similarity, find_similar, EmbeddingEngine, EngineError, PolicyRecord,
    RiskLevel,
};

fn sample_corpus() -> Vec<PolicyRecord> {
    vec![
        PolicyRecord::new(1, "broad tariff on imported steel and aluminum")
            .year(1984)
            .policy_type("trade")
            .outcome("price increase in downstream manufacturing and export decline"),
        PolicyRecord::new(2, "payroll tax credit for small business hiring")
            .year(2004)
            .policy_type("labor")
            .outcome("modest employment growth in covered sectors"),
        PolicyRecord::new(3, "import tariff on finished steel goods")
            .year(2002)
            .policy_type("trade")
            .outcome("employment reduction in steel-consuming industries"),
    ]
}

fn trained_engine(corpus: &[PolicyRecord]) -> EmbeddingEngine {
    let engine = EmbeddingEngine::default();
    let texts: Vec<&str> = corpus.iter().map(|r| r.text.as_str()).collect();
    engine.train(&texts);
    engine
}

#[test]
fn identical_query_returns_its_policy_first_with_unit_score() {
    // Scenario: query text identical to policy #2's text.
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);

    let query = corpus[1].text.clone();
    let matches = find_similar(&engine, &query, &corpus, 0.1, None).expect("valid query");

    assert!(!matches.is_empty());
    assert_eq!(matches[0].record.id, 2);
    assert!((matches[0].score - 1.0).abs() < 1e-9);
    // Ordering and threshold contracts hold for the whole result.
    for m in &matches {
        assert!(m.score >= 0.1);
        assert!(m.score <= 1.0 + 1e-9);
    }
    for w in matches.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
}

#[test]
fn empty_corpus_is_a_valid_empty_result() {
    let engine = trained_engine(&sample_corpus());
    for threshold in [0.0, 0.5, 0.99] {
        let matches = find_similar(&engine, "any query text", &[], threshold, None)
            .expect("empty corpus is not an error");
        assert!(matches.is_empty());
    }
}

#[test]
fn whitespace_query_is_rejected_before_embedding() {
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);
    let err = find_similar(&engine, "", &corpus, 0.1, None).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn self_similarity_is_one_after_training() {
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);
    let v = engine.embed(&corpus[0].text);
    assert!(v.norm > 0.0);
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
}

#[test]
fn degenerate_corpus_scores_zero_not_one() {
    // Every document carries exactly the same term set, so df == doc
    // count for all terms and every IDF collapses to zero.
    let corpus = vec![
        PolicyRecord::new(1, "uniform policy text"),
        PolicyRecord::new(2, "uniform policy text"),
        PolicyRecord::new(3, "text policy uniform"),
    ];
    let engine = trained_engine(&corpus);

    let a = engine.embed(&corpus[0].text);
    let b = engine.embed(&corpus[2].text);
    assert_eq!(a.norm, 0.0);
    assert_eq!(cosine_similarity(&a, &b), 0.0);

    let matches = find_similar(&engine, &corpus[0].text, &corpus, 0.1, None).expect("valid");
    assert!(matches.is_empty());
}

#[test]
fn precomputed_corpus_vectors_give_identical_results() {
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);
    let texts: Vec<String> = corpus.iter().map(|r| r.text.clone()).collect();
    let precomputed = engine.precompute(&texts);

    let query = "steel tariff proposal";
    let direct = find_similar(&engine, query, &corpus, 0.0, None).expect("valid");
    let via_map = find_similar(&engine, query, &corpus, 0.0, Some(&precomputed)).expect("valid");
    assert_eq!(direct, via_map);
}

#[test]
fn pipeline_flags_negative_analogs_as_high_risk() {
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);

    // Near-identical to the 2002 tariff whose aftermath was negative.
    let matches = find_similar(
        &engine,
        "import tariff on finished steel goods",
        &corpus,
        0.5,
        None,
    )
    .expect("valid query");
    assert_eq!(matches[0].record.id, 3);

    let assessment = assess_risk(&matches);
    assert_eq!(assessment.level, RiskLevel::High);
    assert!(!assessment.factors.is_empty());
    // Trade analogs contribute their year-specific recommendation.
    assert!(assessment
        .recommendations
        .iter()
        .any(|r| r == "Review trade agreements from 2002 for lessons"));
    assert!(assessment
        .recommendations
        .iter()
        .any(|r| r == "Develop workforce transition programs"));
}

#[test]
fn no_matches_assess_to_insufficient() {
    let corpus = sample_corpus();
    let engine = trained_engine(&corpus);

    let matches = find_similar(&engine, "entirely unrelated fisheries quota", &corpus, 0.9, None)
        .expect("valid query");
    assert!(matches.is_empty());

    let assessment = assess_risk(&matches);
    assert_eq!(assessment.level, RiskLevel::Insufficient);
    assert_eq!(assessment.confidence, 0.0);
    assert_eq!(
        assessment.recommendations,
        vec!["No historical analogs found for assessment".to_string()]
    );
}
