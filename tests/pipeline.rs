//! End-to-end pipeline tests over the built-in English resources.

use std::collections::BTreeMap;

use newsmill::config::{Config, PlannerKind};
use newsmill::data::{InMemoryStore, Row};
use newsmill::resources::standard_registry;
use newsmill::service::{GenerationRequest, NewsService};

fn config() -> Config {
    let mut config = Config::default();
    config.scoring.reference_year = Some(2020);
    config
}

fn service() -> NewsService {
    NewsService::new(standard_registry().unwrap(), config())
}

fn request(location: &str, seed: u64) -> GenerationRequest {
    GenerationRequest {
        language: "en".to_string(),
        location: location.to_string(),
        location_type: "C".to_string(),
        planner: PlannerKind::Full,
        seed: Some(seed),
    }
}

fn single_row_store() -> InMemoryStore {
    let mut values = BTreeMap::new();
    values.insert("cphi:hicp2015:cp-hi00".to_string(), 102.3);
    values.insert("cphi:hicp2015:cp-hi00:outlierness".to_string(), 1.0);
    InMemoryStore::new(vec![Row {
        location: "FI".to_string(),
        location_type: "C".to_string(),
        timestamp: "2020".to_string(),
        timestamp_type: "year".to_string(),
        agent: String::new(),
        agent_type: String::new(),
        values,
    }])
}

#[test]
fn single_fact_renders_value_country_and_year() {
    let service = service();
    let store = single_row_store();
    let article = service.run_pipeline(&store, &request("FI", 3));

    assert!(!article.body.is_empty());
    assert!(article.body.contains("102.3"), "body: {}", article.body);
    assert!(article.body.contains("Finland"), "body: {}", article.body);
    assert!(article.body.contains("2020"), "body: {}", article.body);
    // The category code was realized into prose, not echoed raw.
    assert!(!article.body.contains("cp-hi00"), "body: {}", article.body);
    assert!(!article.body.contains("[ENTITY:"), "body: {}", article.body);
    assert!(!article.body.contains("[TIME:"), "body: {}", article.body);
    assert!(!article.body.contains("[UNIT:"), "body: {}", article.body);
}

#[test]
fn repeated_runs_with_same_seed_are_byte_identical() {
    let store = InMemoryStore::sample(2020);

    // Fresh service instances as well as repeated calls on one instance.
    let first = service().run_pipeline(&store, &request("FI", 42));
    let second = service().run_pipeline(&store, &request("FI", 42));
    assert_eq!(first.headline, second.headline);
    assert_eq!(first.body, second.body);

    let service = service();
    let third = service.run_pipeline(&store, &request("FI", 42));
    let fourth = service.run_pipeline(&store, &request("FI", 42));
    assert_eq!(third.headline, fourth.headline);
    assert_eq!(third.body, fourth.body);
}

#[test]
fn sample_dataset_yields_multi_sentence_body() {
    let service = service();
    let store = InMemoryStore::sample(2020);
    let article = service.run_pipeline(&store, &request("FI", 7));

    assert!(article.body.starts_with("<p>"));
    assert!(article.body.trim_end().ends_with("</p>"));
    // More than one sentence survives planning and realization.
    assert!(article.body.matches(". ").count() >= 2, "body: {}", article.body);
}

#[test]
fn every_planner_variant_completes() {
    let store = InMemoryStore::sample(2020);
    for planner in [
        PlannerKind::Full,
        PlannerKind::Score,
        PlannerKind::EarlyStop,
        PlannerKind::Random,
    ] {
        let service = service();
        let mut req = request("FI", 11);
        req.planner = planner;
        let article = service.run_pipeline(&store, &req);
        assert!(
            article.body.contains("<p>"),
            "planner {:?} produced no paragraphs: {}",
            planner,
            article.body
        );
    }
}

#[test]
fn finnish_pipeline_renders_translated_output() {
    let store = InMemoryStore::sample(2020);
    let service = service();
    let mut req = request("FI", 5);
    req.language = "fi".to_string();
    let article = service.run_pipeline(&store, &req);

    assert!(article.body.contains("Suomi"), "body: {}", article.body);
    assert!(!article.body.contains("[ENTITY:"), "body: {}", article.body);
}

#[test]
fn headline_mentions_the_location() {
    let store = InMemoryStore::sample(2020);
    let article = service().run_pipeline(&store, &request("FI", 9));
    assert!(
        article.headline.contains("Finland"),
        "headline: {}",
        article.headline
    );
    // Headlines are bare text, not HTML.
    assert!(!article.headline.contains("<p>"));
}
