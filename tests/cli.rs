//! CLI smoke tests against the built-in sample dataset.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn generate_produces_article_text() {
    Command::cargo_bin("newsmill")
        .unwrap()
        .args(["generate", "--location", "FI", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>"));
}

#[test]
fn generate_json_output_has_headline_and_body() {
    Command::cargo_bin("newsmill")
        .unwrap()
        .args(["generate", "--location", "FI", "--seed", "7", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"headline\""))
        .stdout(predicate::str::contains("\"body\""));
}

#[test]
fn same_seed_gives_same_output() {
    let run = || {
        Command::cargo_bin("newsmill")
            .unwrap()
            .args(["generate", "--location", "SE", "--seed", "123"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn locations_lists_sample_countries() {
    Command::cargo_bin("newsmill")
        .unwrap()
        .arg("locations")
        .assert()
        .success()
        .stdout(predicate::str::contains("FI"))
        .stdout(predicate::str::contains("all"));
}

#[test]
fn languages_lists_registered_packs() {
    Command::cargo_bin("newsmill")
        .unwrap()
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("en"))
        .stdout(predicate::str::contains("fi"));
}

#[test]
fn schema_emits_json() {
    Command::cargo_bin("newsmill")
        .unwrap()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"planner\""));
}
