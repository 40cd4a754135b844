//! Focused unit tests covering rank CLI configuration and output.

use super::helpers::{NOW, Workspace, decode, now};
use super::*;
use crate::rank::{RankArgs, RankConfig, config_from_layers_for_test, execute_rank};
use dinematch_core::UserId;
use rstest::rstest;

fn config(workspace: &Workspace, user: &str) -> RankConfig {
    RankConfig {
        user_id: UserId::from(user),
        dataset: workspace.dataset(),
        weights: None,
        limit: None,
        now: now(),
    }
}

#[rstest]
#[case(None, Some("dataset.json"), ARG_USER_ID, ENV_RANK_USER_ID)]
#[case(Some("ana"), None, ARG_DATASET, ENV_RANK_DATASET)]
fn converting_without_required_fields_errors(
    #[case] user_id: Option<&str>,
    #[case] dataset: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = RankArgs {
        user_id: user_id.map(str::to_owned),
        dataset: dataset.map(Into::into),
        ..RankArgs::default()
    };
    let err = RankConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn converting_rejects_malformed_timestamps() {
    let args = RankArgs {
        user_id: Some("ana".to_owned()),
        dataset: Some("dataset.json".into()),
        now: Some("last tuesday".to_owned()),
        ..RankArgs::default()
    };
    let err = RankConfig::try_from(args).expect_err("bad timestamp should error");
    match err {
        CliError::InvalidTimestamp { value, .. } => assert_eq!(value, "last tuesday"),
        other => panic!("expected InvalidTimestamp, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_dataset() {
    let workspace = Workspace::new();
    let config = RankConfig {
        dataset: workspace.root().join("absent.json"),
        ..config(&workspace, "ana")
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATASET),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directory_weights() {
    let workspace = Workspace::new();
    let weights = workspace.root().join("weights");
    std::fs::create_dir(weights.as_std_path()).expect("weights directory");
    let config = RankConfig {
        weights: Some(weights.clone()),
        ..config(&workspace, "ana")
    };
    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_WEIGHTS);
            assert_eq!(path, weights);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn rank_prints_matches_and_offers() {
    let workspace = Workspace::new();
    let mut output = Vec::new();
    execute_rank(&config(&workspace, "ana"), &mut output).expect("rank succeeds");

    let value = decode(&output);
    assert_eq!(value.pointer("/user_id").and_then(|v| v.as_str()), Some("ana"));
    assert_eq!(
        value
            .pointer("/matches/0/restaurant/id")
            .and_then(|v| v.as_str()),
        Some("r-thai")
    );
    assert!(value.pointer("/matches/0/breakdown/location").is_some());
    assert_eq!(
        value.pointer("/offers/0/status").and_then(|v| v.as_str()),
        Some("active")
    );
    assert_eq!(
        value.pointer("/offers/0/expires_at").and_then(|v| v.as_str()),
        Some("2024-07-01T12:00:00Z")
    );
}

#[rstest]
fn rank_honours_limit() {
    let workspace = Workspace::new();
    let mut output = Vec::new();
    let config = RankConfig {
        limit: Some(0),
        ..config(&workspace, "ana")
    };
    execute_rank(&config, &mut output).expect("rank succeeds");

    let value = decode(&output);
    assert_eq!(
        value
            .pointer("/matches")
            .and_then(|v| v.as_array())
            .map(Vec::len),
        Some(0)
    );
}

#[rstest]
fn rank_reports_unknown_user() {
    let workspace = Workspace::new();
    let mut output = Vec::new();
    let err = execute_rank(&config(&workspace, "zed"), &mut output).expect_err("unknown user");
    match err {
        CliError::Matching(dinematch_batch::BatchError::FetchUser { user_id, .. }) => {
            assert_eq!(user_id.as_str(), "zed");
        }
        other => panic!("expected Matching, found {other:?}"),
    }
    assert!(output.is_empty());
}

#[rstest]
#[case::malformed("{ not json", "parse")]
#[case::negative(r#"{"weights": {"location": -0.5}}"#, "invalid")]
fn rank_rejects_bad_weights(#[case] contents: &str, #[case] expected: &str) {
    let workspace = Workspace::new();
    let config = RankConfig {
        weights: Some(workspace.file("weights.json", contents)),
        ..config(&workspace, "ana")
    };
    let err = execute_rank(&config, &mut Vec::new()).expect_err("bad weights");
    match (expected, err) {
        ("parse", CliError::ParseWeights { .. }) | ("invalid", CliError::InvalidWeights { .. }) => {}
        (_, other) => panic!("expected {expected} weights error, found {other:?}"),
    }
}

#[rstest]
fn rank_reports_malformed_dataset() {
    let workspace = Workspace::new();
    let config = RankConfig {
        dataset: workspace.file("broken.json", "[1, 2"),
        ..config(&workspace, "ana")
    };
    match execute_rank(&config, &mut Vec::new()).expect_err("bad dataset") {
        CliError::ParseDataset { path, .. } => assert!(path.as_str().ends_with("broken.json")),
        other => panic!("expected ParseDataset, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "dataset": "from-file.json", "limit": 3, "now": NOW }),
        None,
    );
    composer.push_environment(json!({ "dataset": "from-env.json" }));
    composer.push_cli(json!({ "user_id": "ana" }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config");
    assert_eq!(config.user_id.as_str(), "ana");
    assert_eq!(config.dataset.as_str(), "from-env.json");
    assert_eq!(config.limit, Some(3));
    assert_eq!(config.now, now());
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "limit": "many" }));

    match config_from_layers_for_test(composer.layers()).expect_err("invalid layer") {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}
