//! Library integration tests.

use launchproof::LaunchproofError;

#[test]
fn error_types_are_public() {
    let err = LaunchproofError::RunNotFound {
        id: "run_1_ab".into(),
    };
    assert!(err.to_string().contains("run_1_ab"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> launchproof::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use launchproof::cli::{Cli, Commands};

    let cli = Cli::parse_from(["launchproof", "status", "run_1_ab", "--json"]);
    match cli.command {
        Commands::Status(args) => {
            assert_eq!(args.run_id, "run_1_ab");
            assert!(args.json);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn builtin_catalog_covers_both_tiers() {
    use launchproof::checks::{CheckRegistry, Tier};

    let registry = CheckRegistry::with_builtins().unwrap();
    let definitions = registry.all_definitions();
    assert!(definitions.iter().any(|d| d.tier == Tier::Compute));
    assert!(definitions.iter().any(|d| d.tier == Tier::Network));
}

#[test]
fn submission_parses_from_json() {
    use launchproof::context::{parse_submission, Platform};
    use std::path::Path;

    let json = r#"{"run_name": "Q3", "platform": "tiktok", "urls": [{"url": "https://a.example"}]}"#;
    let submission = parse_submission(json, Path::new("submission.json")).unwrap();
    assert_eq!(submission.platform, Platform::Tiktok);
    assert_eq!(submission.urls.len(), 1);
}
