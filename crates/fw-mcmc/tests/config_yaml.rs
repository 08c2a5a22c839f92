use std::path::PathBuf;

use fw_mcmc::{ProposalFlags, SamplerConfig, Target};

#[test]
fn empty_document_uses_defaults() {
    let config = SamplerConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, SamplerConfig::default());
    assert_eq!(config.iter, 1_000);
    assert_eq!(config.thin, 1);
    assert_eq!(config.target, Target::Uniform);
    assert_eq!(config.proposal, ProposalFlags::default());
    assert_eq!(config.chains, 1);
    assert_eq!(config.sis.max_attempts, 1_000);
    assert_eq!(config.output.trace_file(3), PathBuf::from("trace_chain3.csv"));
}

#[test]
fn full_document_parses() {
    let yaml = r#"
iter: 200
thin: 5
target: hypergeometric
chains: 4
proposal:
  hit_and_run: true
  sis: true
  non_uniform: true
sis:
  max_attempts: 50
seed_policy:
  master_seed: 7
  label: nightly
output:
  run_directory: runs/fiber
  trace_stem: walk
"#;
    let config = SamplerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.iter, 200);
    assert_eq!(config.thin, 5);
    assert_eq!(config.total_steps().unwrap(), 1_000);
    assert_eq!(config.target, Target::Hypergeometric);
    assert_eq!(config.chains, 4);
    assert!(config.proposal.hit_and_run && config.proposal.sis && config.proposal.non_uniform);
    assert!(!config.proposal.adaptive);
    assert_eq!(config.sis.max_attempts, 50);
    assert_eq!(config.seed_policy.master_seed, 7);
    assert_eq!(config.seed_policy.label.as_deref(), Some("nightly"));
    assert_eq!(config.output.run_directory, Some(PathBuf::from("runs/fiber")));
    assert_eq!(config.output.trace_file(0), PathBuf::from("walk_chain0.csv"));
    assert_eq!(config.output.manifest_file, PathBuf::from("manifest.json"));
}

#[test]
fn zero_parameters_are_rejected() {
    for (yaml, parameter) in [
        ("iter: 0", "iter"),
        ("thin: 0", "thin"),
        ("chains: 0", "chains"),
        ("sis: {max_attempts: 0}", "sis.max_attempts"),
    ] {
        let err = SamplerConfig::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.code(), "non-positive-parameter");
        assert_eq!(
            err.info().context.get("parameter").map(String::as_str),
            Some(parameter)
        );
    }
}

#[test]
fn unknown_target_is_a_parse_error() {
    let err = SamplerConfig::from_yaml_str("target: gaussian").unwrap_err();
    assert_eq!(err.code(), "config-parse");
}

#[test]
fn overflowing_step_count_is_rejected() {
    let mut config = SamplerConfig::default();
    config.iter = usize::MAX;
    config.thin = 2;
    assert_eq!(config.validate().unwrap_err().code(), "step-overflow");
}
