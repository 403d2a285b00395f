// tests/workflow_test.rs
use version_branch::cli::orchestration::{
    run_bump_workflow, run_lookup_workflow, run_workflow, BumpWorkflowArgs, WorkflowInputs,
};
use version_branch::git::{BackendCall, MockBackend};
use version_branch::VersionBranchError;

fn bump_args(level: &str, prefix: &str, pre_id: Option<&str>) -> BumpWorkflowArgs {
    BumpWorkflowArgs {
        base_branch: "main".to_string(),
        version_level: level.to_string(),
        name_prefix: prefix.to_string(),
        pre_id: pre_id.map(str::to_string),
        custom_version: None,
    }
}

fn backend_at(version: &str) -> MockBackend {
    MockBackend::new()
        .with_branch("main", "abc123")
        .with_manifest_version("main", version)
}

#[test]
fn test_minor_bump_creates_release_branch() {
    let backend = backend_at("1.2.3");
    let args = bump_args("minor", "release-", None);
    let result = run_bump_workflow(&args, &backend, &backend).unwrap();

    assert_eq!(result.base_branch, "main");
    assert_eq!(result.base_version.to_string(), "1.2.3");
    assert_eq!(result.head_version.version.to_string(), "1.3.0");
    assert_eq!(result.head_branch, "release-1.3.0");
    assert!(!result.branch_already_existed);
    assert!(!result.head_version.is_prerelease);
    assert_eq!(backend.branch_sha("release-1.3.0").as_deref(), Some("abc123"));
}

#[test]
fn test_prepatch_bump() {
    let backend = backend_at("1.2.3");
    let args = bump_args("patch", "release-", Some("beta"));
    let result = run_bump_workflow(&args, &backend, &backend).unwrap();

    assert_eq!(result.head_version.version.to_string(), "1.2.4-beta.0");
    assert!(result.head_version.is_prerelease);
    assert_eq!(result.head_version.prerelease_id, "beta");
    assert_eq!(result.head_version.prerelease_increment, "0");
    assert_eq!(result.head_branch, "release-1.2.4-beta.0");
}

#[test]
fn test_prerelease_continues_sequence() {
    let backend = backend_at("2.0.0-beta.3");
    let result = run_bump_workflow(&bump_args("prerelease", "", None), &backend, &backend).unwrap();

    assert_eq!(result.head_version.version.to_string(), "2.0.0-beta.4");
    assert_eq!(result.head_branch, "2.0.0-beta.4");
}

#[test]
fn test_second_run_is_idempotent() {
    let backend = backend_at("1.2.3");
    let args = bump_args("minor", "release-", None);

    run_bump_workflow(&args, &backend, &backend).unwrap();
    backend.clear_calls();

    let second = run_bump_workflow(&args, &backend, &backend).unwrap();
    assert!(second.branch_already_existed);
    assert_eq!(backend.mutation_count(), 0);
}

#[test]
fn test_custom_version_overrides_invalid_level() {
    let backend = backend_at("1.2.3");
    let args = BumpWorkflowArgs {
        custom_version: Some("4.0.0-rc.1".to_string()),
        ..bump_args("nonsense", "v", None)
    };

    let result = run_bump_workflow(&args, &backend, &backend).unwrap();
    assert_eq!(result.head_version.version.to_string(), "4.0.0-rc.1");
    assert_eq!(result.head_branch, "v4.0.0-rc.1");
}

#[test]
fn test_missing_base_branch_input() {
    let backend = backend_at("1.2.3");
    let args = BumpWorkflowArgs {
        base_branch: String::new(),
        ..bump_args("minor", "", None)
    };

    let err = run_bump_workflow(&args, &backend, &backend).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(backend.calls().is_empty());
}

#[test]
fn test_invalid_level_fails_before_backend_calls() {
    let backend = backend_at("1.2.3");
    let err = run_bump_workflow(&bump_args("huge", "", None), &backend, &backend).unwrap_err();

    assert!(matches!(err, VersionBranchError::InvalidMode(_)));
    assert!(backend.calls().is_empty());
}

#[test]
fn test_invalid_custom_version_fails_before_backend_calls() {
    let backend = backend_at("1.2.3");
    let args = BumpWorkflowArgs {
        custom_version: Some("1.2".to_string()),
        ..bump_args("patch", "", None)
    };

    let err = run_bump_workflow(&args, &backend, &backend).unwrap_err();
    assert!(matches!(err, VersionBranchError::InvalidVersion { .. }));
    assert!(backend.calls().is_empty());
}

#[test]
fn test_base_branch_not_found() {
    let backend = MockBackend::new().with_manifest_version("main", "1.2.3");
    let err = run_bump_workflow(&bump_args("minor", "", None), &backend, &backend).unwrap_err();

    assert_eq!(err.to_string(), "Base: main, not found.");
    assert_eq!(backend.calls(), vec![BackendCall::GetRef("main".to_string())]);
}

#[test]
fn test_invalid_base_manifest_version() {
    let backend = MockBackend::new()
        .with_branch("main", "abc123")
        .with_manifest_version("main", "one.two");

    let err = run_bump_workflow(&bump_args("minor", "", None), &backend, &backend).unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(backend.mutation_count(), 0);
}

#[test]
fn test_lookup_release_head() {
    let backend = MockBackend::new()
        .with_pull_request(5, "main", "release-3.0.0")
        .with_manifest_version("main", "2.4.1")
        .with_manifest_version("release-3.0.0", "3.0.0");

    let result = run_lookup_workflow(5, &backend).unwrap();
    assert_eq!(result.base_branch, "main");
    assert_eq!(result.base_version.to_string(), "2.4.1");
    assert_eq!(result.head_branch, "release-3.0.0");
    assert_eq!(result.head_version.to_string(), "3.0.0");
    assert!(!result.is_prerelease);
    assert_eq!(backend.mutation_count(), 0);
}

#[test]
fn test_lookup_prerelease_head() {
    let backend = MockBackend::new()
        .with_pull_request(6, "develop", "release-3.0.0-rc.2")
        .with_manifest_version("develop", "2.4.1")
        .with_manifest_version("release-3.0.0-rc.2", "3.0.0-rc.2");

    assert!(run_lookup_workflow(6, &backend).unwrap().is_prerelease);
}

#[test]
fn test_lookup_missing_pull_request() {
    let backend = MockBackend::new();
    assert!(run_lookup_workflow(99, &backend).unwrap_err().is_not_found());
}

#[test]
fn test_run_workflow_dispatches_on_pr_number() {
    let backend = backend_at("1.2.3")
        .with_pull_request(3, "main", "release-1.3.0")
        .with_manifest_version("release-1.3.0", "1.3.0");

    let lookup = WorkflowInputs {
        pr_number: "3".to_string(),
        ..WorkflowInputs::default()
    };
    let outputs = run_workflow(&lookup, &backend, &backend).unwrap();
    assert_eq!(outputs.len(), 5);
    assert_eq!(backend.mutation_count(), 0);

    let bump = WorkflowInputs {
        base_branch: "main".to_string(),
        version_level: "minor".to_string(),
        name_prefix: "release-".to_string(),
        pr_number: "not a number".to_string(),
        ..WorkflowInputs::default()
    };
    let outputs = run_workflow(&bump, &backend, &backend).unwrap();
    assert_eq!(outputs.len(), 11);
    assert!(outputs.contains(&("head-branch", "release-1.3.0".to_string())));
    assert!(outputs.contains(&("is-new-branch", "true".to_string())));
}
