//! Integration tests for the library API.

use std::path::PathBuf;

use trestle::context::{Environment, ExecutionContext, ExecutionMode, Platform, ProjectContext};
use trestle::TrestleError;

fn ctx(environment: Environment, context: ExecutionContext) -> ProjectContext {
    ProjectContext::from_parts(
        Platform::Linux,
        context,
        environment,
        PathBuf::from("/work/analytics"),
    )
}

#[test]
fn derived_values_are_consistent_per_environment() {
    let staging = ctx(Environment::Staging, ExecutionContext::Local);
    assert_eq!(staging.dbt_target(), "test");
    assert_eq!(staging.docker_service_name("data-transformation"), "data-transformation-test");
    assert_eq!(staging.secret_id(), "ellen-young-yt/staging/snowflake/credentials");

    let prod = ctx(Environment::Prod, ExecutionContext::Local);
    assert_eq!(prod.dbt_target(), "prod");
    assert_eq!(prod.docker_service_name("data-transformation"), "data-transformation");
}

#[test]
fn container_contexts_use_fixed_paths() {
    for context in [ExecutionContext::Docker, ExecutionContext::Ecs] {
        let c = ctx(Environment::Prod, context);
        assert_eq!(c.profiles_dir(), PathBuf::from("/var/task/profiles"));
        assert_eq!(c.dbt_executable(), PathBuf::from("dbt"));
    }
}

#[test]
fn docker_mode_rejected_in_ci() {
    let err = ExecutionMode::resolve(Some("docker"), ExecutionContext::GithubActions, true)
        .unwrap_err();
    assert!(matches!(err, TrestleError::DockerInCi));
}

#[test]
fn docker_mode_rejected_inside_containers() {
    for context in [ExecutionContext::Docker, ExecutionContext::Ecs] {
        let err = ExecutionMode::resolve(Some("docker"), context, true).unwrap_err();
        assert!(matches!(err, TrestleError::DockerInContainer));
    }
}

#[test]
fn docker_mode_requires_the_binary() {
    let err = ExecutionMode::resolve(Some("docker"), ExecutionContext::Local, false).unwrap_err();
    assert!(matches!(err, TrestleError::DockerNotFound));
}

#[test]
fn unrequested_mode_defaults_to_local_without_validation() {
    // No docker binary, but nothing asked for docker either.
    let mode = ExecutionMode::resolve(None, ExecutionContext::GithubActions, false).unwrap();
    assert_eq!(mode, ExecutionMode::Local);
}

#[test]
fn detection_precedence_prefers_ecs() {
    let detected = ExecutionContext::detect_with(
        |key| match key {
            "AWS_EXECUTION_ENV" => Ok("AWS_ECS_FARGATE".to_string()),
            "GITHUB_ACTIONS" => Ok("true".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        },
        true,
    );
    assert_eq!(detected, ExecutionContext::Ecs);
}

#[test]
fn environment_chain_reads_environment_variable() {
    let env = Environment::determine_with(None, ExecutionContext::Local, |key| {
        if key == "ENVIRONMENT" {
            Ok("staging".to_string())
        } else {
            Err(std::env::VarError::NotPresent)
        }
    });
    assert_eq!(env, Environment::Staging);
}
