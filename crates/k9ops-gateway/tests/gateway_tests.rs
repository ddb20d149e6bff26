//! Integration tests for the enforcement gateway
//!
//! Exercises the full chain from inbound request to guarded operation:
//! scope extraction, membership checks, permission resolution, and the
//! uniform refusal contract.

use std::sync::Arc;

use serde_json::json;

use k9ops_gateway::{Forbidden, PermissionGuard, ProtectedRequest, ScopeRule};
use k9ops_permissions::{
    InMemoryDirectory, InMemoryGrantStore, MutationService, PermissionAction, ProjectId,
    RequestOrigin, ResolutionEngine, Role, SubjectId,
};

struct Harness {
    guard: PermissionGuard,
    mutation: MutationService,
    directory: Arc<InMemoryDirectory>,
}

fn admin() -> SubjectId {
    SubjectId::new("admin")
}

fn officer() -> SubjectId {
    SubjectId::new("officer-1")
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryGrantStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    directory.insert_subject(admin(), Role::FullAccess);
    directory.insert_subject(officer(), Role::Scoped);
    directory.insert_project(ProjectId::new("p1"));
    directory.insert_project(ProjectId::new("p2"));
    directory.add_member(officer(), ProjectId::new("p1"));

    let engine = Arc::new(ResolutionEngine::new(store.clone(), directory.clone()));
    let mutation = MutationService::new(store, directory.clone());
    let guard = PermissionGuard::new(engine, directory.clone());

    Harness {
        guard,
        mutation,
        directory,
    }
}

fn grant_view(harness: &Harness, subject: &SubjectId, project: &ProjectId) {
    harness
        .mutation
        .set_grant(
            &admin(),
            subject,
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
            Some(project),
            true,
            &RequestOrigin::new(),
        )
        .unwrap();
}

fn view_dogs(
    harness: &Harness,
    subject: &SubjectId,
    request: &ProtectedRequest,
) -> Result<&'static str, Forbidden> {
    harness.guard.protect(
        subject,
        "Dogs",
        "عرض قائمة الكلاب",
        PermissionAction::View,
        &ScopeRule::standard(),
        request,
        || "dog listing",
    )
}

#[test]
fn test_granted_member_reaches_the_operation() {
    let harness = harness();
    grant_view(&harness, &officer(), &ProjectId::new("p1"));

    let request = ProtectedRequest::new().with_param("project_id", "p1");
    assert_eq!(view_dogs(&harness, &officer(), &request), Ok("dog listing"));
}

#[test]
fn test_all_denial_paths_are_indistinguishable() {
    let harness = harness();
    // Officer holds a grant on p1 but the requests below each fail a
    // different check.
    grant_view(&harness, &officer(), &ProjectId::new("p1"));

    let requests = vec![
        // No project identifier anywhere
        ProtectedRequest::new(),
        // Project that does not exist
        ProtectedRequest::new().with_param("project_id", "ghost"),
        // Project that exists but officer is not a member
        ProtectedRequest::new().with_param("project_id", "p2"),
    ];

    let mut outcomes = Vec::new();
    for request in &requests {
        outcomes.push(view_dogs(&harness, &officer(), request));
    }
    // Member of p1 but asking for an action with no grant row
    outcomes.push(harness.guard.protect(
        &officer(),
        "Dogs",
        "حذف كلب",
        PermissionAction::Delete,
        &ScopeRule::standard(),
        &ProtectedRequest::new().with_param("project_id", "p1"),
        || "dog listing",
    ));

    for outcome in &outcomes {
        assert_eq!(*outcome, Err(Forbidden));
        assert_eq!(outcome.as_ref().unwrap_err().to_string(), "forbidden");
    }
}

#[test]
fn test_denied_request_never_reaches_the_operation() {
    let harness = harness();
    let mut executed = 0u32;

    let requests = vec![
        ProtectedRequest::new(),
        ProtectedRequest::new().with_param("project_id", "ghost"),
        ProtectedRequest::new().with_param("project_id", "p2"),
        ProtectedRequest::new().with_param("project_id", "p1"),
    ];

    for request in &requests {
        let result = harness.guard.protect(
            &officer(),
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
            &ScopeRule::standard(),
            request,
            || executed += 1,
        );
        assert_eq!(result, Err(Forbidden));
    }

    assert_eq!(executed, 0);
}

#[test]
fn test_membership_is_necessary_but_not_sufficient() {
    let harness = harness();

    // Member without a grant: membership alone does not open the door.
    let request = ProtectedRequest::new().with_param("project_id", "p1");
    assert_eq!(view_dogs(&harness, &officer(), &request), Err(Forbidden));

    // Grant without membership: a stale grant row on p2 does not either.
    grant_view(&harness, &officer(), &ProjectId::new("p2"));
    let request = ProtectedRequest::new().with_param("project_id", "p2");
    assert_eq!(view_dogs(&harness, &officer(), &request), Err(Forbidden));
}

#[test]
fn test_extraction_priority_controls_the_scope() {
    let harness = harness();
    grant_view(&harness, &officer(), &ProjectId::new("p1"));

    // Param names the project the officer may view, body names one they
    // may not. Param wins, so the request is allowed.
    let request = ProtectedRequest::new()
        .with_param("project_id", "p1")
        .with_body(json!({ "project_id": "p2" }));
    assert_eq!(view_dogs(&harness, &officer(), &request), Ok("dog listing"));

    // Same request through a body-only rule scopes to p2 and is refused.
    let result = harness.guard.protect(
        &officer(),
        "Dogs",
        "عرض قائمة الكلاب",
        PermissionAction::View,
        &ScopeRule::new().with_body_field("project_id"),
        &request,
        || "dog listing",
    );
    assert_eq!(result, Err(Forbidden));
}

#[test]
fn test_revocation_takes_immediate_effect() {
    let harness = harness();
    grant_view(&harness, &officer(), &ProjectId::new("p1"));

    let request = ProtectedRequest::new().with_param("project_id", "p1");
    assert_eq!(view_dogs(&harness, &officer(), &request), Ok("dog listing"));

    harness
        .mutation
        .set_grant(
            &admin(),
            &officer(),
            "Dogs",
            "عرض قائمة الكلاب",
            PermissionAction::View,
            Some(&ProjectId::new("p1")),
            false,
            &RequestOrigin::new(),
        )
        .unwrap();

    assert_eq!(view_dogs(&harness, &officer(), &request), Err(Forbidden));
}

#[test]
fn test_full_access_bypasses_every_check() {
    let harness = harness();

    // No project identifier, a ghost project, a project with no
    // membership row: none of it matters for a full-access subject.
    let requests = vec![
        ProtectedRequest::new(),
        ProtectedRequest::new().with_param("project_id", "ghost"),
        ProtectedRequest::new().with_param("project_id", "p2"),
    ];

    for request in &requests {
        assert_eq!(view_dogs(&harness, &admin(), request), Ok("dog listing"));
    }
}

#[test]
fn test_unknown_subject_is_forbidden() {
    let harness = harness();

    let request = ProtectedRequest::new().with_param("project_id", "p1");
    let result = view_dogs(&harness, &SubjectId::new("intruder"), &request);

    assert_eq!(result, Err(Forbidden));
}

#[test]
fn test_demoted_subject_loses_the_bypass() {
    let harness = harness();

    assert_eq!(
        view_dogs(&harness, &admin(), &ProtectedRequest::new()),
        Ok("dog listing")
    );

    harness.directory.insert_subject(admin(), Role::Scoped);

    assert_eq!(
        view_dogs(&harness, &admin(), &ProtectedRequest::new()),
        Err(Forbidden)
    );
}

#[test]
fn test_operation_errors_flow_through_untouched() {
    let harness = harness();
    grant_view(&harness, &officer(), &ProjectId::new("p1"));

    let request = ProtectedRequest::new().with_param("project_id", "p1");
    let result: Result<Result<u32, String>, Forbidden> = harness.guard.protect(
        &officer(),
        "Dogs",
        "عرض قائمة الكلاب",
        PermissionAction::View,
        &ScopeRule::standard(),
        &request,
        || Err("kennel database offline".to_string()),
    );

    // The guard authorized the request; the operation's own failure is
    // the caller's to handle.
    assert_eq!(result, Ok(Err("kennel database offline".to_string())));
}
