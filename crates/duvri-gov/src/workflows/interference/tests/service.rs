use super::common::*;
use crate::workflows::interference::domain::CostMode;
use crate::workflows::interference::estimator::ManualCosts;
use crate::workflows::interference::extra_cost::{
    GovernanceRepository, PreconditionViolation, RepositoryError, ServiceError, WorkflowState,
};
use crate::workflows::interference::{ScenarioStatus, SppValidationInput};

#[test]
fn review_surfaces_missing_projects() {
    let (service, _, _) = build_service();

    match service.review(&project()) {
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn missing_parameters_fall_back_to_an_empty_estimate() {
    let (service, _, _) = build_service();
    service
        .store_dossier(dossier(
            None,
            operational_tender(true, 0.0, 50_000.0),
            CostMode::Automatic,
            None,
        ))
        .expect("dossier stores");

    let breakdown = service.estimate(&project()).expect("estimate");
    assert_eq!(breakdown.total, 0.0);

    let verdict = service.review(&project()).expect("review");
    assert_eq!(verdict.status, ScenarioStatus::NoCost);
    assert!(!verdict.requires_action);
}

#[test]
fn stored_manual_mode_bypasses_the_parametric_estimate() {
    let (service, _, _) = build_service();
    service
        .store_dossier(dossier(
            Some(baseline_parameters()),
            operational_tender(true, 2000.0, 50_000.0),
            CostMode::ManualFull,
            Some(ManualCosts {
                other_measures: Some(2500.0),
                ..ManualCosts::default()
            }),
        ))
        .expect("dossier stores");

    let breakdown = service.estimate(&project()).expect("estimate");
    assert_eq!(breakdown.total, 2500.0);
    assert!(!breakdown.auto_computed);

    let verdict = service.review(&project()).expect("review");
    // 2500 operative vs 2000 declared.
    assert_eq!(verdict.status, ScenarioStatus::ExtraCosts);
    assert_eq!(verdict.delta, 500.0);
}

#[test]
fn switching_back_to_automatic_wins_over_stored_manual_figures() {
    let (service, _, _) = build_service();
    service
        .store_dossier(dossier(
            Some(baseline_parameters()),
            operational_tender(true, 2000.0, 50_000.0),
            CostMode::Automatic,
            Some(ManualCosts {
                other_measures: Some(2500.0),
                ..ManualCosts::default()
            }),
        ))
        .expect("dossier stores");

    let breakdown = service.estimate(&project()).expect("estimate");
    assert_eq!(breakdown.total, 3300.0);
    assert!(breakdown.auto_computed);
}

#[test]
fn open_case_requires_an_actionable_verdict() {
    let (service, _, _) = build_service();
    service
        .store_dossier(dossier(
            Some(baseline_parameters()),
            // Declared figure above the operative total: savings.
            operational_tender(true, 4000.0, 50_000.0),
            CostMode::Automatic,
            None,
        ))
        .expect("dossier stores");

    match service.open_case(&project()) {
        Err(ServiceError::NoActionRequired) => {}
        other => panic!("expected no-action error, got {other:?}"),
    }
}

#[test]
fn open_case_is_idempotent_per_project() {
    let (service, _, _) = seeded_service();

    let first = service.open_case(&project()).expect("case opens");
    assert_eq!(first.state, WorkflowState::Detected);
    assert_eq!(first.amount, 1300.0);
    assert!(first.description.contains("65.0%"));

    let second = service.open_case(&project()).expect("case reused");
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
}

#[test]
fn no_base_scenarios_open_with_the_full_operative_total() {
    let (service, _, _) = build_service();
    service
        .store_dossier(dossier(
            Some(baseline_parameters()),
            operational_tender(false, 0.0, 50_000.0),
            CostMode::Automatic,
            None,
        ))
        .expect("dossier stores");

    let case = service.open_case(&project()).expect("case opens");
    assert_eq!(case.amount, 3300.0);
    assert!(case.description.contains("not priced"));
}

#[test]
fn transitions_persist_state_and_notify() {
    let (service, repository, notifier) = seeded_service();
    service.open_case(&project()).expect("case opens");

    service
        .validate_spp(&project(), spp_input())
        .expect("validation applies");
    service
        .approve_rup(&project(), rup_input())
        .expect("approval applies");
    service
        .register_determination(&project(), determination_input())
        .expect("determination applies");
    let case = service
        .communicate_to_contractor(&project())
        .expect("communication applies");

    assert_eq!(case.state, WorkflowState::Integrated);

    let stored = repository
        .fetch_case(&project())
        .expect("fetch succeeds")
        .expect("case present");
    assert_eq!(stored.state, WorkflowState::Integrated);
    assert_eq!(
        stored.determination.as_ref().map(|record| record.amount),
        Some(1300.0)
    );

    let events = notifier.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].state, WorkflowState::SppValidated);
    assert_eq!(events[3].state, WorkflowState::Integrated);
}

#[test]
fn failed_transitions_leave_the_stored_case_untouched() {
    let (service, repository, notifier) = seeded_service();
    let opened = service.open_case(&project()).expect("case opens");

    match service.approve_rup(&project(), rup_input()) {
        Err(ServiceError::Precondition(PreconditionViolation::OutOfOrder {
            required, ..
        })) => {
            assert_eq!(required, WorkflowState::SppValidated);
        }
        other => panic!("expected precondition violation, got {other:?}"),
    }

    let stored = repository
        .fetch_case(&project())
        .expect("fetch succeeds")
        .expect("case present");
    assert_eq!(stored, opened);
    assert!(notifier.events().is_empty());
}

#[test]
fn transitions_without_a_case_surface_not_found() {
    let (service, _, _) = seeded_service();

    match service.validate_spp(
        &project(),
        SppValidationInput {
            validator: "Dr. Neri".to_string(),
            note: String::new(),
        },
    ) {
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}
