use super::common::*;
use crate::workflows::interference::extra_cost::{
    PreconditionViolation, RupApprovalInput, SppValidationInput, WorkflowState,
};
use chrono::Utc;

#[test]
fn a_new_case_starts_in_detected() {
    let case = sample_case();
    assert_eq!(case.state, WorkflowState::Detected);
    assert!(case.spp_validation.is_none());
    assert!(case.rup_approval.is_none());
    assert!(case.determination.is_none());
    assert!(case.communication.is_none());
}

#[test]
fn validation_records_the_validator_and_advances() {
    let mut case = sample_case();
    let now = Utc::now();

    case.validate_spp(spp_input(), now).expect("validates");

    assert_eq!(case.state, WorkflowState::SppValidated);
    let record = case.spp_validation.as_ref().expect("record present");
    assert_eq!(record.validator, "Dr. Neri");
    assert_eq!(record.at, now);
    assert_eq!(case.updated_at, now);
}

#[test]
fn approval_before_validation_names_the_missing_step() {
    let mut case = sample_case();
    let before = case.clone();

    let err = case
        .approve_rup(rup_input(), Utc::now())
        .expect_err("must reject");

    match &err {
        PreconditionViolation::OutOfOrder {
            required, current, ..
        } => {
            assert_eq!(*required, WorkflowState::SppValidated);
            assert_eq!(*current, WorkflowState::Detected);
        }
        other => panic!("expected out-of-order violation, got {other:?}"),
    }
    assert!(err.to_string().contains("spp_validated"));
    // Nothing mutated on failure.
    assert_eq!(case, before);
}

#[test]
fn blank_validator_name_is_rejected_before_mutation() {
    let mut case = sample_case();
    let before = case.clone();

    let err = case
        .validate_spp(
            SppValidationInput {
                validator: "   ".to_string(),
                note: String::new(),
            },
            Utc::now(),
        )
        .expect_err("must reject");

    assert_eq!(err, PreconditionViolation::MissingField("validator"));
    assert_eq!(case, before);
}

#[test]
fn approval_requires_a_funding_source() {
    let mut case = sample_case();
    case.validate_spp(spp_input(), Utc::now()).expect("validates");
    let before = case.clone();

    let err = case
        .approve_rup(
            RupApprovalInput {
                funding_source: String::new(),
                ..rup_input()
            },
            Utc::now(),
        )
        .expect_err("must reject");

    assert_eq!(err, PreconditionViolation::MissingField("funding_source"));
    assert_eq!(case, before);
}

#[test]
fn the_full_ordering_reaches_integrated() {
    let mut case = sample_case();

    case.validate_spp(spp_input(), Utc::now()).expect("step 1");
    assert_eq!(case.state, WorkflowState::SppValidated);

    case.approve_rup(rup_input(), Utc::now()).expect("step 2");
    assert_eq!(case.state, WorkflowState::RupApproved);
    let approval = case.rup_approval.as_ref().expect("approval present");
    assert_eq!(approval.funding_source, "Safety budget 2026");
    assert_eq!(approval.procurement_reference.as_deref(), Some("CIG-9981"));

    case.register_determination(determination_input(), Utc::now())
        .expect("step 3");
    assert_eq!(case.state, WorkflowState::DeterminationRegistered);
    let determination = case.determination.as_ref().expect("determination present");
    assert_eq!(determination.number, "77/2026");
    // The determination freezes the case amount.
    assert_eq!(determination.amount, case.amount);

    case.communicate_to_contractor(Utc::now()).expect("step 4");
    assert_eq!(case.state, WorkflowState::Integrated);
    assert!(case.state.is_terminal());
    assert!(case.communication.is_some());
}

#[test]
fn no_sequence_skips_the_financial_approval() {
    let mut case = sample_case();
    case.validate_spp(spp_input(), Utc::now()).expect("validates");

    let err = case
        .register_determination(determination_input(), Utc::now())
        .expect_err("must reject");
    assert!(err.to_string().contains("rup_approved"));

    let err = case
        .communicate_to_contractor(Utc::now())
        .expect_err("must reject");
    assert!(err.to_string().contains("determination_registered"));

    assert_eq!(case.state, WorkflowState::SppValidated);
}

#[test]
fn transitions_cannot_be_replayed() {
    let mut case = sample_case();
    case.validate_spp(spp_input(), Utc::now()).expect("validates");

    let err = case
        .validate_spp(spp_input(), Utc::now())
        .expect_err("must reject replay");
    match err {
        PreconditionViolation::OutOfOrder { required, .. } => {
            assert_eq!(required, WorkflowState::Detected);
        }
        other => panic!("expected out-of-order violation, got {other:?}"),
    }
}

#[test]
fn determination_needs_a_number() {
    let mut case = sample_case();
    case.validate_spp(spp_input(), Utc::now()).expect("step 1");
    case.approve_rup(rup_input(), Utc::now()).expect("step 2");

    let mut input = determination_input();
    input.number = String::new();
    let err = case
        .register_determination(input, Utc::now())
        .expect_err("must reject");
    assert_eq!(err, PreconditionViolation::MissingField("number"));
    assert_eq!(case.state, WorkflowState::RupApproved);
}

#[test]
fn states_are_ordered_and_labelled() {
    let ordered = WorkflowState::ordered();
    assert_eq!(ordered[0], WorkflowState::Detected);
    assert_eq!(ordered[4], WorkflowState::Integrated);
    assert_eq!(WorkflowState::SppValidated.label(), "spp_validated");
    assert!(!WorkflowState::Detected.is_terminal());
}
