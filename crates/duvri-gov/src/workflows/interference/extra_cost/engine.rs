//! Guarded transitions over [`ExtraCostCase`].
//!
//! Every transition checks its required state and required fields before any
//! mutation; a failed transition leaves the case exactly as it was.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::case::{
    ContractorCommunication, Determination, ExtraCostCase, RupApproval, SppValidation,
    WorkflowState,
};

/// A transition was attempted whose preconditions are not met. Recoverable:
/// the caller can satisfy the named step or field and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error(
        "transition '{transition}' requires the case to be in state '{}', but it is in '{}'",
        .required.label(),
        .current.label()
    )]
    OutOfOrder {
        transition: &'static str,
        required: WorkflowState,
        current: WorkflowState,
    },
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),
}

/// Technical validation form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SppValidationInput {
    pub validator: String,
    #[serde(default)]
    pub note: String,
}

/// Financial approval form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RupApprovalInput {
    pub approver: String,
    #[serde(default)]
    pub note: String,
    pub funding_source: String,
    #[serde(default)]
    pub procurement_reference: Option<String>,
    #[serde(default)]
    pub budget_chapter: Option<String>,
}

/// Determination registration form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminationInput {
    pub number: String,
    pub date: NaiveDate,
}

impl ExtraCostCase {
    /// `detected → spp_validated`.
    pub fn validate_spp(
        &mut self,
        input: SppValidationInput,
        now: DateTime<Utc>,
    ) -> Result<(), PreconditionViolation> {
        self.require_state(WorkflowState::Detected, "validate_spp")?;
        require_filled(&input.validator, "validator")?;

        self.spp_validation = Some(SppValidation {
            validator: input.validator,
            note: input.note,
            at: now,
        });
        self.state = WorkflowState::SppValidated;
        self.updated_at = now;
        Ok(())
    }

    /// `spp_validated → rup_approved`.
    pub fn approve_rup(
        &mut self,
        input: RupApprovalInput,
        now: DateTime<Utc>,
    ) -> Result<(), PreconditionViolation> {
        self.require_state(WorkflowState::SppValidated, "approve_rup")?;
        require_filled(&input.approver, "approver")?;
        require_filled(&input.funding_source, "funding_source")?;

        self.rup_approval = Some(RupApproval {
            approver: input.approver,
            note: input.note,
            funding_source: input.funding_source,
            procurement_reference: input.procurement_reference,
            budget_chapter: input.budget_chapter,
            at: now,
        });
        self.state = WorkflowState::RupApproved;
        self.updated_at = now;
        Ok(())
    }

    /// `rup_approved → determination_registered`. The determination freezes
    /// the case amount.
    pub fn register_determination(
        &mut self,
        input: DeterminationInput,
        now: DateTime<Utc>,
    ) -> Result<(), PreconditionViolation> {
        self.require_state(WorkflowState::RupApproved, "register_determination")?;
        require_filled(&input.number, "number")?;

        self.determination = Some(Determination {
            number: input.number,
            date: input.date,
            amount: self.amount,
            at: now,
        });
        self.state = WorkflowState::DeterminationRegistered;
        self.updated_at = now;
        Ok(())
    }

    /// `determination_registered → integrated` (terminal).
    pub fn communicate_to_contractor(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(), PreconditionViolation> {
        self.require_state(
            WorkflowState::DeterminationRegistered,
            "communicate_to_contractor",
        )?;

        self.communication = Some(ContractorCommunication { at: now });
        self.state = WorkflowState::Integrated;
        self.updated_at = now;
        Ok(())
    }

    fn require_state(
        &self,
        required: WorkflowState,
        transition: &'static str,
    ) -> Result<(), PreconditionViolation> {
        if self.state == required {
            Ok(())
        } else {
            Err(PreconditionViolation::OutOfOrder {
                transition,
                required,
                current: self.state,
            })
        }
    }
}

fn require_filled(value: &str, field: &'static str) -> Result<(), PreconditionViolation> {
    if value.trim().is_empty() {
        Err(PreconditionViolation::MissingField(field))
    } else {
        Ok(())
    }
}
