use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::ProjectId;

/// Identifier wrapper for extra-cost cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Workflow states in their required legal order. No state is ever skipped
/// and no backward transition is defined; a correction means opening a fresh
/// case through the idempotent creation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Detected,
    SppValidated,
    RupApproved,
    DeterminationRegistered,
    Integrated,
}

impl WorkflowState {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Detected,
            Self::SppValidated,
            Self::RupApproved,
            Self::DeterminationRegistered,
            Self::Integrated,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::SppValidated => "spp_validated",
            Self::RupApproved => "rup_approved",
            Self::DeterminationRegistered => "determination_registered",
            Self::Integrated => "integrated",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Integrated)
    }
}

/// Technical sign-off by the prevention and protection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SppValidation {
    pub validator: String,
    pub note: String,
    pub at: DateTime<Utc>,
}

/// Financial approval by the responsible procurement officer, including the
/// funding coverage details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RupApproval {
    pub approver: String,
    pub note: String,
    pub funding_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procurement_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_chapter: Option<String>,
    pub at: DateTime<Utc>,
}

/// Registered executive determination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Determination {
    pub number: String,
    pub date: NaiveDate,
    /// Frozen copy of the case amount at registration time.
    pub amount: f64,
    pub at: DateTime<Utc>,
}

/// Formal communication of the integration to the contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorCommunication {
    pub at: DateTime<Utc>,
}

/// One open remediation case per project. Created lazily the first time a
/// scenario requires action; never deleted by the workflow itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraCostCase {
    pub id: CaseId,
    pub project_id: ProjectId,
    pub amount: f64,
    pub description: String,
    pub state: WorkflowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spp_validation: Option<SppValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rup_approval: Option<RupApproval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination: Option<Determination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<ContractorCommunication>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtraCostCase {
    pub fn open(
        id: CaseId,
        project_id: ProjectId,
        amount: f64,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            amount,
            description,
            state: WorkflowState::Detected,
            spp_validation: None,
            rup_approval: None,
            determination: None,
            communication: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flattened representation for API responses.
    pub fn status_view(&self) -> CaseStatusView {
        CaseStatusView {
            case_id: self.id.clone(),
            project_id: self.project_id.clone(),
            state: self.state,
            state_label: self.state.label(),
            amount: self.amount,
            description: self.description.clone(),
            validated_by: self
                .spp_validation
                .as_ref()
                .map(|record| record.validator.clone()),
            approved_by: self
                .rup_approval
                .as_ref()
                .map(|record| record.approver.clone()),
            funding_source: self
                .rup_approval
                .as_ref()
                .map(|record| record.funding_source.clone()),
            determination_number: self
                .determination
                .as_ref()
                .map(|record| record.number.clone()),
            determination_date: self.determination.as_ref().map(|record| record.date),
            determination_amount: self.determination.as_ref().map(|record| record.amount),
            communicated_at: self.communication.as_ref().map(|record| record.at),
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseStatusView {
    pub case_id: CaseId,
    pub project_id: ProjectId,
    pub state: WorkflowState,
    pub state_label: &'static str,
    pub amount: f64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communicated_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
