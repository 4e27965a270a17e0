use serde::{Deserialize, Serialize};

use super::super::domain::{ProjectDossier, ProjectId};
use super::case::{CaseId, ExtraCostCase, WorkflowState};

/// Storage abstraction over the project dossier and its extra-cost case.
/// Storage is the single source of truth; there is no in-process mirror.
pub trait GovernanceRepository: Send + Sync {
    fn fetch_dossier(&self, project: &ProjectId) -> Result<Option<ProjectDossier>, RepositoryError>;
    fn store_dossier(&self, dossier: ProjectDossier) -> Result<(), RepositoryError>;
    fn fetch_case(&self, project: &ProjectId) -> Result<Option<ExtraCostCase>, RepositoryError>;
    fn insert_case(&self, case: ExtraCostCase) -> Result<ExtraCostCase, RepositoryError>;
    fn update_case(&self, case: ExtraCostCase) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks invoked after a successful
/// workflow step (mail adapters, protocol systems, ...).
pub trait WorkflowNotifier: Send + Sync {
    fn publish(&self, event: CaseEvent) -> Result<(), NotifyError>;
}

/// Payload describing one completed workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseEvent {
    pub project_id: ProjectId,
    pub case_id: CaseId,
    pub state: WorkflowState,
    pub detail: String,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
