//! Extra-cost case record and its legally ordered approval workflow:
//! technical validation (SPP), financial approval (RUP), formal
//! determination, and contractual communication.

pub mod case;
pub mod engine;
pub mod repository;
pub mod service;

pub use case::{
    CaseId, CaseStatusView, ContractorCommunication, Determination, ExtraCostCase, RupApproval,
    SppValidation, WorkflowState,
};
pub use engine::{DeterminationInput, PreconditionViolation, RupApprovalInput, SppValidationInput};
pub use repository::{
    CaseEvent, GovernanceRepository, NotifyError, RepositoryError, WorkflowNotifier,
};
pub use service::{ExtraCostService, ServiceError};
