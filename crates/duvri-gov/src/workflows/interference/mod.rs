//! Interference-risk cost governance: parametric estimation of mandated
//! safety costs, regulatory scenario classification against the tender, and
//! the ordered approval workflow for extra-cost remediation.

pub mod classifier;
pub mod domain;
pub mod estimator;
pub mod extra_cost;
pub mod router;
pub mod thresholds;

#[cfg(test)]
mod tests;

pub use classifier::{classify, AlertLevel, RegulatoryBasis, ScenarioKind, ScenarioStatus, ScenarioVerdict};
pub use domain::{ContractParameters, CostMode, DuvriKind, ProjectDossier, ProjectId, TenderDeclaration};
pub use estimator::{CostBreakdown, CostEstimator, EstimatorRates, ManualCosts};
pub use extra_cost::{
    CaseEvent, CaseId, CaseStatusView, DeterminationInput, ExtraCostCase, ExtraCostService,
    GovernanceRepository, NotifyError, PreconditionViolation, RepositoryError, RupApprovalInput,
    ServiceError, SppValidationInput, WorkflowNotifier, WorkflowState,
};
pub use router::{interference_router, GovernanceState};
pub use thresholds::{ThresholdPolicy, ThresholdScenario, ThresholdVerdict};
