use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use super::super::classifier::{self, ScenarioStatus, ScenarioVerdict};
use super::super::domain::{ContractParameters, CostMode, ProjectDossier, ProjectId};
use super::super::estimator::{percent_or_zero, CostBreakdown, CostEstimator, EstimatorRates, ManualCosts};
use super::case::{CaseId, ExtraCostCase};
use super::engine::{
    DeterminationInput, PreconditionViolation, RupApprovalInput, SppValidationInput,
};
use super::repository::{
    CaseEvent, GovernanceRepository, NotifyError, RepositoryError, WorkflowNotifier,
};

/// Service composing the estimator, the classifier, and the approval
/// workflow over a repository and a notifier.
///
/// Transitions on one project's case are serialized through a per-project
/// lock; estimates and reviews are side-effect free and run concurrently.
pub struct ExtraCostService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    estimator: CostEstimator,
    locks: Mutex<HashMap<ProjectId, Arc<Mutex<()>>>>,
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

impl<R, N> ExtraCostService<R, N>
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, rates: EstimatorRates) -> Self {
        Self {
            repository,
            notifier,
            estimator: CostEstimator::new(rates),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Store or replace the project dossier.
    pub fn store_dossier(&self, dossier: ProjectDossier) -> Result<(), ServiceError> {
        self.repository.store_dossier(dossier)?;
        Ok(())
    }

    /// Produce a breakdown for loose inputs, honoring the cost mode.
    pub fn breakdown(
        &self,
        parameters: Option<&ContractParameters>,
        mode: CostMode,
        manual: Option<&ManualCosts>,
    ) -> CostBreakdown {
        self.estimator.for_mode(parameters, mode, manual)
    }

    /// Current cost breakdown for a stored project.
    pub fn estimate(&self, project: &ProjectId) -> Result<CostBreakdown, ServiceError> {
        let dossier = self.dossier(project)?;
        Ok(self.breakdown_for(&dossier))
    }

    /// Recompute the scenario verdict from the stored dossier. Pure read:
    /// nothing is persisted.
    pub fn review(&self, project: &ProjectId) -> Result<ScenarioVerdict, ServiceError> {
        let dossier = self.dossier(project)?;
        let breakdown = self.breakdown_for(&dossier);
        Ok(classifier::classify(&breakdown, &dossier.tender))
    }

    /// Open the remediation case for a project whose current verdict requires
    /// action. Idempotent: an existing open case is returned untouched.
    pub fn open_case(&self, project: &ProjectId) -> Result<ExtraCostCase, ServiceError> {
        let verdict = self.review(project)?;
        if !verdict.requires_action {
            return Err(ServiceError::NoActionRequired);
        }

        let lock = self.project_lock(project);
        let _guard = lock.lock().expect("project lock poisoned");

        if let Some(existing) = self.repository.fetch_case(project)? {
            return Ok(existing);
        }

        let now = Utc::now();
        let case = ExtraCostCase::open(
            next_case_id(),
            project.clone(),
            verdict.delta,
            case_description(&verdict),
            now,
        );
        let stored = self.repository.insert_case(case)?;
        info!(
            project = %project.0,
            case = %stored.id.0,
            amount = stored.amount,
            "extra-cost case opened"
        );
        Ok(stored)
    }

    /// Fetch the project's case for display.
    pub fn case(&self, project: &ProjectId) -> Result<ExtraCostCase, ServiceError> {
        let case = self
            .repository
            .fetch_case(project)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(case)
    }

    pub fn validate_spp(
        &self,
        project: &ProjectId,
        input: SppValidationInput,
    ) -> Result<ExtraCostCase, ServiceError> {
        self.transition(project, "technical validation recorded", |case, now| {
            case.validate_spp(input, now)
        })
    }

    pub fn approve_rup(
        &self,
        project: &ProjectId,
        input: RupApprovalInput,
    ) -> Result<ExtraCostCase, ServiceError> {
        self.transition(project, "financial approval recorded", |case, now| {
            case.approve_rup(input, now)
        })
    }

    pub fn register_determination(
        &self,
        project: &ProjectId,
        input: DeterminationInput,
    ) -> Result<ExtraCostCase, ServiceError> {
        self.transition(project, "determination registered", |case, now| {
            case.register_determination(input, now)
        })
    }

    pub fn communicate_to_contractor(
        &self,
        project: &ProjectId,
    ) -> Result<ExtraCostCase, ServiceError> {
        self.transition(project, "contractual integration communicated", |case, now| {
            case.communicate_to_contractor(now)
        })
    }

    fn dossier(&self, project: &ProjectId) -> Result<ProjectDossier, ServiceError> {
        let dossier = self
            .repository
            .fetch_dossier(project)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(dossier)
    }

    fn breakdown_for(&self, dossier: &ProjectDossier) -> CostBreakdown {
        self.estimator.for_mode(
            dossier.parameters.as_ref(),
            dossier.cost_mode,
            dossier.manual_costs.as_ref(),
        )
    }

    /// Run one guarded transition under the project lock. The engine rejects
    /// before mutating, so a failure leaves the stored case untouched.
    fn transition(
        &self,
        project: &ProjectId,
        detail: &str,
        apply: impl FnOnce(
            &mut ExtraCostCase,
            chrono::DateTime<Utc>,
        ) -> Result<(), PreconditionViolation>,
    ) -> Result<ExtraCostCase, ServiceError> {
        let lock = self.project_lock(project);
        let _guard = lock.lock().expect("project lock poisoned");

        let mut case = self
            .repository
            .fetch_case(project)?
            .ok_or(RepositoryError::NotFound)?;

        apply(&mut case, Utc::now())?;
        self.repository.update_case(case.clone())?;

        self.notifier.publish(CaseEvent {
            project_id: project.clone(),
            case_id: case.id.clone(),
            state: case.state,
            detail: detail.to_string(),
        })?;

        info!(
            project = %project.0,
            case = %case.id.0,
            state = case.state.label(),
            "workflow transition applied"
        );
        Ok(case)
    }

    fn project_lock(&self, project: &ProjectId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock table poisoned");
        locks.entry(project.clone()).or_default().clone()
    }
}

fn case_description(verdict: &ScenarioVerdict) -> String {
    match verdict.status {
        ScenarioStatus::CostsCompensated => {
            "Interference costs absorbed into general overheads; reconciliation record required"
                .to_string()
        }
        ScenarioStatus::AllCostsExtra => format!(
            "Interference costs not priced in the tender: \u{20ac}{:.2}",
            verdict.operative_total
        ),
        _ => format!(
            "Interference extra costs: {:.1}% increase over the tender figure",
            percent_or_zero(verdict.delta, verdict.declared_costs)
        ),
    }
}

/// Error raised by the governance service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notifier(#[from] NotifyError),
    #[error("the current scenario does not require an extra-cost remediation")]
    NoActionRequired,
}
