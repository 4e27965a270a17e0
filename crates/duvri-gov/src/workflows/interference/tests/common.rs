use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::workflows::interference::domain::{
    ContractParameters, CostMode, DuvriKind, ProjectDossier, ProjectId, TenderDeclaration,
};
use crate::workflows::interference::estimator::ManualCosts;
use crate::workflows::interference::extra_cost::{
    CaseEvent, CaseId, DeterminationInput, ExtraCostCase, ExtraCostService, GovernanceRepository,
    NotifyError, RepositoryError, RupApprovalInput, SppValidationInput, WorkflowNotifier,
};
use crate::workflows::interference::router::{interference_router, GovernanceState};
use crate::workflows::interference::thresholds::ThresholdPolicy;
use crate::workflows::interference::EstimatorRates;

pub(super) fn project() -> ProjectId {
    ProjectId("proj-1".to_string())
}

/// Reference parameters: €50,000 contract, four workers, ten days, no risks.
pub(super) fn baseline_parameters() -> ContractParameters {
    ContractParameters {
        contract_base_amount: 50_000.0,
        worker_count: 4,
        duration_days: 10,
        client_risk_factors: Vec::new(),
        contractor_risk_factors: Vec::new(),
        base_cost_percentage: 2.0,
    }
}

pub(super) fn risky_parameters() -> ContractParameters {
    ContractParameters {
        contract_base_amount: 50_000.0,
        worker_count: 2,
        duration_days: 10,
        client_risk_factors: vec!["Chemical agents exposure".to_string()],
        contractor_risk_factors: vec!["Work at height".to_string()],
        base_cost_percentage: 2.0,
    }
}

pub(super) fn operational_tender(
    costs_included_in_tender: bool,
    declared_security_costs: f64,
    tender_base_amount: f64,
) -> TenderDeclaration {
    TenderDeclaration {
        duvri_kind: DuvriKind::Operational,
        costs_included_in_tender,
        declared_security_costs,
        tender_base_amount,
    }
}

pub(super) fn reconnaissance_tender() -> TenderDeclaration {
    TenderDeclaration {
        duvri_kind: DuvriKind::Reconnaissance,
        costs_included_in_tender: false,
        declared_security_costs: 0.0,
        tender_base_amount: 50_000.0,
    }
}

pub(super) fn dossier(
    parameters: Option<ContractParameters>,
    tender: TenderDeclaration,
    cost_mode: CostMode,
    manual_costs: Option<ManualCosts>,
) -> ProjectDossier {
    ProjectDossier {
        project_id: project(),
        parameters,
        tender,
        cost_mode,
        manual_costs,
    }
}

pub(super) fn spp_input() -> SppValidationInput {
    SppValidationInput {
        validator: "Dr. Neri".to_string(),
        note: "Measures verified on site".to_string(),
    }
}

pub(super) fn rup_input() -> RupApprovalInput {
    RupApprovalInput {
        approver: "Ing. Bruni".to_string(),
        note: "Coverage confirmed".to_string(),
        funding_source: "Safety budget 2026".to_string(),
        procurement_reference: Some("CIG-9981".to_string()),
        budget_chapter: Some("CH-104".to_string()),
    }
}

pub(super) fn determination_input() -> DeterminationInput {
    DeterminationInput {
        number: "77/2026".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 12).expect("valid date"),
    }
}

pub(super) fn sample_case() -> ExtraCostCase {
    ExtraCostCase::open(
        CaseId("case-test".to_string()),
        project(),
        1300.0,
        "Interference extra costs: 65.0% increase over the tender figure".to_string(),
        Utc::now(),
    )
}

pub(super) fn build_service() -> (
    Arc<ExtraCostService<MemoryRepository, MemoryNotifier>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(ExtraCostService::new(
        repository.clone(),
        notifier.clone(),
        EstimatorRates::default(),
    ));
    (service, repository, notifier)
}

/// Service seeded with the reference extra-cost situation: €2,000 declared
/// against a €3,300 operative total (delta €1,300).
pub(super) fn seeded_service() -> (
    Arc<ExtraCostService<MemoryRepository, MemoryNotifier>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let (service, repository, notifier) = build_service();
    service
        .store_dossier(dossier(
            Some(baseline_parameters()),
            operational_tender(true, 2000.0, 50_000.0),
            CostMode::Automatic,
            None,
        ))
        .expect("dossier stores");
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    dossiers: Arc<Mutex<HashMap<ProjectId, ProjectDossier>>>,
    cases: Arc<Mutex<HashMap<ProjectId, ExtraCostCase>>>,
}

impl GovernanceRepository for MemoryRepository {
    fn fetch_dossier(
        &self,
        project: &ProjectId,
    ) -> Result<Option<ProjectDossier>, RepositoryError> {
        let guard = self.dossiers.lock().expect("dossier mutex poisoned");
        Ok(guard.get(project).cloned())
    }

    fn store_dossier(&self, dossier: ProjectDossier) -> Result<(), RepositoryError> {
        let mut guard = self.dossiers.lock().expect("dossier mutex poisoned");
        guard.insert(dossier.project_id.clone(), dossier);
        Ok(())
    }

    fn fetch_case(&self, project: &ProjectId) -> Result<Option<ExtraCostCase>, RepositoryError> {
        let guard = self.cases.lock().expect("case mutex poisoned");
        Ok(guard.get(project).cloned())
    }

    fn insert_case(&self, case: ExtraCostCase) -> Result<ExtraCostCase, RepositoryError> {
        let mut guard = self.cases.lock().expect("case mutex poisoned");
        if guard.contains_key(&case.project_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(case.project_id.clone(), case.clone());
        Ok(case)
    }

    fn update_case(&self, case: ExtraCostCase) -> Result<(), RepositoryError> {
        let mut guard = self.cases.lock().expect("case mutex poisoned");
        if guard.contains_key(&case.project_id) {
            guard.insert(case.project_id.clone(), case);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<CaseEvent>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<CaseEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl WorkflowNotifier for MemoryNotifier {
    fn publish(&self, event: CaseEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) fn governance_router(
    service: Arc<ExtraCostService<MemoryRepository, MemoryNotifier>>,
) -> axum::Router {
    interference_router(GovernanceState {
        service,
        thresholds: ThresholdPolicy::default(),
    })
}

pub(super) fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
