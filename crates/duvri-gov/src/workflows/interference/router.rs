use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::classifier;
use super::domain::{ContractParameters, CostMode, ProjectDossier, ProjectId, TenderDeclaration};
use super::estimator::ManualCosts;
use super::extra_cost::{
    DeterminationInput, ExtraCostService, GovernanceRepository, PreconditionViolation,
    RepositoryError, RupApprovalInput, ServiceError, SppValidationInput, WorkflowNotifier,
};
use super::thresholds::ThresholdPolicy;

/// Shared state for the governance endpoints.
pub struct GovernanceState<R, N> {
    pub service: Arc<ExtraCostService<R, N>>,
    pub thresholds: ThresholdPolicy,
}

impl<R, N> Clone for GovernanceState<R, N> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            thresholds: self.thresholds.clone(),
        }
    }
}

/// Router builder exposing the estimation, classification, and workflow
/// endpoints.
pub fn interference_router<R, N>(state: GovernanceState<R, N>) -> Router
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/interference/estimate",
            post(estimate_handler::<R, N>),
        )
        .route(
            "/api/v1/interference/classify",
            post(classify_handler::<R, N>),
        )
        .route("/api/v1/thresholds/check", post(threshold_handler::<R, N>))
        .route(
            "/api/v1/projects/:project_id/dossier",
            put(store_dossier_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/review",
            get(review_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/extra-cost",
            post(open_case_handler::<R, N>).get(case_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/extra-cost/validate-spp",
            post(validate_spp_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/extra-cost/approve-rup",
            post(approve_rup_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/extra-cost/determination",
            post(determination_handler::<R, N>),
        )
        .route(
            "/api/v1/projects/:project_id/extra-cost/communicate",
            post(communicate_handler::<R, N>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EstimateRequest {
    pub(crate) parameters: Option<ContractParameters>,
    #[serde(default)]
    pub(crate) cost_mode: CostMode,
    #[serde(default)]
    pub(crate) manual_costs: Option<ManualCosts>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) parameters: Option<ContractParameters>,
    pub(crate) tender: TenderDeclaration,
    #[serde(default)]
    pub(crate) cost_mode: CostMode,
    #[serde(default)]
    pub(crate) manual_costs: Option<ManualCosts>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThresholdCheckRequest {
    pub(crate) extra_cost: f64,
    pub(crate) contract_amount: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DossierRequest {
    pub(crate) parameters: Option<ContractParameters>,
    pub(crate) tender: TenderDeclaration,
    #[serde(default)]
    pub(crate) cost_mode: CostMode,
    #[serde(default)]
    pub(crate) manual_costs: Option<ManualCosts>,
}

async fn estimate_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Json(request): Json<EstimateRequest>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    let breakdown = state.service.breakdown(
        request.parameters.as_ref(),
        request.cost_mode,
        request.manual_costs.as_ref(),
    );
    (StatusCode::OK, Json(breakdown)).into_response()
}

async fn classify_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Json(request): Json<ClassifyRequest>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    let breakdown = state.service.breakdown(
        request.parameters.as_ref(),
        request.cost_mode,
        request.manual_costs.as_ref(),
    );
    let verdict = classifier::classify(&breakdown, &request.tender);
    (StatusCode::OK, Json(verdict)).into_response()
}

async fn threshold_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Json(request): Json<ThresholdCheckRequest>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    let verdict = state
        .thresholds
        .classify(request.extra_cost, request.contract_amount);
    (StatusCode::OK, Json(verdict)).into_response()
}

async fn store_dossier_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
    Json(request): Json<DossierRequest>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    let dossier = ProjectDossier {
        project_id: ProjectId(project_id),
        parameters: request.parameters,
        tender: request.tender,
        cost_mode: request.cost_mode,
        manual_costs: request.manual_costs,
    };

    match state.service.store_dossier(dossier) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "stored" }))).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn review_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state.service.review(&ProjectId(project_id)) {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn open_case_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state.service.open_case(&ProjectId(project_id)) {
        Ok(case) => (StatusCode::CREATED, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn case_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state.service.case(&ProjectId(project_id)) {
        Ok(case) => (StatusCode::OK, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn validate_spp_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
    Json(input): Json<SppValidationInput>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state.service.validate_spp(&ProjectId(project_id), input) {
        Ok(case) => (StatusCode::OK, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn approve_rup_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
    Json(input): Json<RupApprovalInput>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state.service.approve_rup(&ProjectId(project_id), input) {
        Ok(case) => (StatusCode::OK, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn determination_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
    Json(input): Json<DeterminationInput>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state
        .service
        .register_determination(&ProjectId(project_id), input)
    {
        Ok(case) => (StatusCode::OK, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

async fn communicate_handler<R, N>(
    State(state): State<GovernanceState<R, N>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: GovernanceRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    match state
        .service
        .communicate_to_contractor(&ProjectId(project_id))
    {
        Ok(case) => (StatusCode::OK, Json(case.status_view())).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Precondition(PreconditionViolation::MissingField(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Precondition(PreconditionViolation::OutOfOrder { .. }) => {
            StatusCode::CONFLICT
        }
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::NoActionRequired => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::Unavailable(_)) | ServiceError::Notifier(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
