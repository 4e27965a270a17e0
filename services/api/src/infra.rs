use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use duvri_gov::workflows::interference::{
    CaseEvent, ExtraCostCase, GovernanceRepository, NotifyError, ProjectDossier, ProjectId,
    RepositoryError, WorkflowNotifier,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local repository backing the service until a database adapter is
/// wired in. Storage here is the single source of truth for the workflow.
#[derive(Default, Clone)]
pub(crate) struct InMemoryGovernanceRepository {
    dossiers: Arc<Mutex<HashMap<ProjectId, ProjectDossier>>>,
    cases: Arc<Mutex<HashMap<ProjectId, ExtraCostCase>>>,
}

impl GovernanceRepository for InMemoryGovernanceRepository {
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

/// Logs each completed workflow step and keeps the events for inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWorkflowNotifier {
    events: Arc<Mutex<Vec<CaseEvent>>>,
}

impl WorkflowNotifier for InMemoryWorkflowNotifier {
    fn publish(&self, event: CaseEvent) -> Result<(), NotifyError> {
        info!(
            project = %event.project_id.0,
            case = %event.case_id.0,
            state = event.state.label(),
            "{}", event.detail
        );
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

impl InMemoryWorkflowNotifier {
    pub(crate) fn events(&self) -> Vec<CaseEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
