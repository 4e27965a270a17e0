use serde::{Deserialize, Serialize};

use super::estimator::ManualCosts;

/// Identifier wrapper for the project (one DUVRI dossier per project).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

/// Stage of the assessment: pre-tender reconnaissance estimates are never
/// compared against declared costs, operational assessments are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuvriKind {
    Reconnaissance,
    Operational,
}

impl DuvriKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reconnaissance => "reconnaissance",
            Self::Operational => "operational",
        }
    }
}

/// How the operative costs for a project are produced. Every call site that
/// would otherwise recompute consults this single flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    /// Parametric estimate from the contract parameters.
    #[default]
    Automatic,
    /// Parametric estimate with individual components replaced by hand.
    ManualOverride,
    /// Breakdown built solely from hand-entered component values.
    ManualFull,
}

impl CostMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::ManualOverride => "manual_override",
            Self::ManualFull => "manual_full",
        }
    }
}

fn default_base_cost_percentage() -> f64 {
    2.0
}

/// Contract and risk parameters feeding one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractParameters {
    pub contract_base_amount: f64,
    pub worker_count: u32,
    pub duration_days: u32,
    #[serde(default)]
    pub client_risk_factors: Vec<String>,
    #[serde(default)]
    pub contractor_risk_factors: Vec<String>,
    /// Percentage of the contract amount charged as base coordination cost,
    /// clamped to 0–3% by the estimator.
    #[serde(default = "default_base_cost_percentage")]
    pub base_cost_percentage: f64,
}

impl ContractParameters {
    /// Risk labels from both parties, client side first.
    pub fn risk_factors(&self) -> impl Iterator<Item = &str> {
        self.client_risk_factors
            .iter()
            .chain(self.contractor_risk_factors.iter())
            .map(String::as_str)
    }

    pub fn risk_factor_count(&self) -> usize {
        self.client_risk_factors.len() + self.contractor_risk_factors.len()
    }
}

/// Security-cost data asserted at tender time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderDeclaration {
    pub duvri_kind: DuvriKind,
    pub costs_included_in_tender: bool,
    pub declared_security_costs: f64,
    pub tender_base_amount: f64,
}

/// Everything the governance service persists for a project, short of the
/// extra-cost case itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDossier {
    pub project_id: ProjectId,
    /// Missing parameters yield an empty estimate rather than an error.
    pub parameters: Option<ContractParameters>,
    pub tender: TenderDeclaration,
    #[serde(default)]
    pub cost_mode: CostMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_costs: Option<ManualCosts>,
}
