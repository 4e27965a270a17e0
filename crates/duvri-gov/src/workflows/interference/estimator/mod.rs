mod tables;

use serde::{Deserialize, Serialize};

use super::domain::{ContractParameters, CostMode};

/// Tunable rates behind the parametric estimate. Defaults carry the figures
/// mandated by the regional safety office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorRates {
    /// Contract amounts below this floor are raised to it.
    pub contract_amount_floor: f64,
    /// Durations of zero days are replaced by this many days.
    pub duration_floor_days: u32,
    /// The base coordination cost never drops below this figure.
    pub minimum_base_cost: f64,
    /// Upper clamp for the caller-supplied base-cost percentage.
    pub max_base_percentage: f64,
    pub ppe_base_per_worker: f64,
    pub training_per_worker: f64,
    pub health_surveillance_per_worker: f64,
    pub meeting_rate: f64,
    pub meeting_interval_days: u32,
    pub periodic_inspection_rate: f64,
    pub inspection_interval_days: u32,
}

impl Default for EstimatorRates {
    fn default() -> Self {
        Self {
            contract_amount_floor: 5000.0,
            duration_floor_days: 5,
            minimum_base_cost: 500.0,
            max_base_percentage: 3.0,
            ppe_base_per_worker: 150.0,
            training_per_worker: 200.0,
            health_surveillance_per_worker: 150.0,
            meeting_rate: 250.0,
            meeting_interval_days: 5,
            periodic_inspection_rate: 200.0,
            inspection_interval_days: 5,
        }
    }
}

/// Hand-entered component values. `None` keeps the computed figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualCosts {
    pub meetings: Option<f64>,
    pub ppe: Option<f64>,
    pub facilities: Option<f64>,
    pub signage: Option<f64>,
    pub safety_devices: Option<f64>,
    pub inspections: Option<f64>,
    pub other_measures: Option<f64>,
}

impl ManualCosts {
    pub fn is_empty(&self) -> bool {
        self.meetings.is_none()
            && self.ppe.is_none()
            && self.facilities.is_none()
            && self.signage.is_none()
            && self.safety_devices.is_none()
            && self.inspections.is_none()
            && self.other_measures.is_none()
    }
}

/// Breakdown of mandated safety costs. `total` always equals the sum of the
/// seven components; a fresh value is produced on every estimation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub meetings: f64,
    /// Full per-worker block: PPE base, risk surcharges, training and health
    /// surveillance, multiplied by the worker count.
    pub ppe: f64,
    pub facilities: f64,
    pub signage: f64,
    pub safety_devices: f64,
    pub inspections: f64,
    /// Risk-specific measures plus the base coordination cost, unless the
    /// component was manually overridden (the base cost is then dropped).
    pub other_measures: f64,
    pub total: f64,
    pub auto_computed: bool,
    pub explanatory_note: String,
}

impl CostBreakdown {
    /// Placeholder for projects with no contract parameters on file.
    pub fn empty() -> Self {
        Self {
            meetings: 0.0,
            ppe: 0.0,
            facilities: 0.0,
            signage: 0.0,
            safety_devices: 0.0,
            inspections: 0.0,
            other_measures: 0.0,
            total: 0.0,
            auto_computed: true,
            explanatory_note: "No contract parameters on file; empty estimate.".to_string(),
        }
    }

    pub fn component_sum(&self) -> f64 {
        self.meetings
            + self.ppe
            + self.facilities
            + self.signage
            + self.safety_devices
            + self.inspections
            + self.other_measures
    }
}

/// Stateless estimator applying the rate card to contract parameters.
///
/// All numeric inputs are clamped to documented floors instead of being
/// rejected; estimation never fails.
pub struct CostEstimator {
    rates: EstimatorRates,
}

impl CostEstimator {
    pub fn new(rates: EstimatorRates) -> Self {
        Self { rates }
    }

    pub fn standard() -> Self {
        Self::new(EstimatorRates::default())
    }

    pub fn rates(&self) -> &EstimatorRates {
        &self.rates
    }

    /// Fully parametric estimate.
    pub fn estimate(&self, params: &ContractParameters) -> CostBreakdown {
        self.estimate_with(params, None)
    }

    /// Parametric estimate with individual components optionally replaced by
    /// caller-supplied values.
    pub fn estimate_with(
        &self,
        params: &ContractParameters,
        overrides: Option<&ManualCosts>,
    ) -> CostBreakdown {
        let rates = &self.rates;

        let contract_amount = sanitize_amount(params.contract_base_amount, rates.contract_amount_floor);
        let worker_count = params.worker_count.max(1);
        let duration_days = if params.duration_days == 0 {
            rates.duration_floor_days
        } else {
            params.duration_days
        };

        // Base coordination cost: a caller-chosen percentage of the contract
        // amount, floored, and skipped entirely at 0%.
        let percentage = sanitize_percentage(params.base_cost_percentage, rates.max_base_percentage);
        let base_cost = if percentage > 0.0 {
            (contract_amount * percentage / 100.0).max(rates.minimum_base_cost)
        } else {
            0.0
        };

        // Per-worker block.
        let ppe_surcharge: f64 = params.risk_factors().map(tables::ppe_surcharge_for).sum();
        let health_surveillance = if params.risk_factors().any(tables::is_health_relevant) {
            rates.health_surveillance_per_worker
        } else {
            0.0
        };
        let per_worker = rates.ppe_base_per_worker
            + ppe_surcharge
            + rates.training_per_worker
            + health_surveillance;
        let ppe = per_worker * f64::from(worker_count);

        // Site-level increments per matched risk label.
        let mut facilities = 0.0;
        let mut signage = 0.0;
        let mut safety_devices = 0.0;
        let mut inspections = 0.0;
        let mut other_measures = 0.0;
        for label in params.risk_factors() {
            if let Some(costs) = tables::facility_costs_for(label) {
                facilities += costs.facilities;
                inspections += costs.inspections;
                signage += costs.signage;
                safety_devices += costs.safety_devices;
                other_measures += costs.other_measures;
            }
        }

        // Duration-driven costs.
        let meeting_count = (duration_days / rates.meeting_interval_days).max(1);
        let meetings = f64::from(meeting_count) * rates.meeting_rate;
        let periodic_inspections = (duration_days / rates.inspection_interval_days).max(1);
        inspections += f64::from(periodic_inspections) * rates.periodic_inspection_rate;

        // Manual overlay. The base cost rides in `other_measures` unless that
        // component itself is overridden.
        let overrides = overrides.filter(|manual| !manual.is_empty());
        let overridden = overrides.is_some();
        let manual = overrides.cloned().unwrap_or_default();

        let meetings = manual.meetings.unwrap_or(meetings);
        let ppe = manual.ppe.unwrap_or(ppe);
        let facilities = manual.facilities.unwrap_or(facilities);
        let signage = manual.signage.unwrap_or(signage);
        let safety_devices = manual.safety_devices.unwrap_or(safety_devices);
        let inspections = manual.inspections.unwrap_or(inspections);
        let other_measures = match manual.other_measures {
            Some(value) => value,
            None => other_measures + base_cost,
        };

        let total =
            meetings + ppe + facilities + signage + safety_devices + inspections + other_measures;
        let percent_of_contract = percent_or_zero(total, contract_amount);

        let mut explanatory_note = format!(
            "Parametric estimate: contract \u{20ac}{contract_amount:.2}, {worker_count} workers, \
             {duration_days} days, {} risk factors. Total \u{20ac}{total:.2} \
             ({percent_of_contract:.1}% of contract).",
            params.risk_factor_count(),
        );
        if overridden {
            explanatory_note.push_str(" Manual adjustments applied.");
        }

        CostBreakdown {
            meetings,
            ppe,
            facilities,
            signage,
            safety_devices,
            inspections,
            other_measures,
            total,
            auto_computed: !overridden,
            explanatory_note,
        }
    }

    /// Breakdown built solely from hand-entered values; absent components
    /// default to zero and the parametric path is skipped entirely.
    pub fn manual(&self, costs: &ManualCosts) -> CostBreakdown {
        let meetings = costs.meetings.unwrap_or(0.0);
        let ppe = costs.ppe.unwrap_or(0.0);
        let facilities = costs.facilities.unwrap_or(0.0);
        let signage = costs.signage.unwrap_or(0.0);
        let safety_devices = costs.safety_devices.unwrap_or(0.0);
        let inspections = costs.inspections.unwrap_or(0.0);
        let other_measures = costs.other_measures.unwrap_or(0.0);
        let total =
            meetings + ppe + facilities + signage + safety_devices + inspections + other_measures;

        CostBreakdown {
            meetings,
            ppe,
            facilities,
            signage,
            safety_devices,
            inspections,
            other_measures,
            total,
            auto_computed: false,
            explanatory_note: "Costs entered manually by the client organization.".to_string(),
        }
    }

    /// Produce the breakdown the way the owning dossier prescribes.
    pub fn for_mode(
        &self,
        params: Option<&ContractParameters>,
        mode: CostMode,
        manual: Option<&ManualCosts>,
    ) -> CostBreakdown {
        match mode {
            CostMode::Automatic => params
                .map(|params| self.estimate(params))
                .unwrap_or_else(CostBreakdown::empty),
            CostMode::ManualOverride => params
                .map(|params| self.estimate_with(params, manual))
                .unwrap_or_else(CostBreakdown::empty),
            CostMode::ManualFull => {
                let fallback = ManualCosts::default();
                self.manual(manual.unwrap_or(&fallback))
            }
        }
    }
}

fn sanitize_amount(amount: f64, floor: f64) -> f64 {
    if amount.is_finite() {
        amount.max(floor)
    } else {
        floor
    }
}

fn sanitize_percentage(percentage: f64, max: f64) -> f64 {
    if percentage.is_finite() {
        percentage.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Percentage with a guarded denominator: a zero or negative denominator
/// yields 0 rather than a division error.
pub fn percent_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}
