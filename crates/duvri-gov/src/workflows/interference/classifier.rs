//! Five-branch regulatory classifier comparing operative safety costs against
//! the figures declared at tender time.
//!
//! The branches overlap (a zero declared figure satisfies both the
//! compensation and the no-base conditions), so rule order is part of the
//! contract: reconnaissance first, then compensation-without-figure, then
//! no-cost-basis, then the declared-figure comparison.

use serde::{Deserialize, Serialize};

use super::domain::{DuvriKind, TenderDeclaration};
use super::estimator::{percent_or_zero, CostBreakdown};

/// Ceiling for a supplemental act without a new tender procedure (art. 120).
const FIFTY_PERCENT_CAP: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Reconnaissance,
    OperationalCompensated,
    OperationalNoBase,
    OperationalWithBase,
}

impl ScenarioKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reconnaissance => "reconnaissance",
            Self::OperationalCompensated => "operational_compensated",
            Self::OperationalNoBase => "operational_no_base",
            Self::OperationalWithBase => "operational_with_base",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    FirstCalculation,
    CostsCompensated,
    NoCost,
    AllCostsExtra,
    ExtraCosts,
    Savings,
    Confirmed,
}

impl ScenarioStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstCalculation => "first_calculation",
            Self::CostsCompensated => "costs_compensated",
            Self::NoCost => "no_cost",
            Self::AllCostsExtra => "all_costs_extra",
            Self::ExtraCosts => "extra_costs",
            Self::Savings => "savings",
            Self::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegulatoryBasis {
    None,
    InternalCompensation,
    SupplementalActArt120,
}

impl RegulatoryBasis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::InternalCompensation => "internal-compensation",
            Self::SupplementalActArt120 => "supplemental-act-art120",
        }
    }
}

/// Severity hint for rendering the verdict message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// Outcome of one classification run. Never persisted; recomputed on demand
/// from the current parameters and tender declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioVerdict {
    pub scenario: ScenarioKind,
    pub status: ScenarioStatus,
    pub operative_total: f64,
    pub declared_costs: f64,
    /// Signed difference operative − declared; meaningful for the comparison
    /// scenarios only.
    pub delta: f64,
    pub percent_of_tender_amount: f64,
    pub requires_action: bool,
    pub regulatory_basis: RegulatoryBasis,
    pub exceeds_fifty_percent_cap: bool,
    pub alert_level: AlertLevel,
    pub message: String,
}

/// Classify the operative cost breakdown against the tender declaration.
/// Total function: every input combination maps to exactly one verdict.
pub fn classify(breakdown: &CostBreakdown, tender: &TenderDeclaration) -> ScenarioVerdict {
    let operative_total = breakdown.total;
    let declared_costs = tender.declared_security_costs;
    let percent_of_tender_amount = percent_or_zero(operative_total, tender.tender_base_amount);

    // Rule 1: a reconnaissance DUVRI is a pre-tender estimate, not a
    // comparison, whatever the declared figures say.
    if tender.duvri_kind == DuvriKind::Reconnaissance {
        return ScenarioVerdict {
            scenario: ScenarioKind::Reconnaissance,
            status: ScenarioStatus::FirstCalculation,
            operative_total,
            declared_costs,
            delta: 0.0,
            percent_of_tender_amount,
            requires_action: false,
            regulatory_basis: RegulatoryBasis::None,
            exceeds_fifty_percent_cap: false,
            alert_level: AlertLevel::Info,
            message: format!(
                "Estimated interference costs for the tender documents: \u{20ac}{operative_total:.2}"
            ),
        };
    }

    // Rule 2: costs were folded into general overheads without being
    // itemized.
    if tender.costs_included_in_tender && declared_costs == 0.0 {
        if operative_total > 0.0 {
            return ScenarioVerdict {
                scenario: ScenarioKind::OperationalCompensated,
                status: ScenarioStatus::CostsCompensated,
                operative_total,
                declared_costs,
                delta: 0.0,
                percent_of_tender_amount,
                requires_action: true,
                regulatory_basis: RegulatoryBasis::InternalCompensation,
                exceeds_fifty_percent_cap: false,
                alert_level: AlertLevel::Info,
                message: format!(
                    "Internal compensation: interference costs (\u{20ac}{operative_total:.2}) \
                     absorbed into general overheads. A reconciliation record between the \
                     procuring authority and the contractor is required."
                ),
            };
        }
        return no_cost_verdict(
            ScenarioKind::OperationalCompensated,
            declared_costs,
            percent_of_tender_amount,
        );
    }

    // Rule 3: no cost basis existed at all, so every operative euro is extra.
    if !tender.costs_included_in_tender || declared_costs == 0.0 {
        if operative_total > 0.0 {
            let exceeds = percent_of_tender_amount > FIFTY_PERCENT_CAP;
            return ScenarioVerdict {
                scenario: ScenarioKind::OperationalNoBase,
                status: ScenarioStatus::AllCostsExtra,
                operative_total,
                declared_costs,
                delta: operative_total,
                percent_of_tender_amount,
                requires_action: true,
                regulatory_basis: RegulatoryBasis::SupplementalActArt120,
                exceeds_fifty_percent_cap: exceeds,
                alert_level: if exceeds {
                    AlertLevel::Danger
                } else {
                    AlertLevel::Warning
                },
                message: format!(
                    "Supplemental act required (art. 120): interferences were not priced in the \
                     tender. Total costs \u{20ac}{operative_total:.2} \
                     ({percent_of_tender_amount:.1}% of the tender amount). {}",
                    cap_note(exceeds)
                ),
            };
        }
        return no_cost_verdict(
            ScenarioKind::OperationalNoBase,
            declared_costs,
            percent_of_tender_amount,
        );
    }

    // Rule 4: a declared cost basis exists; compare against it.
    let delta = operative_total - declared_costs;
    if delta > 0.0 {
        let percent_delta = percent_or_zero(delta, tender.tender_base_amount);
        let exceeds = percent_delta > FIFTY_PERCENT_CAP;
        return ScenarioVerdict {
            scenario: ScenarioKind::OperationalWithBase,
            status: ScenarioStatus::ExtraCosts,
            operative_total,
            declared_costs,
            delta,
            percent_of_tender_amount,
            requires_action: true,
            regulatory_basis: RegulatoryBasis::SupplementalActArt120,
            exceeds_fifty_percent_cap: exceeds,
            alert_level: if exceeds {
                AlertLevel::Danger
            } else {
                AlertLevel::Warning
            },
            message: format!(
                "Supplemental act (art. 120): extra costs \u{20ac}{delta:.2} versus the tender \
                 figure ({percent_delta:.1}% of the tender amount). {}",
                cap_note(exceeds)
            ),
        };
    }

    if delta < 0.0 {
        return ScenarioVerdict {
            scenario: ScenarioKind::OperationalWithBase,
            status: ScenarioStatus::Savings,
            operative_total,
            declared_costs,
            delta,
            percent_of_tender_amount,
            requires_action: false,
            regulatory_basis: RegulatoryBasis::None,
            exceeds_fifty_percent_cap: false,
            alert_level: AlertLevel::Success,
            message: format!(
                "Savings of \u{20ac}{:.2} against the security costs declared at tender.",
                delta.abs()
            ),
        };
    }

    ScenarioVerdict {
        scenario: ScenarioKind::OperationalWithBase,
        status: ScenarioStatus::Confirmed,
        operative_total,
        declared_costs,
        delta: 0.0,
        percent_of_tender_amount,
        requires_action: false,
        regulatory_basis: RegulatoryBasis::None,
        exceeds_fifty_percent_cap: false,
        alert_level: AlertLevel::Success,
        message: "Operative costs confirm the figure declared at tender.".to_string(),
    }
}

fn no_cost_verdict(
    scenario: ScenarioKind,
    declared_costs: f64,
    percent_of_tender_amount: f64,
) -> ScenarioVerdict {
    ScenarioVerdict {
        scenario,
        status: ScenarioStatus::NoCost,
        operative_total: 0.0,
        declared_costs,
        delta: 0.0,
        percent_of_tender_amount,
        requires_action: false,
        regulatory_basis: RegulatoryBasis::None,
        exceeds_fifty_percent_cap: false,
        alert_level: AlertLevel::Success,
        message: "No interference costs detected.".to_string(),
    }
}

fn cap_note(exceeds: bool) -> &'static str {
    if exceeds {
        "Exceeds the 50% cap: a new tender procedure is needed."
    } else {
        "Within the 50% cap."
    }
}
