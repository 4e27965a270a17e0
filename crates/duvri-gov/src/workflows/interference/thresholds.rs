//! Simplified threshold-based scenario check.
//!
//! This is a second, deliberately separate strategy next to the five-branch
//! classifier: an OR over two thresholds decides between internal
//! compensation and the supplemental-act path. Call sites pick the strategy
//! they need; the two are never merged.

use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;

use super::estimator::percent_or_zero;

/// Regulatory thresholds for the simplified check.
///
/// Compensation applies when the extra cost sits below the absolute euro
/// threshold OR below the percentage threshold; otherwise the supplemental
/// act applies, flagged when the percentage exceeds the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub compensation_absolute_threshold: f64,
    pub compensation_percentage_threshold: f64,
    pub max_supplemental_percentage: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            compensation_absolute_threshold: 1000.0,
            compensation_percentage_threshold: 3.0,
            max_supplemental_percentage: 50.0,
        }
    }
}

impl From<&ThresholdConfig> for ThresholdPolicy {
    fn from(config: &ThresholdConfig) -> Self {
        Self {
            compensation_absolute_threshold: config.compensation_absolute_eur,
            compensation_percentage_threshold: config.compensation_percentage,
            max_supplemental_percentage: config.max_supplemental_percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdScenario {
    Compensation,
    SupplementalActArt120,
}

impl ThresholdScenario {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compensation => "compensation",
            Self::SupplementalActArt120 => "supplemental_act_art120",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdVerdict {
    pub extra_cost: f64,
    pub contract_amount: f64,
    pub percent_of_contract: f64,
    pub below_absolute_threshold: bool,
    pub below_percentage_threshold: bool,
    pub scenario: ThresholdScenario,
    pub exceeds_cap: bool,
    pub rationale: String,
}

impl ThresholdPolicy {
    pub fn classify(&self, extra_cost: f64, contract_amount: f64) -> ThresholdVerdict {
        let percent_of_contract = percent_or_zero(extra_cost, contract_amount);

        let below_absolute_threshold = extra_cost < self.compensation_absolute_threshold;
        let below_percentage_threshold =
            percent_of_contract < self.compensation_percentage_threshold;
        let compensation = below_absolute_threshold || below_percentage_threshold;
        let exceeds_cap = percent_of_contract > self.max_supplemental_percentage;

        let scenario = if compensation {
            ThresholdScenario::Compensation
        } else {
            ThresholdScenario::SupplementalActArt120
        };

        let rationale = self.rationale(
            below_absolute_threshold,
            below_percentage_threshold,
            compensation,
            exceeds_cap,
        );

        ThresholdVerdict {
            extra_cost,
            contract_amount,
            percent_of_contract,
            below_absolute_threshold,
            below_percentage_threshold,
            scenario,
            exceeds_cap,
            rationale,
        }
    }

    fn rationale(
        &self,
        below_absolute: bool,
        below_percentage: bool,
        compensation: bool,
        exceeds_cap: bool,
    ) -> String {
        let absolute = self.compensation_absolute_threshold;
        let percentage = self.compensation_percentage_threshold;

        if compensation {
            if below_absolute && below_percentage {
                format!("Below both thresholds (\u{20ac}{absolute:.0} and {percentage}%)")
            } else if below_absolute {
                format!("Below the absolute threshold (\u{20ac}{absolute:.0})")
            } else {
                format!("Below the percentage threshold ({percentage}%)")
            }
        } else {
            let mut rationale =
                format!("Above both thresholds (\u{20ac}{absolute:.0} and {percentage}%)");
            if exceeds_cap {
                rationale.push_str(&format!(
                    " - exceeds the {}% supplemental-act cap",
                    self.max_supplemental_percentage
                ));
            }
            rationale
        }
    }
}
