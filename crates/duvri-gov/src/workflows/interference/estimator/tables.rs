//! Keyword tables mapping free-text risk labels to cost increments.
//!
//! Matching is case-insensitive substring containment against keyword stems
//! ("electric" catches "electrical", "electricity supply", ...). Within each
//! table a label contributes at most once: the first matching row wins. The
//! PPE table and the facility table are consulted independently, so a label
//! that appears in both contributes to both.

/// Per-worker PPE surcharge for a matched risk label, in euros.
pub(crate) const PPE_SURCHARGES: &[(&str, f64)] = &[
    ("biolog", 100.0),
    ("chemic", 120.0),
    ("radiolog", 150.0),
    ("electric", 80.0),
    ("fall", 120.0),
    ("height", 120.0),
    ("noise", 40.0),
    ("vibration", 30.0),
];

/// Risk stems that trigger the per-worker health-surveillance charge.
pub(crate) const HEALTH_SURVEILLANCE_KEYWORDS: &[&str] =
    &["biolog", "chemic", "radiolog", "noise", "vibration"];

/// Site-level cost increments for a matched risk label, in euros.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FacilityCosts {
    pub facilities: f64,
    pub inspections: f64,
    pub signage: f64,
    pub safety_devices: f64,
    pub other_measures: f64,
}

impl FacilityCosts {
    const fn new(
        facilities: f64,
        inspections: f64,
        signage: f64,
        safety_devices: f64,
        other_measures: f64,
    ) -> Self {
        Self {
            facilities,
            inspections,
            signage,
            safety_devices,
            other_measures,
        }
    }
}

pub(crate) const FACILITY_COSTS: &[(&str, FacilityCosts)] = &[
    ("biolog", FacilityCosts::new(500.0, 300.0, 0.0, 0.0, 0.0)),
    ("chemic", FacilityCosts::new(600.0, 400.0, 0.0, 0.0, 0.0)),
    ("radiolog", FacilityCosts::new(800.0, 500.0, 0.0, 0.0, 0.0)),
    ("electric", FacilityCosts::new(400.0, 200.0, 0.0, 0.0, 0.0)),
    ("fall", FacilityCosts::new(600.0, 0.0, 300.0, 0.0, 0.0)),
    ("height", FacilityCosts::new(600.0, 0.0, 300.0, 0.0, 0.0)),
    ("fire", FacilityCosts::new(500.0, 0.0, 0.0, 400.0, 0.0)),
    ("noise", FacilityCosts::new(0.0, 300.0, 0.0, 0.0, 0.0)),
    ("patient", FacilityCosts::new(0.0, 0.0, 400.0, 0.0, 300.0)),
];

/// First matching PPE surcharge for a label, 0 when nothing matches.
pub(crate) fn ppe_surcharge_for(label: &str) -> f64 {
    let lowered = label.to_lowercase();
    PPE_SURCHARGES
        .iter()
        .find(|(stem, _)| lowered.contains(stem))
        .map(|(_, surcharge)| *surcharge)
        .unwrap_or(0.0)
}

/// First matching facility-cost row for a label.
pub(crate) fn facility_costs_for(label: &str) -> Option<&'static FacilityCosts> {
    let lowered = label.to_lowercase();
    FACILITY_COSTS
        .iter()
        .find(|(stem, _)| lowered.contains(stem))
        .map(|(_, costs)| costs)
}

/// Whether a label makes health surveillance mandatory.
pub(crate) fn is_health_relevant(label: &str) -> bool {
    let lowered = label.to_lowercase();
    HEALTH_SURVEILLANCE_KEYWORDS
        .iter()
        .any(|stem| lowered.contains(stem))
}
