//! Interference-cost governance for DUVRI safety coordination workflows.
//!
//! The crate owns the three decision-making pieces of the application: the
//! parametric safety-cost estimator, the regulatory scenario classifiers, and
//! the legally ordered extra-cost approval workflow. Persistence and
//! notification are boundary traits implemented by the hosting service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
