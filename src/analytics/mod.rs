//! Survival, treatment-response and molecular-correlation analytics.
//!
//! Everything here reads through `ClinicalRecordSource` and never writes.
//! Per-record derivations (`derive_survival_metrics`,
//! `derive_treatment_response`) are pure functions over fetched records;
//! the cohort aggregates take any `Cohort` so the molecular component can
//! rerun them unchanged on each subtype's patient set.

mod cohort;
mod comprehensive;
mod molecular;
mod response;
mod source;
mod stats;
mod survival;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cohort::*;
pub use comprehensive::*;
pub use molecular::*;
pub use response::*;
pub use source::*;
pub use survival::*;
pub use types::*;

// ── Tests ──────────────────────────────────────────────────────────────────
