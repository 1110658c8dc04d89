//! Pipeline steps over trade and reference tables
//!
//! Each submodule implements one batch step: taxonomy traversal, per-entity
//! consolidation, location splitting and single-year conversion. `batch`
//! holds the shared per-entity runner.

pub mod batch;
pub mod consolidate;
pub mod convert;
pub mod split;
pub mod taxonomy;
