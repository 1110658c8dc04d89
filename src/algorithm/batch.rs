//! Per-entity batch execution
//!
//! Runs one operation over every entity directory under a root and collects
//! an outcome per entity. A failing entity never stops the others; the
//! caller decides what a partial failure means via [`BatchReport::into_result`].

use std::fmt;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::error::{Result, TradeDataError};
use crate::utils::io::{EntityDir, list_entity_dirs};
use crate::utils::logging::{create_entity_progress_bar, finish_progress_bar};

/// What happened to one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityResult {
    /// Files were read and a rewritten file was persisted
    Processed {
        /// Number of input files read
        inputs: usize,
        /// Rows read across all inputs
        rows_in: usize,
        /// Rows written
        rows_out: usize,
    },
    /// Nothing to do; existing files were left untouched
    Skipped { reason: String },
}

/// Outcome of one entity in a batch run
#[derive(Debug)]
pub struct EntityOutcome {
    pub entity: String,
    pub result: Result<EntityResult>,
}

/// Per-entity outcomes of a batch run, in entity name order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<EntityOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn processed(&self) -> impl Iterator<Item = (&str, &EntityResult)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(result @ EntityResult::Processed { .. }) => Some((o.entity.as_str(), result)),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(EntityResult::Skipped { reason }) => Some((o.entity.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &TradeDataError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.entity.as_str(), e)))
    }

    /// Outcome for a single entity
    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&Result<EntityResult>> {
        self.outcomes
            .iter()
            .find(|o| o.entity == entity)
            .map(|o| &o.result)
    }

    /// Turn a report with failed entities into a `Batch` error
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed().count();
        if failed > 0 {
            return Err(TradeDataError::Batch {
                failed,
                total: self.total(),
            });
        }
        Ok(self)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities: {} processed, {} skipped, {} failed",
            self.total(),
            self.processed().count(),
            self.skipped().count(),
            self.failed().count()
        )
    }
}

/// Run `operation` on every entity directory under `root`
///
/// With `config.parallel` set the entities are spread over a dedicated
/// rayon pool of `config.worker_count()` threads. Entities never read each
/// other's files, so no coordination beyond the final collect is needed.
pub fn run_per_entity<F>(
    root: &Path,
    config: &PipelineConfig,
    label: &str,
    operation: F,
) -> Result<BatchReport>
where
    F: Fn(&EntityDir) -> Result<EntityResult> + Sync,
{
    let start = Instant::now();
    let entities = list_entity_dirs(root)?;
    log::info!(
        "{label}: {} entity directories under {}",
        entities.len(),
        root.display()
    );

    let pb = create_entity_progress_bar(entities.len() as u64, label, config.progress);
    let run_one = |entity: &EntityDir| {
        log::info!("{}", entity.name);
        let result = operation(entity);
        match &result {
            Ok(EntityResult::Processed { rows_out, .. }) => {
                log::debug!("{}: wrote {rows_out} rows", entity.name);
            }
            Ok(EntityResult::Skipped { reason }) => {
                log::warn!("{}: skipped ({reason})", entity.name);
            }
            Err(e) => log::error!("{}: {e}", entity.name),
        }
        pb.inc(1);
        EntityOutcome {
            entity: entity.name.clone(),
            result,
        }
    };

    let outcomes = if config.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .build()
            .map_err(|e| TradeDataError::other(format!("Failed to build worker pool: {e}")))?;
        pool.install(|| entities.par_iter().map(run_one).collect::<Vec<_>>())
    } else {
        entities.iter().map(run_one).collect::<Vec<_>>()
    };

    let report = BatchReport { outcomes };
    finish_progress_bar(&pb, &report.to_string());
    log::info!("{label} finished in {:?}: {report}", start.elapsed());
    Ok(report)
}
