//! Dependency ordering of import jobs.

use std::fmt;

use thiserror::Error;

/// Errors raised when jobs cannot be ordered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The declared dependencies among the pending kinds form a cycle.
    #[error("dependency cycle among {}", remaining.join(", "))]
    Cycle {
        /// Kinds that could not be placed, in input order.
        remaining: Vec<String>,
    },
}

/// Order `jobs` so every job follows the jobs its kind depends on.
///
/// This is Kahn's algorithm with a stable tie-break: at each step the
/// earliest pending job whose dependencies are all placed is emitted next, so
/// independent jobs keep their input order. Dependencies on kinds with no
/// pending job are ignored.
///
/// # Errors
///
/// Returns [`OrderError::Cycle`] when no pending job is ready.
///
/// # Examples
///
/// ```
/// use geonames_data::catalog::{DatasetKind, order_jobs};
///
/// let jobs = vec![DatasetKind::Geoname, DatasetKind::Timezone, DatasetKind::FeatureCode];
/// let ordered = order_jobs(jobs, |kind| *kind, DatasetKind::dependencies)?;
/// assert_eq!(
///     ordered,
///     [DatasetKind::Timezone, DatasetKind::FeatureCode, DatasetKind::Geoname]
/// );
/// # Ok::<(), geonames_data::catalog::OrderError>(())
/// ```
pub fn order_jobs<T, K, F, D>(jobs: Vec<T>, kind_of: F, dependencies: D) -> Result<Vec<T>, OrderError>
where
    K: Copy + Eq + fmt::Display + 'static,
    F: Fn(&T) -> K,
    D: Fn(K) -> &'static [K],
{
    let mut pending: Vec<(K, T)> = jobs.into_iter().map(|job| (kind_of(&job), job)).collect();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().position(|(kind, _)| {
            dependencies(*kind)
                .iter()
                .all(|dependency| pending.iter().all(|(other, _)| other != dependency))
        });
        let Some(index) = ready else {
            return Err(OrderError::Cycle {
                remaining: pending.iter().map(|(kind, _)| kind.to_string()).collect(),
            });
        };
        let (_, job) = pending.remove(index);
        ordered.push(job);
    }

    Ok(ordered)
}
