// SPDX-License-Identifier: GPL-3.0-only

//! Scanline execution and cooperative cancellation
//!
//! Every pass in the engine writes its output one row at a time. Rows are
//! independent, so they can be spread over the rayon pool or run in order on
//! the calling thread with identical results.

use crate::errors::{FilterError, FilterResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Controls how rows are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Run every row on the calling thread
    Serial,
    /// Spread rows over the global rayon pool
    #[default]
    ParallelRows,
}

/// Shared cancellation flag, checked before each row is started
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Apply `f(y, row)` to every `stride`-element row of `data`
///
/// A cancelled token stops the pass before the next row starts; rows already
/// started are always finished.
pub(crate) fn for_each_row<T, F>(
    data: &mut [T],
    stride: usize,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
    f: F,
) -> FilterResult<()>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if stride == 0 || data.len() % stride != 0 {
        return Err(FilterError::InvalidArgument(format!(
            "row stride {} does not divide buffer length {}",
            stride,
            data.len()
        )));
    }

    let run_row = |(y, row): (usize, &mut [T])| -> FilterResult<()> {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(FilterError::Cancelled);
        }
        f(y, row);
        Ok(())
    };

    match strategy {
        ExecutionStrategy::Serial => data
            .chunks_exact_mut(stride)
            .enumerate()
            .try_for_each(run_row),
        ExecutionStrategy::ParallelRows => data
            .par_chunks_exact_mut(stride)
            .enumerate()
            .try_for_each(run_row),
    }
}
