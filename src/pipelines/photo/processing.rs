// SPDX-License-Identifier: GPL-3.0-only

//! Async post-processing of captured photos
//!
//! Each capture is filtered on tokio's blocking pool, so the task awaiting it
//! keeps running while the filter works through the frame. Captures never
//! share buffers: every worker owns the frame it was handed.

use crate::errors::{FilterError, FilterResult};
use crate::filters::{CancelToken, ExecutionPath, FilterEngine, FilterId, PixelBuffer};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Post-processing configuration
#[derive(Debug, Clone)]
pub struct PostProcessingConfig {
    /// Filter to apply
    pub filter: FilterId,
    /// Return the unfiltered capture when filtering fails
    pub fallback_to_source: bool,
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self {
            filter: FilterId::None,
            fallback_to_source: true,
        }
    }
}

type Worker = JoinHandle<FilterResult<PixelBuffer>>;

/// Post-processor for captured frames
#[derive(Debug, Clone)]
pub struct PostProcessor {
    engine: FilterEngine,
    config: PostProcessingConfig,
    cancel: CancelToken,
}

impl PostProcessor {
    pub fn new(engine: FilterEngine, config: PostProcessingConfig) -> Self {
        Self {
            engine,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Share an existing cancellation flag with this processor
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn config(&self) -> &PostProcessingConfig {
        &self.config
    }

    /// Filter one capture without blocking the calling task
    pub async fn process(&self, pixels: PixelBuffer) -> FilterResult<PixelBuffer> {
        info!(
            width = pixels.width(),
            height = pixels.height(),
            filter = self.config.filter.name(),
            "Starting post-processing"
        );

        let (source, worker) = self.spawn(pixels);
        let result = self.finish(source, worker.await);

        if result.is_ok() {
            debug!("Post-processing complete");
        }
        result
    }

    /// Filter several captures concurrently, one worker each
    ///
    /// Results come back in input order.
    pub async fn process_batch(&self, captures: Vec<PixelBuffer>) -> Vec<FilterResult<PixelBuffer>> {
        info!(count = captures.len(), filter = self.config.filter.name(), "Starting batch");

        let workers: Vec<_> = captures
            .into_iter()
            .map(|pixels| self.spawn(pixels))
            .collect();

        let mut results = Vec::with_capacity(workers.len());
        for (source, worker) in workers {
            results.push(self.finish(source, worker.await));
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(count = results.len(), failed, "Batch complete");
        results
    }

    fn spawn(&self, pixels: PixelBuffer) -> (Option<PixelBuffer>, Worker) {
        let filter = self.config.filter;

        // identity hands the buffer straight back, nothing to keep
        let source = (self.config.fallback_to_source
            && self.engine.path_for(filter) != ExecutionPath::Identity)
            .then(|| pixels.clone());

        let engine = self.engine.clone();
        let cancel = self.cancel.clone();
        let worker = tokio::task::spawn_blocking(move || {
            engine.apply_cancellable(pixels, filter, &cancel)
        });

        (source, worker)
    }

    fn finish(
        &self,
        source: Option<PixelBuffer>,
        joined: Result<FilterResult<PixelBuffer>, tokio::task::JoinError>,
    ) -> FilterResult<PixelBuffer> {
        let result = joined
            .map_err(|e| FilterError::Worker(format!("Post-processing task error: {}", e)))
            .and_then(|r| r);

        match (result, source) {
            (Ok(filtered), _) => Ok(filtered),
            (Err(FilterError::Cancelled), _) => Err(FilterError::Cancelled),
            (Err(e), Some(source)) => {
                warn!(error = %e, filter = self.config.filter.name(), "Filter failed, keeping unfiltered capture");
                Ok(source)
            }
            (Err(e), None) => Err(e),
        }
    }
}
