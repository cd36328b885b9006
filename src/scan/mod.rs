//! The scan pipeline: target stream -> dispatcher -> bounded queue -> worker
//! pool -> matcher -> aggregator.

pub mod aggregator;
pub mod dispatcher;
pub mod fetch;
pub mod job;
pub mod worker;

pub use aggregator::MatchBucket;

use crate::catalog::Catalog;
use crate::config::ScanConfig;
use crate::output::printer::Reporter;
use aggregator::Aggregator;
use anyhow::{Context, Result};
use dispatcher::{DispatchStats, Dispatcher};
use fetch::Prober;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use worker::{WorkerContext, WorkerPool, WorkerStats};

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub dispatch: DispatchStats,
    pub workers: WorkerStats,
    pub buckets: MatchBucket,
}

pub struct Scanner {
    config: ScanConfig,
    catalog: Arc<Catalog>,
    prober: Arc<dyn Prober>,
}

impl Scanner {
    pub fn new(config: ScanConfig, catalog: Arc<Catalog>, prober: Arc<dyn Prober>) -> Self {
        Self {
            config,
            catalog,
            prober,
        }
    }

    /// Run one full scan over `input` and return the finalized buckets.
    ///
    /// Returns only after the queue is closed and drained and every worker
    /// has exited. A read error on `input` is reported after that barrier.
    pub async fn run<R>(&self, input: R) -> Result<ScanReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let (queue_tx, queue_rx) = mpsc::channel(self.config.queue_capacity);
        let (aggregator, results) = Aggregator::spawn();

        let pool = WorkerPool::spawn(
            self.config.workers,
            queue_rx,
            WorkerContext {
                catalog: Arc::clone(&self.catalog),
                prober: Arc::clone(&self.prober),
                results,
                reporter: Reporter::new(self.config.mode, self.config.debug),
            },
        );

        let dispatched = Dispatcher::new(&self.config).run(input, queue_tx).await;

        let workers = pool.join().await;
        let buckets = aggregator
            .snapshot()
            .await
            .context("Result aggregator failed")?;
        let dispatch = dispatched.context("Failed to read targets")?;

        tracing::info!(
            "Processed {}/{} jobs: {} matched, {} unmatched, {} failed",
            workers.processed,
            dispatch.jobs,
            workers.matched,
            workers.unmatched,
            workers.failed
        );

        Ok(ScanReport {
            dispatch,
            workers,
            buckets,
        })
    }
}
