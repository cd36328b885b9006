use super::aggregator::AggregatorHandle;
use super::fetch::Prober;
use super::job::Job;
use crate::catalog::Catalog;
use crate::matcher::match_response;
use crate::output::printer::Reporter;
use std::ops::AddAssign;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

pub type JobQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub processed: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.matched += rhs.matched;
        self.unmatched += rhs.unmatched;
        self.failed += rhs.failed;
    }
}

/// Everything a worker reads; shared, never mutated.
pub struct WorkerContext {
    pub catalog: Arc<Catalog>,
    pub prober: Arc<dyn Prober>,
    pub results: AggregatorHandle,
    pub reporter: Reporter,
}

/// A fixed set of workers draining one bounded queue.
pub struct WorkerPool {
    set: JoinSet<WorkerStats>,
}

impl WorkerPool {
    pub fn spawn(workers: usize, queue: mpsc::Receiver<Job>, context: WorkerContext) -> Self {
        let queue: JobQueue = Arc::new(Mutex::new(queue));
        let context = Arc::new(context);
        let mut set = JoinSet::new();

        for id in 0..workers {
            let queue = Arc::clone(&queue);
            let context = Arc::clone(&context);
            set.spawn(async move { run_worker(id, queue, context).await });
        }

        tracing::info!("Started {} workers", workers);
        Self { set }
    }

    /// Completion barrier: resolves only after every worker has seen the
    /// queue closed and drained, and exited.
    pub async fn join(mut self) -> WorkerStats {
        let mut total = WorkerStats::default();
        while let Some(joined) = self.set.join_next().await {
            match joined {
                Ok(stats) => total += stats,
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }
        total
    }
}

async fn run_worker(id: usize, queue: JobQueue, context: Arc<WorkerContext>) -> WorkerStats {
    let mut stats = WorkerStats::default();

    loop {
        // None once the dispatcher has dropped its sender and the queue is empty.
        let next = queue.lock().await.recv().await;
        let Some(job) = next else { break };

        stats.processed += 1;
        process_job(&job, &context, &mut stats).await;
    }

    tracing::trace!("Worker {} exiting after {} jobs", id, stats.processed);
    stats
}

async fn process_job(job: &Job, context: &WorkerContext, stats: &mut WorkerStats) {
    let mut result = match context.prober.probe(job).await {
        Ok(result) => result,
        Err(e) => {
            stats.failed += 1;
            context.reporter.report_failure(&e);
            return;
        }
    };

    match match_response(&result.raw_response, &context.catalog) {
        Some(fingerprint) => {
            stats.matched += 1;
            if fingerprint.status_differs(result.status) {
                tracing::debug!(
                    "{} matched {} with status {} (catalog expects {:?})",
                    job.target.host,
                    fingerprint.name,
                    result.status,
                    fingerprint.expected_status
                );
            }
            result.matched = Some(fingerprint.name.clone());
            context.reporter.report_match(job, &result);
            context
                .results
                .record(&fingerprint.name, job.target.identifier());
        }
        None => {
            stats.unmatched += 1;
            context.reporter.report_no_match(job, result.status);
        }
    }
}
