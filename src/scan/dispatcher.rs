use super::job::{Job, Target};
use crate::cli::args::Mode;
use crate::config::ScanConfig;
use crate::core::errors::TargetParseError;
use reqwest::Method;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

const ROOT_PATH: &str = "/";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub lines: usize,
    pub targets: usize,
    pub jobs: usize,
    pub parse_errors: usize,
}

/// Turns target lines into jobs and feeds the bounded queue.
pub struct Dispatcher {
    mode: Mode,
    probe_path: String,
    probe_root: bool,
    method: Method,
    body: String,
}

impl Dispatcher {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            mode: config.mode,
            probe_path: config.probe_path.clone(),
            probe_root: config.probe_root,
            method: config.method.clone(),
            body: config.body.clone(),
        }
    }

    /// The probe path job, plus a `/` job when root probing is on.
    pub fn jobs_for(&self, target: Target) -> Vec<Job> {
        let root_target = (self.probe_root && self.probe_path != ROOT_PATH).then(|| target.clone());

        let mut jobs = vec![Job::new(target, self.probe_path.clone(), self.method.clone(), self.body.clone())];
        if let Some(target) = root_target {
            jobs.push(Job::new(target, ROOT_PATH, self.method.clone(), self.body.clone()));
        }
        jobs
    }

    /// Read `input` to the end, submitting jobs as it goes. Lines that fail
    /// to parse, including non-UTF-8 bytes, are counted and skipped.
    ///
    /// `send` waits while the queue is full, so a slow pool throttles reading.
    /// The queue is closed when this returns because `queue` is dropped here.
    pub async fn run<R>(&self, mut input: R, queue: mpsc::Sender<Job>) -> std::io::Result<DispatchStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut stats = DispatchStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            stats.lines += 1;

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) => Target::parse_line(line, stats.lines, self.mode),
                Err(_) => Err(TargetParseError::Encoding { line: stats.lines }),
            };
            let target = match parsed {
                Ok(Some(target)) => target,
                Ok(None) => continue,
                Err(e) => {
                    stats.parse_errors += 1;
                    tracing::warn!("Skipping target record: {}", e);
                    continue;
                }
            };
            stats.targets += 1;

            for job in self.jobs_for(target) {
                if queue.send(job).await.is_err() {
                    tracing::error!("All workers have stopped; no more jobs can be queued");
                    return Ok(stats);
                }
                stats.jobs += 1;
            }
        }

        tracing::info!("Done ingesting jobs: {} jobs from {} targets", stats.jobs, stats.targets);
        Ok(stats)
    }
}
