use crate::cli::args::Mode;
use crate::core::errors::FetchError;
use crate::scan::ScanReport;
use crate::scan::job::{FetchResult, Job, Target};
use colored::Colorize;
use std::path::Path;

/// Reports per-job outcomes as they happen. Matches go to stdout; misses and
/// failures are debug diagnostics only.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    mode: Mode,
    debug: bool,
}

impl Reporter {
    pub fn new(mode: Mode, debug: bool) -> Self {
        Self { mode, debug }
    }

    pub fn match_line(&self, target: &Target, fingerprint: &str) -> String {
        match self.mode {
            Mode::Simple => format!("{} found at {}", fingerprint, target.host),
            Mode::Extended => format!("https://{}:{}", target.host, fingerprint),
        }
    }

    pub fn report_match(&self, job: &Job, result: &FetchResult) {
        let Some(fingerprint) = result.matched.as_deref() else {
            return;
        };
        println!("{}", self.match_line(&job.target, fingerprint));
        if let Some(title) = result.title.as_deref() {
            tracing::debug!("{}{} title: {:?}", job.target.host, job.path, title);
        }
    }

    pub fn report_no_match(&self, job: &Job, status: u16) {
        if self.debug {
            tracing::debug!("No match for {}{} (status {})", job.target.host, job.path, status);
        }
    }

    pub fn report_failure(&self, error: &FetchError) {
        if self.debug {
            tracing::debug!("{}", error);
        }
    }
}

pub fn print_summary(report: &ScanReport, output_dir: &Path, files_written: usize) {
    eprintln!("\n{}", "Scan complete".green().bold());

    eprintln!("\n{}", "Input:".yellow().bold());
    eprintln!("  Lines read: {}", report.dispatch.lines);
    eprintln!("  Targets: {}", report.dispatch.targets.to_string().green().bold());
    if report.dispatch.parse_errors > 0 {
        eprintln!(
            "  Malformed records: {}",
            report.dispatch.parse_errors.to_string().red().bold()
        );
    }

    eprintln!("\n{}", "Execution:".yellow().bold());
    eprintln!(
        "  Jobs: {}/{}",
        report.workers.processed.to_string().green().bold(),
        report.dispatch.jobs
    );
    eprintln!("  Matched: {}", report.workers.matched.to_string().green().bold());
    eprintln!("  No match: {}", report.workers.unmatched);
    if report.workers.failed > 0 {
        eprintln!("  Fetch failures: {}", report.workers.failed.to_string().red());
    }

    if !report.buckets.is_empty() {
        eprintln!("\n{}", "Fingerprints:".yellow().bold());
        for (name, targets) in report.buckets.iter() {
            eprintln!("  • {}: {}", name.cyan(), targets.len());
        }
    }

    eprintln!(
        "\n{}",
        format!("{} result file(s) written to {}", files_written, output_dir.display()).dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_line_formats() {
        let target = Target::domain("example.com");
        assert_eq!(
            Reporter::new(Mode::Simple, false).match_line(&target, "Tomcat"),
            "Tomcat found at example.com"
        );
        assert_eq!(
            Reporter::new(Mode::Extended, false).match_line(&target, "Tomcat"),
            "https://example.com:Tomcat"
        );
    }
}
