use crate::{
    catalog::Catalog,
    cli::args::Cli,
    config::{ConfigLoader, ScanConfig},
    output::{printer, writer},
    scan::{Scanner, fetch::HttpProber},
    utils::logging,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::BufReader;

pub async fn run(cli: Cli) -> Result<()> {
    let level = logging::level_from_cli(&cli);
    logging::init(level)?;

    // Everything that can fail at startup fails before a single request goes out.
    let file_config = ConfigLoader::load(cli.config.as_deref())?;
    let config = ScanConfig::from_cli(&cli, &file_config)?;

    let catalog = Catalog::load(&cli.fingerprints)
        .with_context(|| format!("Failed to load fingerprints from {:?}", cli.fingerprints))?;
    tracing::info!(
        "Loaded {} fingerprints ({} signatures); probing path {} with {} workers",
        catalog.len(),
        catalog.iter().map(|f| f.signatures.len()).sum::<usize>(),
        config.probe_path,
        config.workers
    );

    let prober = HttpProber::new(&config).context("Failed to build HTTP client")?;
    let scanner = Scanner::new(config.clone(), Arc::new(catalog), Arc::new(prober));

    let report = match &cli.target {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open target file: {:?}", path))?;
            scanner.run(BufReader::new(file)).await?
        }
        None => scanner.run(BufReader::new(tokio::io::stdin())).await?,
    };

    tracing::info!("Writing results to fingerprint files");
    let written = writer::write_buckets(&report.buckets, &config.output_dir)
        .context("Failed to write results")?;

    printer::print_summary(&report, &config.output_dir, written.len());
    Ok(())
}
