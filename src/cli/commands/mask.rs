//! Mask command implementation
//!
//! This module implements the `mask` command, which runs the configured
//! source through the masking engine into the configured sink.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::config::{load_config, SinkKind, SourceKind, VeilConfig};
use crate::core::run::{RunCoordinator, RunSummary};
use crate::domain::VeilError;
use crate::masking::ProviderRegistry;
use clap::Args;
use std::io::Write;
use tokio::sync::watch;

/// Maximum number of document errors printed after a run
const MAX_PRINTED_ERRORS: usize = 10;

/// Arguments for the mask command
#[derive(Args, Debug, Default)]
pub struct MaskArgs {
    /// Keep unconfigured fields and mask in place
    #[arg(long, conflicts_with = "only_configured")]
    pub include_rest: bool,

    /// Emit only the configured fields
    #[arg(long)]
    pub only_configured: bool,

    /// Documents per output batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Input file or directory (repeatable; replaces configured paths)
    #[arg(short, long = "input", value_name = "PATH")]
    pub inputs: Vec<String>,

    /// Output directory for batch files
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<String>,

    /// Write batches to stdout instead of a directory
    #[arg(long)]
    pub stdout: bool,

    /// Output format (ndjson or bulk)
    #[arg(long)]
    pub format: Option<String>,

    /// Mask and count documents without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl MaskArgs {
    /// Execute the mask command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting mask command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            eprintln!("🔍 DRY RUN MODE - No data will be written");
            eprintln!();
        }

        let registry = ProviderRegistry::with_builtins();
        let coordinator =
            match RunCoordinator::from_config(&config, &registry, shutdown_signal).await {
                Ok(c) => c,
                Err(e @ VeilError::Configuration(_)) => {
                    tracing::error!(error = %e, "Invalid masking configuration");
                    eprintln!("Invalid masking configuration: {e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialize run");
                    eprintln!("Failed to initialize run: {e}");
                    return Ok(EXIT_FATAL);
                }
            };

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("Run failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        // Batches may be on stdout, so the report goes to stderr
        print_summary(&summary, &mut std::io::stderr().lock())?;

        Ok(exit_code(&summary))
    }

    /// Apply command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut VeilConfig) {
        if self.include_rest {
            tracing::info!("Enabling include-rest from CLI");
            config.masking.include_rest = true;
        }
        if self.only_configured {
            tracing::info!("Emitting only configured fields (from CLI)");
            config.masking.include_rest = false;
        }
        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size = batch_size, "Overriding batch size from CLI");
            config.masking.batch_size = Some(batch_size);
        }
        if !self.inputs.is_empty() {
            tracing::info!(inputs = ?self.inputs, "Overriding input paths from CLI");
            config.source.kind = SourceKind::Files;
            config.source.paths = self.inputs.clone();
        }
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output directory from CLI");
            config.sink.kind = SinkKind::Directory;
            config.sink.path = output.clone();
        }
        if self.stdout {
            tracing::info!("Writing batches to stdout");
            config.sink.kind = SinkKind::Stdout;
        }
        if let Some(format) = &self.format {
            tracing::info!(format = %format, "Overriding output format from CLI");
            config.masking.output_format = format.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }
}

/// Exit code for a finished run
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        EXIT_INTERRUPTED
    } else if summary.is_successful() {
        EXIT_SUCCESS
    } else {
        EXIT_PARTIAL
    }
}

/// Print a human-readable run summary
pub fn print_summary(summary: &RunSummary, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "📊 Run Summary:")?;
    writeln!(out, "  Run ID: {}", summary.run_id)?;
    writeln!(out, "  Read: {}", summary.documents_read)?;
    writeln!(out, "  Emitted: {}", summary.documents_emitted)?;
    writeln!(out, "  Skipped (malformed): {}", summary.documents_skipped)?;
    writeln!(out, "  Failed (provider): {}", summary.documents_failed)?;
    writeln!(out, "  Batches: {}", summary.batches_written)?;
    writeln!(out, "  Duration: {:.2}s", summary.duration.as_secs_f64())?;
    writeln!(out, "  Success Rate: {:.2}%", summary.success_rate())?;

    if !summary.cache.entries.is_empty() {
        writeln!(out, "  Masking maps:")?;
        for (mask_type, entries) in &summary.cache.entries {
            writeln!(out, "    {mask_type}: {entries}")?;
        }
    }
    writeln!(out)?;

    if !summary.errors.is_empty() {
        writeln!(out, "⚠️  Document errors:")?;
        for error in summary.errors.iter().take(MAX_PRINTED_ERRORS) {
            writeln!(out, "  - #{}: {}", error.position, error.message)?;
        }
        let total = summary.error_count();
        if total > MAX_PRINTED_ERRORS as u64 {
            writeln!(out, "  ... and {} more", total - MAX_PRINTED_ERRORS as u64)?;
        }
        writeln!(out)?;
    }

    if summary.interrupted {
        writeln!(out, "⚠️  Run interrupted. Pending documents were flushed.")?;
    } else if summary.dry_run {
        writeln!(out, "✅ Dry run completed, nothing written.")?;
    } else if summary.is_successful() {
        writeln!(out, "✅ Run completed successfully!")?;
    } else {
        writeln!(out, "⚠️  Run completed with skipped or failed documents")?;
    }
    Ok(())
}
