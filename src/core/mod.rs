//! Core orchestration for Veil.
//!
//! # Modules
//!
//! - [`run`] - Run orchestration, batch serialization, and reporting
//!
//! # Run Workflow
//!
//! 1. **Validate**: Check mask specs against the provider registry
//! 2. **Read**: Pull documents from the source one at a time
//! 3. **Mask**: Replace configured fields, drop suppressed ones
//! 4. **Batch**: Encode documents and group them into labelled batches
//! 5. **Write**: Hand each full batch to the sink
//! 6. **Report**: Produce the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use veil::config::load_config;
//! use veil::core::run::RunCoordinator;
//! use veil::masking::ProviderRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! let registry = ProviderRegistry::with_builtins();
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = RunCoordinator::from_config(&config, &registry, shutdown_rx).await?;
//!
//! let summary = coordinator.execute().await?;
//! println!("Emitted: {}", summary.documents_emitted);
//! println!("Skipped: {}", summary.documents_skipped);
//! # Ok(())
//! # }
//! ```

pub mod run;
