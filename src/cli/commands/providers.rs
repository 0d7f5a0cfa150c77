//! Providers command implementation

use super::EXIT_SUCCESS;
use crate::domain::document::IDENTITY_MASK_NAMES;
use crate::masking::ProviderRegistry;
use clap::Args;
use std::io::Write;

/// Arguments for the providers command
#[derive(Args, Debug)]
pub struct ProvidersArgs {}

impl ProvidersArgs {
    /// Execute the providers command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let registry = ProviderRegistry::with_builtins();
        list_providers(&registry, &mut std::io::stdout().lock())?;
        Ok(EXIT_SUCCESS)
    }
}

/// Writes one line per registered mask type
pub fn list_providers(registry: &ProviderRegistry, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Registered mask types:")?;
    for mask_type in registry.identifiers() {
        let description = registry
            .get(mask_type)
            .map(|p| p.description().to_string())
            .unwrap_or_default();
        writeln!(out, "  {:<12} {}", mask_type.as_str(), description)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Pass-through names (no masking): {}",
        IDENTITY_MASK_NAMES.join(", ")
    )?;
    Ok(())
}
