//! Export and import command handlers

use std::path::PathBuf;

use anyhow::Result;

use quotebox_core::transfer::{import_file, write_export};
use quotebox_core::{ImportReport, QuoteStore};

use super::describe;
use crate::output::{print_json, Output, OutputFormat};

/// Write all quotes to a timestamped export file
pub fn export(store: &QuoteStore, dir: Option<PathBuf>, output: &Output) -> Result<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let path = write_export(store, &dir)
        .map_err(|e| describe(&format!("Failed to export quotes to {:?}", dir), e))?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({"path": path, "count": store.len()})
            );
        }
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => {
            output.success(&format!(
                "Exported {} quote(s) to {}",
                store.len(),
                path.display()
            ));
        }
    }
    Ok(())
}

/// Append the quotes of an export file to the store
pub fn import(store: &mut QuoteStore, file: PathBuf, output: &Output) -> Result<()> {
    let report =
        import_file(store, &file).map_err(|e| describe(&format!("Failed to import {:?}", file), e))?;

    print_import_report(&report, output);
    Ok(())
}

pub(crate) fn print_import_report(report: &ImportReport, output: &Output) {
    match output.format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Quiet => println!("{}", report.added),
        OutputFormat::Human => {
            if report.added == 0 {
                output.message("No valid quotes found in file.");
            } else {
                output.success(&format!("Quotes imported successfully! ({})", report.added));
            }
            if report.skipped > 0 {
                output.message(&format!("  Skipped {} invalid entr(ies)", report.skipped));
            }
        }
    }
}
