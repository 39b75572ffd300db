//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;
use tracing::warn;

use quotebox_core::{CategoryFilter, Pick, Quote};

/// Shown when there is nothing to pick from
pub const NO_QUOTES: &str = "No quotes found.";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print the quote picked for display
    pub fn print_pick(&self, pick: &Pick) {
        match self.format {
            OutputFormat::Human => {
                println!("\"{}\"", pick.quote.text);
                println!("  - {}", pick.quote.category);
            }
            OutputFormat::Json => print_json(pick),
            OutputFormat::Quiet => println!("{}", pick.quote.text),
        }
    }

    /// Print the fallback shown when no quote matches
    pub fn print_no_quotes(&self) {
        match self.format {
            OutputFormat::Human => println!("{}", NO_QUOTES),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"quote": null, "message": NO_QUOTES}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a list of quotes with their store index
    pub fn print_quotes(&self, quotes: &[(usize, &Quote)]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("{}", NO_QUOTES);
                    return;
                }
                for (index, quote) in quotes {
                    println!(
                        "{:>3} | {} | {}",
                        index,
                        truncate(&quote.category, 15),
                        truncate(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                let items: Vec<&Quote> = quotes.iter().map(|(_, q)| *q).collect();
                print_json(&items);
            }
            OutputFormat::Quiet => {
                for (_, quote) in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print the category list, marking the active filter
    pub fn print_categories(&self, categories: &[String], active: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                for category in categories {
                    let marker = if category == active.as_str() { "*" } else { " " };
                    println!("{} {}", marker, category);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"categories": categories, "selected": active.as_str()})
                );
            }
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a notification from the notice board
    pub fn notice(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("» {}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"notice": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Print a value as pretty JSON, logging if it can't be serialized
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
