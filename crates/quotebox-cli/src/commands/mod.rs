//! Command handlers

pub mod config;
pub mod quote;
pub mod status;
pub mod sync;
pub mod transfer;

use quotebox_core::QuoteError;

/// One-line description of a failed action, with a hint when one exists
pub(crate) fn failure_message(action: &str, err: &QuoteError) -> String {
    match err.recovery_suggestion() {
        Some(hint) => format!("{}: {}\nHint: {}", action, err, hint),
        None => format!("{}: {}", action, err),
    }
}

/// Wrap a core error for the top-level error report
pub(crate) fn describe(action: &str, err: QuoteError) -> anyhow::Error {
    let context = match err.recovery_suggestion() {
        Some(hint) => format!("{}\nHint: {}", action, hint),
        None => action.to_string(),
    };
    anyhow::Error::new(err).context(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebox_core::storage::Access;
    use quotebox_core::StorageError;
    use std::io;
    use std::path::PathBuf;

    fn permission_error() -> QuoteError {
        StorageError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/exports/quotes.json"),
            Access::Write,
        )
        .into()
    }

    #[test]
    fn test_failure_message_includes_hint() {
        let msg = failure_message("Export failed", &permission_error());
        assert!(msg.starts_with("Export failed: Permission denied"));
        assert!(msg.contains("Hint: "));
    }

    #[test]
    fn test_failure_message_without_hint() {
        let msg = failure_message("Import failed", &QuoteError::Format("bad".to_string()));
        assert_eq!(msg, "Import failed: Invalid quotes document: bad");
    }

    #[test]
    fn test_describe_keeps_source_and_hint() {
        let err = describe("Failed to export quotes", permission_error());

        assert!(err.to_string().contains("Hint: "));
        assert!(err.downcast_ref::<QuoteError>().is_some());
    }
}
