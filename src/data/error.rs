use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the data layer
// ---------------------------------------------------------------------------

/// Errors the data layer can surface to callers.
///
/// Only two classes exist: a source file that cannot become a valid table,
/// and a caller asking for an option outside the supported set. Empty query
/// results are ordinary data, never errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file is absent, unreadable, structurally invalid, or
    /// contains a year that cannot be coerced to an integer. Fatal at
    /// startup: no dashboard can render without a valid base table.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// A caller selected a metric/option outside the enumerated set. The UI
    /// only ever offers enumerated options, so this indicates a programming
    /// error rather than a runtime condition to recover from.
    #[error("unsupported option: {option:?}")]
    Configuration { option: String },
}

impl DataError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DataError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn configuration(option: impl Into<String>) -> Self {
        DataError::Configuration {
            option: option.into(),
        }
    }
}
