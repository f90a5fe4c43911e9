//! Error types for dataset synthesis, persistence and dashboard rendering.
//!
//! The taxonomy is deliberately small: a ratio over an empty group, a lookup
//! against a dimension table that has no matching record, and a persisted
//! table that does not match its declared column contract. Everything else
//! is carried through from the underlying io/csv/template crates.

use thiserror::Error;

/// Errors raised while building or consuming the tabular datasets
#[derive(Error, Debug)]
pub enum DataError {
    /// A ratio or average was requested over an empty denominator group.
    /// Generator call sites recover by substituting zero; renderer headline
    /// metrics treat this as fatal.
    #[error("division by zero while computing {0}")]
    DivisionByZero(String),

    /// An observation row references a dimension record that does not exist.
    /// The datasets are internally generated, so this indicates a schema bug
    /// and is never recovered.
    #[error("no {kind} dimension record for '{key}'")]
    MissingDimension { kind: &'static str, key: String },

    /// A generator parameter that cannot produce a single draw, such as an
    /// empty dimension list or an inverted sampling band
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A persisted table does not match its declared column contract
    #[error("malformed input in {file}: expected column '{column}' at position {position}")]
    MalformedInput {
        file: String,
        column: String,
        position: usize,
    },

    /// CSV parsing/writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template rendering failed
    #[error("template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_names_the_computation() {
        let err = DataError::DivisionByZero("average invoice amount".to_string());
        assert_eq!(
            err.to_string(),
            "division by zero while computing average invoice amount"
        );
    }

    #[test]
    fn missing_dimension_names_kind_and_key() {
        let err = DataError::MissingDimension {
            kind: "region",
            key: "Atlantis".to_string(),
        };
        assert_eq!(err.to_string(), "no region dimension record for 'Atlantis'");
    }

    #[test]
    fn invalid_parameter_names_the_offender() {
        let err = DataError::InvalidParameter("revenue_jitter requires low < high".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: revenue_jitter requires low < high"
        );
    }

    #[test]
    fn malformed_input_names_file_and_column() {
        let err = DataError::MalformedInput {
            file: "monthly_sales.csv".to_string(),
            column: "revenue".to_string(),
            position: 4,
        };
        assert_eq!(
            err.to_string(),
            "malformed input in monthly_sales.csv: expected column 'revenue' at position 4"
        );
    }
}
