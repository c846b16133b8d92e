//! Error types for the settlement engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SettleError>;

/// Errors that can occur while netting, propagating or reading balances.
#[derive(Error, Debug)]
pub enum SettleError {
    /// No party holds the requested amount, or the ledger is empty.
    #[error("No party holds amount {amount}")]
    NotFound { amount: i64 },

    /// The ledger ran dry before a requirement was met.
    #[error("Amounts do not sum to zero ({remaining} left unresolved)")]
    Unbalanced { remaining: i64 },

    /// A balance or transfer total does not fit in an `i64`.
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// The child -> parent structure is not a forest.
    #[error("Malformed forest: {0}")]
    MalformedForest(String),

    /// Some parties cannot be reached from the first one.
    #[error("{count} parties are disconnected")]
    Disconnected { count: usize },

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Amount text that is not a valid number at the configured scale
    #[error("Invalid amount {value:?}: {message}")]
    InvalidAmount { value: String, message: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: settle-engine [--sorted] [--scale N] <balances.csv>")]
    MissingArgument,

    /// Unrecognised command line flag
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),
}
