use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Math Errors
// ============================================================================

/// Errors raised by checked fixed-point arithmetic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Arithmetic overflow occurred
    #[error("Math overflow in '{operation}' with values: {values:?}")]
    Overflow { operation: String, values: Vec<String> },

    /// Arithmetic underflow occurred
    #[error("Math underflow in '{operation}' with values: {values:?}")]
    Underflow { operation: String, values: Vec<String> },

    /// Division by zero
    #[error("Division by zero in context: {context}")]
    DivisionByZero { context: String },

    /// Text is not a number in the expected format
    #[error("Invalid number '{value}': {reason}")]
    InvalidNumber { value: String, reason: String },

    /// More fractional digits than the token supports
    #[error("Precision loss: '{value}' has more than {decimals} fractional digits")]
    PrecisionLoss { value: String, decimals: u8 },
}

impl MathError {
    /// Create an overflow error with context
    pub fn overflow(operation: &str, values: &[&dyn fmt::Display]) -> Self {
        Self::Overflow {
            operation: operation.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create an underflow error with context
    pub fn underflow(operation: &str, values: &[&dyn fmt::Display]) -> Self {
        Self::Underflow {
            operation: operation.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create an invalid number error
    pub fn invalid_number(value: &str, reason: &str) -> Self {
        Self::InvalidNumber {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// Market Data Errors
// ============================================================================

/// Errors raised while converting wire-format market data into typed snapshots
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// Parallel incentive arrays differ in length
    #[error("Incentive array '{array}' has {actual} entries, expected {expected}")]
    ArrayLengthMismatch {
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The same incentive token is listed twice
    #[error("Duplicate incentive token: {0}")]
    DuplicateIncentive(String),

    /// A numeric field could not be parsed
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },

    /// An address field could not be parsed
    #[error("Invalid address for '{field}': {value}")]
    InvalidAddress { field: &'static str, value: String },
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Request field referenced by a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestField {
    IncentiveIds,
    IncentiveAmounts,
    EndTimestamps,
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestField::IncentiveIds => write!(f, "Incentive IDs"),
            RequestField::IncentiveAmounts => write!(f, "Incentive amounts"),
            RequestField::EndTimestamps => write!(f, "Incentive end timestamps"),
        }
    }
}

/// First violated rule of a market action request
///
/// The display text of each variant is the user-facing reason shown by the
/// presentation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Market is missing")]
    MissingMarket,

    #[error("{0} are missing")]
    MissingField(RequestField),

    #[error("No incentives added")]
    EmptyInput,

    #[error("Incentive address is invalid")]
    InvalidAddress { token_id: String },

    #[error("Incentive amount is invalid")]
    InvalidAmount { value: String },

    #[error("Incentive amount must be greater than 0")]
    NonPositiveAmount { token_id: String },

    #[error("Incentive ids and amounts do not match")]
    LengthMismatch { ids: usize, amounts: usize },

    #[error("Incentive ids and end timestamps do not match")]
    TimestampLengthMismatch { ids: usize, end_timestamps: usize },

    #[error("Incentive end timestamp is invalid")]
    InvalidTimestamp { value: String },

    #[error("Incentive token is not added")]
    TokenNotAdded { token_id: String },

    #[error("New incentive end timestamp must be greater")]
    EndTimestampNotGreater { existing: u64, requested: u64 },

    #[error("No interval in progress. Use add incentives option.")]
    IntervalNotInProgress { now: u64, requested: u64 },

    #[error("Incentive duration must be at least 1 week")]
    DurationTooShort { duration: u64 },

    #[error("New incentive rate must be greater than the existing rate")]
    RateNotIncreasing { token_id: String },

    #[error("Interval is already in progress. Incentives cannot be refunded.")]
    IntervalAlreadyStarted { token_id: String },

    /// Internal arithmetic failure; surfaced with the generic message
    #[error("{}", ValidationResult::DEFAULT_INVALID_MESSAGE)]
    Arithmetic(#[from] MathError),
}

// ============================================================================
// Validation Verdict
// ============================================================================

/// Terminal verdict handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub status: bool,
    pub message: String,
    #[serde(skip)]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    pub const VALID_MESSAGE: &'static str = "Valid market action";
    pub const DEFAULT_INVALID_MESSAGE: &'static str = "Invalid market action";

    pub fn valid() -> Self {
        Self {
            status: true,
            message: Self::VALID_MESSAGE.to_string(),
            error: None,
        }
    }

    pub fn invalid(error: ValidationError) -> Self {
        let message = error.to_string();
        Self {
            status: false,
            message: if message.is_empty() {
                Self::DEFAULT_INVALID_MESSAGE.to_string()
            } else {
                message
            },
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status
    }
}

impl<T> From<&Result<T, ValidationError>> for ValidationResult {
    fn from(outcome: &Result<T, ValidationError>) -> Self {
        match outcome {
            Ok(_) => Self::valid(),
            Err(error) => Self::invalid(error.clone()),
        }
    }
}
