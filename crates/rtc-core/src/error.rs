use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Table argument cannot be ordered: {what}")]
    Unordered { what: &'static str },

    #[error("Invalid extrapolation period '{text}'")]
    InvalidPeriod { text: String },

    #[error(
        "Periodic extrapolation period of {period_seconds}s does not exceed the data span of {span_seconds}s"
    )]
    PeriodTooShort {
        period_seconds: i64,
        span_seconds: i64,
    },
}
