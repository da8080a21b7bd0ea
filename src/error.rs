//! Error type shared by every table, conversion and assumption constructor

use thiserror::Error;

use crate::periodicity::Periodicity;

/// Validation failures raised by the library
///
/// Every variant describes invalid input; nothing here is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("qx must contain at least one rate")]
    EmptyRates,

    #[error("qx[{index}] = {value} is outside [0, 1]")]
    RateOutOfRange { index: usize, value: f64 },

    #[error("expected {expected} ages (one per {unit}), got {found}")]
    AgeCountMismatch {
        expected: usize,
        found: usize,
        unit: &'static str,
    },

    #[error("unknown cause {cause:?}, must be one of {available:?}")]
    UnknownCause {
        cause: String,
        available: Vec<String>,
    },

    #[error("between 1 and 3 decrement tables are supported, got {0}")]
    CauseCount(usize),

    #[error("cause {0:?} was registered more than once")]
    DuplicateCause(String),

    #[error("at least one life table must be provided")]
    NoLives,

    #[error("all tables must share one periodicity: expected {expected}, found {found}")]
    PeriodicityMismatch {
        expected: Periodicity,
        found: Periodicity,
    },

    #[error(
        "cannot convert {from} to {to}: one period of the coarser periodicity \
         must hold a whole number of periods of the finer one"
    )]
    IncompatiblePeriodicity { from: Periodicity, to: Periodicity },

    #[error(
        "rates {start}..{end} are not constant within one {to} period; \
         converting would lose information"
    )]
    NonConstantBlock {
        start: usize,
        end: usize,
        to: Periodicity,
    },

    #[error("load percentage must be >= 0, got {0}")]
    NegativeLoad(f64),

    #[error("interest rate must be greater than -1, got {0}")]
    InvalidInterestRate(f64),

    #[error("{0} must not have plateau closure")]
    PlateauTable(&'static str),

    #[error("the accumulation table must have a primary cause")]
    MissingPrimaryCause,

    #[error("unknown periodicity {0:?}")]
    UnknownPeriodicity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
