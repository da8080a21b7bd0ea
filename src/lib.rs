//! Tabatu - actuarial decrement tables
//!
//! This library provides:
//! - Periodicities and conversions between them
//! - Single-decrement, multiple-decrement and multiple-lives tables
//! - Rate loading (agravo) and periodicity conversion of rate vectors
//! - Interest rates and valuation assumptions built on the tables

pub mod error;
pub mod periodicity;
pub mod tables;
pub mod assumptions;

// Re-export commonly used types
pub use error::{Error, Result};
pub use periodicity::Periodicity;
pub use tables::{
    change_rate_periodicity, load_rates, Cause, DecrementTable, JointLifeStatus,
    MultipleDecrementTable, MultipleDecrementTableBuilder, MultipleLivesTable,
    SingleDecrementTable,
};
pub use assumptions::{
    AnnuityAssumptions, Assumptions, ConstantInterest, DisabilityAnnuityAssumptions,
    InterestRate,
};
