//! Decrement tables and the capability contract they share
//!
//! Three table variants answer the same questions:
//! - [`SingleDecrementTable`]: one life, one cause of decrement
//! - [`MultipleDecrementTable`]: one life, up to three independent causes
//! - [`MultipleLivesTable`]: several lives under last-survivor or joint-life rules
//!
//! Composite tables own copies of the single-decrement tables they are built
//! from. Every variant is immutable; changing periodicity yields a new table.
//!
//! # Example
//!
//! ```rust
//! use tabatu::{DecrementTable, JointLifeStatus, MultipleLivesTable, SingleDecrementTable};
//!
//! let qx: Vec<f64> = (1..=100).map(|i| i as f64 / 100.0).collect();
//! let life = SingleDecrementTable::annual(qx)?;
//! let couple = MultipleLivesTable::new(vec![life.clone(), life], JointLifeStatus::Last)?;
//!
//! assert_eq!(couple.max_future_lifetime(&[50, 30])?, 70.0);
//! # Ok::<(), tabatu::Error>(())
//! ```

mod single;
mod multiple_decrement;
mod multiple_lives;
pub mod conversion;

pub use single::SingleDecrementTable;
pub use multiple_decrement::{Cause, MultipleDecrementTable, MultipleDecrementTableBuilder};
pub use multiple_lives::{JointLifeStatus, MultipleLivesTable};
pub use conversion::{change_rate_periodicity, load_rates};

use crate::error::{Error, Result};
use crate::periodicity::Periodicity;

/// Operations every decrement table supports
///
/// `ages` carries one initial age per component (life or cause) of the
/// table; `t` holds the elapsed-time offsets to evaluate.
pub trait DecrementTable {
    /// Periodicity of the table's rates
    fn periodicity(&self) -> Periodicity;

    /// Number of ages expected by the query operations
    fn age_count(&self) -> usize;

    /// Probability of failing between `x + t` and `x + t + 1`
    fn qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>>;

    /// Probability of surviving from `x` to `x + t`
    fn tpx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>>;

    /// Probability of surviving to `x + t` and failing in the following period
    fn t_qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        let tpx = self.tpx(ages, t)?;
        let qx = self.qx(ages, t)?;
        Ok(tpx.iter().zip(&qx).map(|(p, q)| p * q).collect())
    }

    /// Maximum future lifetime; `f64::INFINITY` when the table never exhausts
    fn max_future_lifetime(&self, ages: &[u32]) -> Result<f64>;

    /// True when the table never reaches certain failure
    fn has_plateau_closure(&self) -> bool {
        let ages = vec![0; self.age_count()];
        self.max_future_lifetime(&ages)
            .map(f64::is_infinite)
            .unwrap_or(false)
    }

    /// New table with rates expressed at `periodicity`
    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self>
    where
        Self: Sized;
}

/// Ensure a rate vector is non-empty with every value in [0, 1]
pub(crate) fn validate_rates(qx: &[f64]) -> Result<()> {
    if qx.is_empty() {
        return Err(Error::EmptyRates);
    }
    match qx.iter().position(|q| !(0.0..=1.0).contains(q)) {
        Some(index) => Err(Error::RateOutOfRange {
            index,
            value: qx[index],
        }),
        None => Ok(()),
    }
}

/// Periodicity shared by every table, or an error naming the first outlier
pub(crate) fn shared_periodicity(tables: &[SingleDecrementTable]) -> Result<Periodicity> {
    let expected = tables
        .first()
        .map(SingleDecrementTable::periodicity)
        .unwrap_or_default();
    match tables.iter().find(|table| table.periodicity() != expected) {
        Some(table) => Err(Error::PeriodicityMismatch {
            expected,
            found: table.periodicity(),
        }),
        None => Ok(expected),
    }
}

/// Require exactly `expected` ages
pub(crate) fn check_age_count(ages: &[u32], expected: usize, unit: &'static str) -> Result<()> {
    if ages.len() != expected {
        return Err(Error::AgeCountMismatch {
            expected,
            found: ages.len(),
            unit,
        });
    }
    Ok(())
}
