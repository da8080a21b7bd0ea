//! Interest rates paired with decrement tables in valuation assumptions

use log::debug;

use crate::error::{Error, Result};
use crate::periodicity::Periodicity;

/// Operations every interest-rate assumption supports
pub trait InterestRate {
    /// Periodicity of the rate
    fn periodicity(&self) -> Periodicity;

    /// Effective rate per period at each time `t`
    fn interest_rate(&self, t: &[u32]) -> Vec<f64>;

    /// Discount factor `(1 + i(t))^-t` at each time `t`
    fn discount_factor(&self, t: &[u32]) -> Vec<f64> {
        self.interest_rate(t)
            .iter()
            .zip(t)
            .map(|(rate, &t)| (1.0 + rate).powf(-f64::from(t)))
            .collect()
    }

    /// Equivalent rate at another periodicity
    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self>
    where
        Self: Sized;
}

/// Effective rate equivalent to `rate` at a different periodicity
///
/// Annual 1% becomes `1.01^(1/12) - 1` monthly.
pub fn change_interest_periodicity(rate: f64, from: Periodicity, to: Periodicity) -> f64 {
    (1.0 + rate).powf(from.periods_per_one(to)) - 1.0
}

/// Interest rate that does not vary with time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantInterest {
    rate: f64,
    periodicity: Periodicity,
}

impl ConstantInterest {
    /// Fails unless `rate > -1`
    pub fn new(rate: f64, periodicity: Periodicity) -> Result<Self> {
        if rate <= -1.0 || !rate.is_finite() {
            return Err(Error::InvalidInterestRate(rate));
        }
        Ok(Self { rate, periodicity })
    }

    /// Annual rate
    pub fn annual(rate: f64) -> Result<Self> {
        Self::new(rate, Periodicity::Annual)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl InterestRate for ConstantInterest {
    fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    fn interest_rate(&self, t: &[u32]) -> Vec<f64> {
        vec![self.rate; t.len()]
    }

    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        let rate = change_interest_periodicity(self.rate, self.periodicity, periodicity);
        debug!("interest {} {} -> {} {}", self.rate, self.periodicity, rate, periodicity);
        Self::new(rate, periodicity)
    }
}
