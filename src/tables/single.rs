//! Single-decrement table: one life exposed to one cause of failure
//!
//! The table is built from a vector of per-period failure probabilities
//! indexed by age. Ages past the last tabulated rate are extrapolated by the
//! shape of the table's tail:
//! - a *closed* table reaches certain failure (`lx` hits zero), so every later
//!   age fails with probability 1
//! - a *plateau* table never reaches certain failure, so its last rate repeats
//!   forever and the maximum future lifetime is infinite

use log::debug;

use super::{check_age_count, conversion, validate_rates, DecrementTable};
use crate::error::Result;
use crate::periodicity::Periodicity;

/// Decrement table for one life and one cause
#[derive(Debug, Clone, PartialEq)]
pub struct SingleDecrementTable {
    /// Failure probability by age
    qx: Vec<f64>,

    /// Survivors by age from a radix of 1, one entry longer than `qx`
    lx: Vec<f64>,

    /// Last age with survivors; `None` for plateau tables
    exhaustion_age: Option<usize>,

    periodicity: Periodicity,
}

impl SingleDecrementTable {
    /// Build a table from validated rates
    ///
    /// Fails when `qx` is empty or any rate is outside [0, 1].
    pub fn new(qx: Vec<f64>, periodicity: Periodicity) -> Result<Self> {
        validate_rates(&qx)?;

        let mut lx = Vec::with_capacity(qx.len() + 1);
        lx.push(1.0);
        let mut exhaustion_age = None;
        for (age, q) in qx.iter().enumerate() {
            let survivors = lx[age] * (1.0 - q);
            if survivors == 0.0 && exhaustion_age.is_none() {
                exhaustion_age = Some(age);
            }
            lx.push(survivors);
        }

        debug!(
            "single-decrement table: {} {} rates, exhaustion age {:?}",
            qx.len(),
            periodicity,
            exhaustion_age
        );

        Ok(Self {
            qx,
            lx,
            exhaustion_age,
            periodicity,
        })
    }

    /// Build an annual table
    pub fn annual(qx: Vec<f64>) -> Result<Self> {
        Self::new(qx, Periodicity::Annual)
    }

    /// Tabulated rates
    pub fn rates(&self) -> &[f64] {
        &self.qx
    }

    /// Number of tabulated rates
    pub fn len(&self) -> usize {
        self.qx.len()
    }

    /// Always false; construction rejects an empty table
    pub fn is_empty(&self) -> bool {
        self.qx.is_empty()
    }

    /// Periodicity of the rates
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// `qx` at `x + t` for each offset
    pub fn qx(&self, x: u32, t: &[u32]) -> Vec<f64> {
        t.iter().map(|&t| self.rate_at(attained(x, t))).collect()
    }

    /// `tpx` for each offset
    pub fn tpx(&self, x: u32, t: &[u32]) -> Vec<f64> {
        t.iter().map(|&t| self.survival(x, t)).collect()
    }

    /// `t|qx` for each offset
    pub fn t_qx(&self, x: u32, t: &[u32]) -> Vec<f64> {
        t.iter()
            .map(|&t| self.survival(x, t) * self.rate_at(attained(x, t)))
            .collect()
    }

    /// Smallest `t` with `qx(x, t) == 1`, or infinity for a plateau table
    ///
    /// For `qx = [0.1, 0.2, 0.4, 0.8, 1.0]` this is 5 at age 0, 2 at age 3
    /// and 0 from age 5 onwards.
    pub fn max_future_lifetime(&self, x: u32) -> f64 {
        match self.exhaustion_age {
            Some(w) => (w as f64 - f64::from(x) + 1.0).max(0.0),
            None => f64::INFINITY,
        }
    }

    /// True when survival never reaches zero
    pub fn has_plateau_closure(&self) -> bool {
        self.max_future_lifetime(0).is_infinite()
    }

    /// New table with rates converted to `periodicity`
    pub fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        let qx = conversion::change_rate_periodicity(&self.qx, self.periodicity, periodicity)?;
        Self::new(qx, periodicity)
    }

    /// New table with every rate below 1 scaled by `percent / 100`
    pub fn load(&self, percent: f64) -> Result<Self> {
        Self::new(conversion::load_rates(&self.qx, percent)?, self.periodicity)
    }

    /// Failure probability at an attained age
    ///
    /// Every age past the exhaustion age fails with certainty, even when the
    /// table tabulates a lower rate after an interior 1.0 (`[0.5, 1.0, 0.3]`
    /// gives 1.0 at age 2, not 0.3).
    pub(crate) fn rate_at(&self, age: u64) -> f64 {
        let last = self.qx.len() - 1;
        match self.exhaustion_age {
            Some(w) if age > w as u64 => 1.0,
            _ => self.qx[age.min(last as u64) as usize],
        }
    }

    /// Probability of surviving `t` periods from age `x`
    pub(crate) fn survival(&self, x: u32, t: u32) -> f64 {
        if t == 0 {
            return 1.0;
        }
        let from = self.survivors(u64::from(x));
        if from == 0.0 {
            return 0.0;
        }
        self.survivors(attained(x, t)) / from
    }

    fn survivors(&self, age: u64) -> f64 {
        let last = self.qx.len();
        if age <= last as u64 {
            return self.lx[age as usize];
        }
        match self.exhaustion_age {
            Some(_) => 0.0,
            None => {
                let plateau = self.qx[last - 1];
                self.lx[last] * (1.0 - plateau).powf((age - last as u64) as f64)
            }
        }
    }
}

fn attained(x: u32, t: u32) -> u64 {
    u64::from(x) + u64::from(t)
}

impl DecrementTable for SingleDecrementTable {
    fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    fn age_count(&self) -> usize {
        1
    }

    fn qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        check_age_count(ages, 1, "table")?;
        Ok(SingleDecrementTable::qx(self, ages[0], t))
    }

    fn tpx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        check_age_count(ages, 1, "table")?;
        Ok(SingleDecrementTable::tpx(self, ages[0], t))
    }

    fn t_qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        check_age_count(ages, 1, "table")?;
        Ok(SingleDecrementTable::t_qx(self, ages[0], t))
    }

    fn max_future_lifetime(&self, ages: &[u32]) -> Result<f64> {
        check_age_count(ages, 1, "table")?;
        Ok(SingleDecrementTable::max_future_lifetime(self, ages[0]))
    }

    fn has_plateau_closure(&self) -> bool {
        SingleDecrementTable::has_plateau_closure(self)
    }

    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        SingleDecrementTable::change_periodicity(self, periodicity)
    }
}
