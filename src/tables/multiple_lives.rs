//! Multiple-lives table: a group of lives evaluated as one status
//!
//! With [`JointLifeStatus::Last`] the group fails only once every life has
//! failed (last-survivor benefits). With [`JointLifeStatus::Joint`] the group
//! fails as soon as any life fails (joint-life benefits).

use log::debug;
use serde::{Deserialize, Serialize};

use super::{check_age_count, shared_periodicity, DecrementTable, SingleDecrementTable};
use crate::error::{Error, Result};
use crate::periodicity::Periodicity;

/// Rule combining the lives of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointLifeStatus {
    /// Group survives while at least one life survives
    #[default]
    Last,
    /// Group survives while every life survives
    Joint,
}

/// Decrement table for a group of lives
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleLivesTable {
    lives: Vec<SingleDecrementTable>,
    status: JointLifeStatus,
    periodicity: Periodicity,
}

impl MultipleLivesTable {
    /// Group the `lives` under `status`
    ///
    /// Fails when no life is given or the tables differ in periodicity.
    pub fn new(lives: Vec<SingleDecrementTable>, status: JointLifeStatus) -> Result<Self> {
        if lives.is_empty() {
            return Err(Error::NoLives);
        }
        let periodicity = shared_periodicity(&lives)?;
        debug!("multiple-lives table: {} lives, {:?}, {}", lives.len(), status, periodicity);
        Ok(Self {
            lives,
            status,
            periodicity,
        })
    }

    pub fn status(&self) -> JointLifeStatus {
        self.status
    }

    /// One table per life
    pub fn lives(&self) -> &[SingleDecrementTable] {
        &self.lives
    }

    /// Group failure probability at one offset, ages already validated
    fn group_rate(&self, ages: &[u32], t: u32) -> f64 {
        let rates = self
            .lives
            .iter()
            .zip(ages)
            .map(|(life, &x)| life.rate_at(u64::from(x) + u64::from(t)));
        match self.status {
            JointLifeStatus::Last => rates.product(),
            JointLifeStatus::Joint => 1.0 - rates.map(|q| 1.0 - q).product::<f64>(),
        }
    }
}

impl DecrementTable for MultipleLivesTable {
    fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    fn age_count(&self) -> usize {
        self.lives.len()
    }

    fn qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        check_age_count(ages, self.lives.len(), "life")?;
        Ok(t.iter().map(|&t| self.group_rate(ages, t)).collect())
    }

    /// Cumulative product of the group survival rates up to the largest offset
    fn tpx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        check_age_count(ages, self.lives.len(), "life")?;
        let horizon = t.iter().copied().max().unwrap_or(0);
        let mut survival = Vec::with_capacity(horizon as usize + 1);
        survival.push(1.0);
        let mut alive = 1.0;
        for s in 0..horizon {
            alive *= 1.0 - self.group_rate(ages, s);
            survival.push(alive);
        }
        Ok(t.iter().map(|&t| survival[t as usize]).collect())
    }

    /// Longest individual lifetime for `Last`, shortest for `Joint`
    fn max_future_lifetime(&self, ages: &[u32]) -> Result<f64> {
        check_age_count(ages, self.lives.len(), "life")?;
        let lifetimes = self
            .lives
            .iter()
            .zip(ages)
            .map(|(life, &x)| life.max_future_lifetime(x));
        Ok(match self.status {
            JointLifeStatus::Last => lifetimes.fold(0.0, f64::max),
            JointLifeStatus::Joint => lifetimes.fold(f64::INFINITY, f64::min),
        })
    }

    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        let lives = self
            .lives
            .iter()
            .map(|life| life.change_periodicity(periodicity))
            .collect::<Result<Vec<_>>>()?;
        Self::new(lives, self.status)
    }
}
