//! Time granularity of rates and conversion factors between granularities
//!
//! Comparisons follow the table convention where a finer periodicity (more
//! periods per year) sorts *before* a coarser one: daily is "less than" annual.
//! The convention is exposed through named predicates instead of `PartialOrd`
//! so the direction is always explicit at the call site.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Granularity at which rates are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Daily,
    Weekly,
    /// 15-day periods
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    FourMonthly,
    Semiannual,
    #[default]
    Annual,
}

impl Periodicity {
    /// Every periodicity, finest first
    pub const ALL: [Periodicity; 9] = [
        Periodicity::Daily,
        Periodicity::Weekly,
        Periodicity::Biweekly,
        Periodicity::Monthly,
        Periodicity::Bimonthly,
        Periodicity::Quarterly,
        Periodicity::FourMonthly,
        Periodicity::Semiannual,
        Periodicity::Annual,
    ];

    /// Number of periods in one year
    pub fn periods_per_year(self) -> u32 {
        match self {
            Periodicity::Daily => 365,
            Periodicity::Weekly => 48,
            Periodicity::Biweekly => 24,
            Periodicity::Monthly => 12,
            Periodicity::Bimonthly => 6,
            Periodicity::Quarterly => 4,
            Periodicity::FourMonthly => 3,
            Periodicity::Semiannual => 2,
            Periodicity::Annual => 1,
        }
    }

    /// How many `self` periods fit in one `other` period
    ///
    /// Monthly against annual is 12.0; quarterly against bimonthly is 1.5.
    pub fn periods_per_one(self, other: Periodicity) -> f64 {
        f64::from(self.periods_per_year()) / f64::from(other.periods_per_year())
    }

    /// True when one `other` period holds a whole number of `self` periods
    pub fn divides_evenly_into(self, other: Periodicity) -> bool {
        self.periods_per_year() % other.periods_per_year() == 0
    }

    /// `self < other` in the table convention: more periods per year
    pub fn finer_than(self, other: Periodicity) -> bool {
        self.periods_per_year() > other.periods_per_year()
    }

    /// `self > other` in the table convention: fewer periods per year
    pub fn coarser_than(self, other: Periodicity) -> bool {
        self.periods_per_year() < other.periods_per_year()
    }

    /// `self <= other` in the table convention
    pub fn at_least_as_fine_as(self, other: Periodicity) -> bool {
        self.periods_per_year() >= other.periods_per_year()
    }

    /// `self >= other` in the table convention
    pub fn at_least_as_coarse_as(self, other: Periodicity) -> bool {
        self.periods_per_year() <= other.periods_per_year()
    }

    fn name(self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
            Periodicity::Biweekly => "biweekly",
            Periodicity::Monthly => "monthly",
            Periodicity::Bimonthly => "bimonthly",
            Periodicity::Quarterly => "quarterly",
            Periodicity::FourMonthly => "four_monthly",
            Periodicity::Semiannual => "semiannual",
            Periodicity::Annual => "annual",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Periodicity {
    type Err = Error;

    /// Accepts the English names plus the Portuguese names used by rate sources
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let periodicity = match normalized.as_str() {
            "daily" | "diaria" => Periodicity::Daily,
            "weekly" | "semanal" => Periodicity::Weekly,
            "biweekly" | "quinzenal" => Periodicity::Biweekly,
            "monthly" | "mensal" => Periodicity::Monthly,
            "bimonthly" | "bimestral" => Periodicity::Bimonthly,
            "quarterly" | "trimestral" => Periodicity::Quarterly,
            "four_monthly" | "quadrimestral" => Periodicity::FourMonthly,
            "semiannual" | "semestral" => Periodicity::Semiannual,
            "annual" | "anual" => Periodicity::Annual,
            _ => return Err(Error::UnknownPeriodicity(s.to_string())),
        };
        Ok(periodicity)
    }
}
