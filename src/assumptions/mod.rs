//! Valuation assumptions: a decrement table paired with an interest rate
//!
//! Constructors check that the components can be used together:
//! - every component shares one periodicity
//! - decrement tables reach certain failure (no plateau closure), so
//!   valuations have a finite horizon
//! - disability annuities use a multiple-decrement table with a primary cause

mod interest;

pub use interest::{change_interest_periodicity, ConstantInterest, InterestRate};

use crate::error::{Error, Result};
use crate::periodicity::Periodicity;
use crate::tables::{DecrementTable, MultipleDecrementTable};

/// Decrement table and interest rate used together
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions<T, I> {
    table: T,
    interest: I,
}

impl<T: DecrementTable, I: InterestRate> Assumptions<T, I> {
    pub fn new(table: T, interest: I) -> Result<Self> {
        if table.periodicity() != interest.periodicity() {
            return Err(Error::PeriodicityMismatch {
                expected: table.periodicity(),
                found: interest.periodicity(),
            });
        }
        if table.has_plateau_closure() {
            return Err(Error::PlateauTable("decrement table"));
        }
        Ok(Self { table, interest })
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn interest(&self) -> &I {
        &self.interest
    }

    pub fn periodicity(&self) -> Periodicity {
        self.table.periodicity()
    }

    /// Both components converted to `periodicity`
    pub fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        Self::new(
            self.table.change_periodicity(periodicity)?,
            self.interest.change_periodicity(periodicity)?,
        )
    }
}

/// Assumptions for annuities, with the table governing the annuity once granted
#[derive(Debug, Clone, PartialEq)]
pub struct AnnuityAssumptions<T, I, G> {
    base: Assumptions<T, I>,
    grant_table: G,
}

impl<T: DecrementTable, I: InterestRate, G: DecrementTable> AnnuityAssumptions<T, I, G> {
    pub fn new(table: T, interest: I, grant_table: G) -> Result<Self> {
        let base = Assumptions::new(table, interest)?;
        if grant_table.has_plateau_closure() {
            return Err(Error::PlateauTable("grant table"));
        }
        if grant_table.periodicity() != base.periodicity() {
            return Err(Error::PeriodicityMismatch {
                expected: base.periodicity(),
                found: grant_table.periodicity(),
            });
        }
        Ok(Self { base, grant_table })
    }

    /// Table in force until the annuity is granted
    pub fn table(&self) -> &T {
        self.base.table()
    }

    pub fn interest(&self) -> &I {
        self.base.interest()
    }

    /// Table in force once the annuity is granted
    pub fn grant_table(&self) -> &G {
        &self.grant_table
    }

    pub fn periodicity(&self) -> Periodicity {
        self.base.periodicity()
    }

    pub fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        Self::new(
            self.table().change_periodicity(periodicity)?,
            self.interest().change_periodicity(periodicity)?,
            self.grant_table.change_periodicity(periodicity)?,
        )
    }
}

/// Annuity assumptions where the accumulation table's primary cause is disability
#[derive(Debug, Clone, PartialEq)]
pub struct DisabilityAnnuityAssumptions<I, G> {
    annuity: AnnuityAssumptions<MultipleDecrementTable, I, G>,
}

impl<I: InterestRate, G: DecrementTable> DisabilityAnnuityAssumptions<I, G> {
    pub fn new(table: MultipleDecrementTable, interest: I, grant_table: G) -> Result<Self> {
        let annuity = AnnuityAssumptions::new(table, interest, grant_table)?;
        if !annuity.table().has_primary_cause() {
            return Err(Error::MissingPrimaryCause);
        }
        Ok(Self { annuity })
    }

    pub fn annuity(&self) -> &AnnuityAssumptions<MultipleDecrementTable, I, G> {
        &self.annuity
    }

    pub fn table(&self) -> &MultipleDecrementTable {
        self.annuity.table()
    }

    pub fn interest(&self) -> &I {
        self.annuity.interest()
    }

    pub fn grant_table(&self) -> &G {
        self.annuity.grant_table()
    }

    pub fn periodicity(&self) -> Periodicity {
        self.annuity.periodicity()
    }

    pub fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        Ok(Self {
            annuity: self.annuity.change_periodicity(periodicity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::SingleDecrementTable;

    fn mortality() -> SingleDecrementTable {
        SingleDecrementTable::annual((1..=100).map(|i| i as f64 / 100.0).collect()).unwrap()
    }

    fn plateau() -> SingleDecrementTable {
        SingleDecrementTable::annual(vec![0.05; 100]).unwrap()
    }

    fn disability_table(primary: bool) -> MultipleDecrementTable {
        let builder = MultipleDecrementTable::builder()
            .named_cause("death", mortality())
            .named_cause("disability", SingleDecrementTable::annual(vec![0.02; 100]).unwrap());
        let builder = if primary { builder.primary_cause("disability") } else { builder };
        builder.build().unwrap()
    }

    #[test]
    fn test_assumptions_share_periodicity() {
        let assumptions =
            Assumptions::new(mortality(), ConstantInterest::annual(0.04).unwrap()).unwrap();
        assert_eq!(assumptions.periodicity(), Periodicity::Annual);

        let monthly_interest = ConstantInterest::new(0.003, Periodicity::Monthly).unwrap();
        assert_eq!(
            Assumptions::new(mortality(), monthly_interest),
            Err(Error::PeriodicityMismatch {
                expected: Periodicity::Annual,
                found: Periodicity::Monthly,
            })
        );
    }

    #[test]
    fn test_assumptions_reject_plateau_table() {
        assert_eq!(
            Assumptions::new(plateau(), ConstantInterest::annual(0.04).unwrap()),
            Err(Error::PlateauTable("decrement table"))
        );
    }

    #[test]
    fn test_assumptions_change_periodicity() {
        let assumptions =
            Assumptions::new(mortality(), ConstantInterest::annual(0.04).unwrap()).unwrap();
        let monthly = assumptions.change_periodicity(Periodicity::Monthly).unwrap();
        assert_eq!(monthly.periodicity(), Periodicity::Monthly);
        assert_eq!(monthly.interest().periodicity(), Periodicity::Monthly);
        assert_eq!(monthly.table().rates().len(), 1200);

        assert!(assumptions.change_periodicity(Periodicity::Daily).is_ok());
        assert!(matches!(
            monthly.change_periodicity(Periodicity::Daily),
            Err(Error::IncompatiblePeriodicity { .. })
        ));
    }

    #[test]
    fn test_annuity_assumptions() {
        let interest = ConstantInterest::annual(0.04).unwrap();
        let annuity = AnnuityAssumptions::new(mortality(), interest, mortality()).unwrap();
        let semiannual = annuity.change_periodicity(Periodicity::Semiannual).unwrap();
        assert_eq!(semiannual.grant_table().periodicity(), Periodicity::Semiannual);

        assert_eq!(
            AnnuityAssumptions::new(mortality(), interest, plateau()),
            Err(Error::PlateauTable("grant table"))
        );

        let monthly = SingleDecrementTable::new(vec![0.5, 1.0], Periodicity::Monthly).unwrap();
        assert!(matches!(
            AnnuityAssumptions::new(mortality(), interest, monthly),
            Err(Error::PeriodicityMismatch { .. })
        ));
    }

    #[test]
    fn test_disability_annuity_requires_primary_cause() {
        let interest = ConstantInterest::annual(0.04).unwrap();
        let assumptions =
            DisabilityAnnuityAssumptions::new(disability_table(true), interest, mortality())
                .unwrap();
        assert_eq!(assumptions.table().primary_cause(), Some("disability"));

        let monthly = assumptions.change_periodicity(Periodicity::Monthly).unwrap();
        assert_eq!(monthly.table().primary_cause(), Some("disability"));

        assert_eq!(
            DisabilityAnnuityAssumptions::new(disability_table(false), interest, mortality()),
            Err(Error::MissingPrimaryCause)
        );
    }
}
