//! Multiple-decrement table: one life exposed to up to three independent causes
//!
//! Each cause is described by its own single-decrement table of *independent*
//! rates. Queries convert those rates into competing-risk rates with the
//! uniform distribution of deaths approximation:
//!
//! `q(j)_i = q_i * (1 - (q_a + q_b) / 2 + q_a * q_b / 3)`
//!
//! where `q_a` and `q_b` are the other two causes (zero when absent). The
//! formula is only defined for three causes, which caps the table size.
//!
//! Causes are addressed by position or by name. Positional causes are named
//! "0", "1", ... in the order they were added; named causes follow them.

use std::fmt;

use log::debug;

use super::{check_age_count, shared_periodicity, DecrementTable, SingleDecrementTable};
use crate::error::{Error, Result};
use crate::periodicity::Periodicity;

/// Most causes the competing-risk conversion supports
pub const MAX_CAUSES: usize = 3;

/// Reference to a cause of decrement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cause {
    /// Canonical position of the cause
    Index(usize),
    /// Name registered for the cause
    Name(String),
}

impl From<usize> for Cause {
    fn from(index: usize) -> Self {
        Cause::Index(index)
    }
}

impl From<&str> for Cause {
    fn from(name: &str) -> Self {
        Cause::Name(name.to_string())
    }
}

impl From<String> for Cause {
    fn from(name: String) -> Self {
        Cause::Name(name)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Index(index) => write!(f, "{}", index),
            Cause::Name(name) => f.write_str(name),
        }
    }
}

/// Decrement table combining independent causes acting on one life
#[derive(Debug, Clone, PartialEq)]
pub struct MultipleDecrementTable {
    tables: Vec<SingleDecrementTable>,

    /// Cause names by canonical index
    causes: Vec<String>,

    /// Canonical index of the benefit-triggering cause
    primary_cause: Option<usize>,

    periodicity: Periodicity,
}

/// Collects causes before validating them as a whole
#[derive(Debug, Clone, Default)]
pub struct MultipleDecrementTableBuilder {
    positional: Vec<SingleDecrementTable>,
    named: Vec<(String, SingleDecrementTable)>,
    primary_cause: Option<Cause>,
}

impl MultipleDecrementTableBuilder {
    /// Add a cause addressed by its position
    pub fn cause(mut self, table: SingleDecrementTable) -> Self {
        self.positional.push(table);
        self
    }

    /// Add a cause addressed by `name`
    pub fn named_cause(mut self, name: impl Into<String>, table: SingleDecrementTable) -> Self {
        self.named.push((name.into(), table));
        self
    }

    /// Designate the cause whose failures trigger the benefit
    pub fn primary_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.primary_cause = Some(cause.into());
        self
    }

    /// Validate and build the table
    ///
    /// Fails unless there are 1 to 3 causes with unique names, the primary
    /// cause (if any) is registered, and every table shares one periodicity.
    pub fn build(self) -> Result<MultipleDecrementTable> {
        let count = self.positional.len() + self.named.len();
        if count == 0 || count > MAX_CAUSES {
            return Err(Error::CauseCount(count));
        }

        let mut causes: Vec<String> = (0..self.positional.len()).map(|i| i.to_string()).collect();
        let mut tables = self.positional;
        for (name, table) in self.named {
            if causes.contains(&name) {
                return Err(Error::DuplicateCause(name));
            }
            causes.push(name);
            tables.push(table);
        }

        let primary_cause = match &self.primary_cause {
            Some(cause) => Some(resolve(&causes, cause)?),
            None => None,
        };
        let periodicity = shared_periodicity(&tables)?;

        debug!(
            "multiple-decrement table: causes {:?}, primary {:?}, {}",
            causes, primary_cause, periodicity
        );

        Ok(MultipleDecrementTable {
            tables,
            causes,
            primary_cause,
            periodicity,
        })
    }
}

fn resolve(causes: &[String], cause: &Cause) -> Result<usize> {
    let index = match cause {
        Cause::Index(index) if *index < causes.len() => Some(*index),
        Cause::Index(_) => None,
        Cause::Name(name) => causes.iter().position(|c| c == name),
    };
    index.ok_or_else(|| Error::UnknownCause {
        cause: cause.to_string(),
        available: causes.to_vec(),
    })
}

/// Convert independent rates for one age into competing-risk rates
fn competing_rates(independent: &[f64]) -> Vec<f64> {
    let mut q = [0.0; MAX_CAUSES];
    q[..independent.len()].copy_from_slice(independent);
    (0..independent.len())
        .map(|i| {
            let a = q[(i + 1) % MAX_CAUSES];
            let b = q[(i + 2) % MAX_CAUSES];
            q[i] * (1.0 - 0.5 * (a + b) + 1.0 / 3.0 * (a * b))
        })
        .collect()
}

impl MultipleDecrementTable {
    /// Start a builder
    pub fn builder() -> MultipleDecrementTableBuilder {
        MultipleDecrementTableBuilder::default()
    }

    /// Table with positional causes only and no primary cause
    pub fn new(tables: Vec<SingleDecrementTable>) -> Result<Self> {
        tables
            .into_iter()
            .fold(Self::builder(), MultipleDecrementTableBuilder::cause)
            .build()
    }

    /// Constituent tables in canonical order
    pub fn tables(&self) -> &[SingleDecrementTable] {
        &self.tables
    }

    /// Cause names in canonical order
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Name of the primary cause, if configured
    pub fn primary_cause(&self) -> Option<&str> {
        self.primary_cause.map(|index| self.causes[index].as_str())
    }

    pub fn has_primary_cause(&self) -> bool {
        self.primary_cause.is_some()
    }

    /// Canonical index of a cause
    pub fn cause_index(&self, cause: &Cause) -> Result<usize> {
        resolve(&self.causes, cause)
    }

    /// Competing-risk failure probability by cause
    ///
    /// Returns one row per requested cause, each the length of `t`.
    pub fn qx_j(&self, ages: &[u32], t: &[u32], causes: &[Cause]) -> Result<Vec<Vec<f64>>> {
        let ages = self.expand_ages(ages)?;
        let indices = self.resolve_all(causes)?;
        let by_time: Vec<Vec<f64>> = t.iter().map(|&t| self.competing_at(&ages, t)).collect();
        Ok(indices
            .iter()
            .map(|&j| by_time.iter().map(|rates| rates[j]).collect())
            .collect())
    }

    /// Probability of surviving all causes to `x + t` and then failing by each cause
    pub fn t_qx_j(&self, ages: &[u32], t: &[u32], causes: &[Cause]) -> Result<Vec<Vec<f64>>> {
        let tpx = self.tpx(ages, t)?;
        let qx_j = self.qx_j(ages, t, causes)?;
        Ok(qx_j
            .into_iter()
            .map(|row| row.iter().zip(&tpx).map(|(q, p)| q * p).collect())
            .collect())
    }

    fn resolve_all(&self, causes: &[Cause]) -> Result<Vec<usize>> {
        causes.iter().map(|cause| self.cause_index(cause)).collect()
    }

    /// One age broadcast to every cause, or one age per cause
    fn expand_ages(&self, ages: &[u32]) -> Result<Vec<u32>> {
        match ages {
            [age] => Ok(vec![*age; self.tables.len()]),
            _ => {
                check_age_count(ages, self.tables.len(), "cause")?;
                Ok(ages.to_vec())
            }
        }
    }

    fn competing_at(&self, ages: &[u32], t: u32) -> Vec<f64> {
        let independent: Vec<f64> = self
            .tables
            .iter()
            .zip(ages)
            .map(|(table, &x)| table.rate_at(u64::from(x) + u64::from(t)))
            .collect();
        competing_rates(&independent)
    }
}

impl DecrementTable for MultipleDecrementTable {
    fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    fn age_count(&self) -> usize {
        self.tables.len()
    }

    /// Failure probability from any cause
    fn qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        let ages = self.expand_ages(ages)?;
        Ok(t.iter()
            .map(|&t| self.competing_at(&ages, t).iter().sum())
            .collect())
    }

    /// Survival multiplies across independent causes
    fn tpx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        let ages = self.expand_ages(ages)?;
        Ok(t.iter()
            .map(|&t| {
                self.tables
                    .iter()
                    .zip(&ages)
                    .map(|(table, &x)| table.survival(x, t))
                    .product()
            })
            .collect())
    }

    /// Restricted to the primary cause when one is configured
    fn t_qx(&self, ages: &[u32], t: &[u32]) -> Result<Vec<f64>> {
        let tpx = self.tpx(ages, t)?;
        let qx = match self.primary_cause {
            Some(primary) => self.qx_j(ages, t, &[Cause::Index(primary)])?.remove(0),
            None => self.qx(ages, t)?,
        };
        Ok(tpx.iter().zip(&qx).map(|(p, q)| p * q).collect())
    }

    /// The first cause to exhaust ends the table
    fn max_future_lifetime(&self, ages: &[u32]) -> Result<f64> {
        let ages = self.expand_ages(ages)?;
        Ok(self
            .tables
            .iter()
            .zip(&ages)
            .map(|(table, &x)| table.max_future_lifetime(x))
            .fold(f64::INFINITY, f64::min))
    }

    fn change_periodicity(&self, periodicity: Periodicity) -> Result<Self> {
        let tables = self
            .tables
            .iter()
            .map(|table| table.change_periodicity(periodicity))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            tables,
            causes: self.causes.clone(),
            primary_cause: self.primary_cause,
            periodicity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const T: [u32; 4] = [0, 1, 2, 3];

    fn death() -> SingleDecrementTable {
        SingleDecrementTable::annual((1..=100).map(|i| i as f64 / 100.0).collect()).unwrap()
    }

    fn lapse() -> SingleDecrementTable {
        SingleDecrementTable::annual(vec![0.01; 100]).unwrap()
    }

    fn named() -> MultipleDecrementTable {
        MultipleDecrementTable::builder()
            .cause(death())
            .named_cause("lapse", lapse())
            .build()
            .unwrap()
    }

    fn assert_rows(actual: &[f64], expected: &[f64], epsilon: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
        }
    }

    #[test]
    fn test_competing_rates() {
        let rates = competing_rates(&[0.51, 0.01]);
        assert_abs_diff_eq!(rates[0], 0.50745, epsilon = 1e-12);
        assert_abs_diff_eq!(rates[1], 0.00745, epsilon = 1e-12);

        let rates = competing_rates(&[0.2, 0.1, 0.3]);
        assert_abs_diff_eq!(rates[0], 0.2 * (1.0 - 0.2 + 0.01), epsilon = 1e-12);

        // A lone cause is unchanged
        assert_eq!(competing_rates(&[0.4]), vec![0.4]);
    }

    #[test]
    fn test_cause_names() {
        let table = named();
        assert_eq!(table.causes(), &["0".to_string(), "lapse".to_string()]);
        assert_eq!(table.cause_index(&"lapse".into()), Ok(1));
        assert_eq!(table.cause_index(&Cause::Index(0)), Ok(0));
        assert!(table.cause_index(&Cause::Index(2)).is_err());
        assert!(!table.has_primary_cause());
    }

    #[test]
    fn test_qx_j() {
        let table = named();
        let by_index = table.qx_j(&[50, 0], &T, &[Cause::Index(0), Cause::Index(1)]).unwrap();
        assert_rows(&by_index[0], &[0.50745, 0.5174, 0.52735, 0.5373], 1e-12);
        assert_rows(&by_index[1], &[0.00745, 0.0074, 0.00735, 0.0073], 1e-12);

        let by_name = table.qx_j(&[50, 0], &T, &["0".into(), "lapse".into()]).unwrap();
        assert_eq!(by_index, by_name);
    }

    #[test]
    fn test_qx_sums_causes() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        let qx = DecrementTable::qx(&table, &[50, 0], &T).unwrap();
        assert_rows(&qx, &[0.5149, 0.5248, 0.5347, 0.5446], 1e-12);
    }

    #[test]
    fn test_tpx_multiplies_causes() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        let tpx = table.tpx(&[30, 30], &T).unwrap();
        assert_rows(&tpx, &[1.0, 0.6831, 0.45986292, 0.30502707], 1e-8);
    }

    #[test]
    fn test_t_qx_j() {
        let table = named();
        let rows = table.t_qx_j(&[50, 0], &T, &[Cause::Index(0), "lapse".into()]).unwrap();
        assert_rows(&rows[0], &[0.50745, 0.25099074, 0.12156447, 0.05763119], 1e-8);
        assert_rows(&rows[1], &[0.00745, 0.00358974, 0.00169432, 0.000783], 1e-8);
    }

    #[test]
    fn test_t_qx_without_primary_cause() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        let t_qx = table.t_qx(&[50, 0], &T).unwrap();
        assert_rows(&t_qx, &[0.5149, 0.25458048, 0.12325879, 0.0584142], 1e-8);
    }

    #[test]
    fn test_t_qx_with_primary_cause() {
        let table = MultipleDecrementTable::builder()
            .cause(death())
            .named_cause("lapse", lapse())
            .primary_cause("lapse")
            .build()
            .unwrap();
        assert!(table.has_primary_cause());
        assert_eq!(table.primary_cause(), Some("lapse"));

        let t_qx = table.t_qx(&[50, 0], &T).unwrap();
        assert_rows(&t_qx, &[0.00745, 0.00358974, 0.00169432, 0.000783], 1e-8);
    }

    #[test]
    fn test_t_qx_is_tpx_times_qx() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        let t: Vec<u32> = (0..80).collect();
        let t_qx = table.t_qx(&[20, 5], &t).unwrap();
        let tpx = table.tpx(&[20, 5], &t).unwrap();
        let qx = DecrementTable::qx(&table, &[20, 5], &t).unwrap();
        for i in 0..t.len() {
            assert_abs_diff_eq!(t_qx[i], tpx[i] * qx[i], epsilon = 1e-15);
        }
        assert_eq!(tpx[0], 1.0);
    }

    #[test]
    fn test_single_age_is_broadcast() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        assert_eq!(
            DecrementTable::qx(&table, &[40], &T).unwrap(),
            DecrementTable::qx(&table, &[40, 40], &T).unwrap()
        );
        assert_eq!(
            DecrementTable::qx(&table, &[1, 2, 3], &T),
            Err(Error::AgeCountMismatch { expected: 2, found: 3, unit: "cause" })
        );
    }

    #[test]
    fn test_max_future_lifetime_takes_minimum() {
        let table = MultipleDecrementTable::new(vec![death(), lapse()]).unwrap();
        assert_eq!(table.max_future_lifetime(&[30, 30]).unwrap(), 70.0);
        assert_eq!(table.max_future_lifetime(&[50, 0]).unwrap(), 50.0);
        assert!(!table.has_plateau_closure());

        let open = MultipleDecrementTable::new(vec![lapse(), lapse()]).unwrap();
        assert!(open.max_future_lifetime(&[0, 0]).unwrap().is_infinite());
        assert!(open.has_plateau_closure());
    }

    #[test]
    fn test_cause_count_limits() {
        assert_eq!(MultipleDecrementTable::new(vec![]), Err(Error::CauseCount(0)));
        assert_eq!(
            MultipleDecrementTable::new(vec![death(), death(), death(), death()]),
            Err(Error::CauseCount(4))
        );
        let mixed = MultipleDecrementTable::builder()
            .cause(death())
            .cause(death())
            .named_cause("a", lapse())
            .named_cause("b", lapse())
            .build();
        assert_eq!(mixed, Err(Error::CauseCount(4)));
    }

    #[test]
    fn test_invalid_primary_cause() {
        let result = MultipleDecrementTable::builder()
            .cause(death())
            .named_cause("lapse", lapse())
            .primary_cause("disability")
            .build();
        assert_eq!(
            result,
            Err(Error::UnknownCause {
                cause: "disability".to_string(),
                available: vec!["0".to_string(), "lapse".to_string()],
            })
        );

        let result = MultipleDecrementTable::builder()
            .cause(death())
            .primary_cause(Cause::Index(1))
            .build();
        assert!(matches!(result, Err(Error::UnknownCause { .. })));
    }

    #[test]
    fn test_duplicate_cause_name() {
        let result = MultipleDecrementTable::builder()
            .cause(death())
            .named_cause("0", lapse())
            .build();
        assert_eq!(result, Err(Error::DuplicateCause("0".to_string())));
    }

    #[test]
    fn test_unknown_cause_in_query() {
        let table = named();
        assert!(table.qx_j(&[50], &T, &["disability".into()]).is_err());
        assert!(table.t_qx_j(&[50], &T, &[Cause::Index(7)]).is_err());
    }

    #[test]
    fn test_periodicity_mismatch() {
        let monthly = SingleDecrementTable::new(vec![0.01; 12], Periodicity::Monthly).unwrap();
        assert!(matches!(
            MultipleDecrementTable::new(vec![death(), monthly]),
            Err(Error::PeriodicityMismatch { .. })
        ));
    }

    #[test]
    fn test_change_periodicity_keeps_causes() {
        let table = MultipleDecrementTable::builder()
            .cause(death())
            .named_cause("lapse", lapse())
            .primary_cause(Cause::Index(0))
            .build()
            .unwrap();
        let semiannual = table.change_periodicity(Periodicity::Semiannual).unwrap();
        assert_eq!(semiannual.periodicity(), Periodicity::Semiannual);
        assert_eq!(semiannual.causes(), table.causes());
        assert_eq!(semiannual.primary_cause(), Some("0"));
        assert_eq!(semiannual.tables()[0].rates().len(), 200);

        // Two half-years of survival equal one year
        let annual_tpx = table.tpx(&[30, 30], &[1]).unwrap()[0];
        let semiannual_tpx = semiannual.tpx(&[60, 60], &[2]).unwrap()[0];
        assert_abs_diff_eq!(annual_tpx, semiannual_tpx, epsilon = 1e-12);
    }
}
