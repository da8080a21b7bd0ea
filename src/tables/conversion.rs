//! Rate-vector transformations: periodicity conversion and loading
//!
//! Converting to a finer periodicity splits each rate into `ratio` identical
//! sub-period rates using the standard actuarial relation
//! `q_sub = 1 - (1 - q)^(1/ratio)`. Converting to a coarser periodicity
//! compounds each block back with `q = 1 - (1 - q_sub)^ratio`, which is only
//! allowed when every block is constant. A finer-then-coarser round trip is
//! therefore always lossless.
//!
//! Rates should be loaded before their periodicity is changed.

use log::debug;

use crate::error::{Error, Result};
use crate::periodicity::Periodicity;

/// Convert a rate vector from `from` to `to`
pub fn change_rate_periodicity(
    qx: &[f64],
    from: Periodicity,
    to: Periodicity,
) -> Result<Vec<f64>> {
    if to.coarser_than(from) {
        if !from.divides_evenly_into(to) {
            return Err(Error::IncompatiblePeriodicity { from, to });
        }
        let ratio = (from.periods_per_year() / to.periods_per_year()) as usize;
        debug!("aggregating {} rates from {} to {} (ratio {})", qx.len(), from, to, ratio);
        aggregate(qx, ratio, to)
    } else if to.finer_than(from) {
        if !to.divides_evenly_into(from) {
            return Err(Error::IncompatiblePeriodicity { from, to });
        }
        let ratio = (to.periods_per_year() / from.periods_per_year()) as usize;
        debug!("subdividing {} rates from {} to {} (ratio {})", qx.len(), from, to, ratio);
        Ok(subdivide(qx, ratio))
    } else {
        Ok(qx.to_vec())
    }
}

/// Multiply every rate below 1 by `percent / 100`, capping at 1
///
/// Rates already at 1 stay at 1. A load of 0% leaves the rates unchanged.
pub fn load_rates(qx: &[f64], percent: f64) -> Result<Vec<f64>> {
    if percent < 0.0 || percent.is_nan() {
        return Err(Error::NegativeLoad(percent));
    }
    if percent == 0.0 {
        return Ok(qx.to_vec());
    }
    let factor = percent / 100.0;
    Ok(qx
        .iter()
        .map(|&q| if q < 1.0 { (q * factor).min(1.0) } else { 1.0 })
        .collect())
}

/// Rate for one of `ratio` sub-periods
fn split_rate(q: f64, ratio: usize) -> f64 {
    1.0 - (1.0 - q).powf(1.0 / ratio as f64)
}

/// Rate over `ratio` consecutive sub-periods
fn compound_rate(q: f64, ratio: usize) -> f64 {
    1.0 - (1.0 - q).powi(ratio as i32)
}

fn subdivide(qx: &[f64], ratio: usize) -> Vec<f64> {
    qx.iter()
        .flat_map(|&q| std::iter::repeat(split_rate(q, ratio)).take(ratio))
        .collect()
}

fn aggregate(qx: &[f64], ratio: usize, to: Periodicity) -> Result<Vec<f64>> {
    qx.chunks(ratio)
        .enumerate()
        .map(|(block, rates)| {
            let first = rates[0];
            // A trailing partial block is checked over the rates it has
            if rates.iter().any(|&q| q != first) {
                let start = block * ratio;
                return Err(Error::NonConstantBlock {
                    start,
                    end: start + rates.len(),
                    to,
                });
            }
            Ok(compound_rate(first, ratio))
        })
        .collect()
}
