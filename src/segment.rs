//! Route segmentation into legs.
//!
//! A simplified track is cut into consecutive legs, each receiving a
//! percentage share of the points. Legs partition the input exactly:
//! every point lands in exactly one leg.

use crate::gpx::Point;
use crate::{Error, Result};

/// Check a leg percentage split.
///
/// The split must name at least one leg and its shares must sum to 100.
pub fn validate_percentages(percentages: &[u32]) -> Result<()> {
    if percentages.is_empty() {
        return Err(Error::Configuration(
            "leg percentages must name at least one leg".into(),
        ));
    }

    let sum: u64 = percentages.iter().map(|&p| u64::from(p)).sum();
    if sum != 100 {
        return Err(Error::Configuration(format!(
            "leg percentages must sum to 100, got {sum}"
        )));
    }

    Ok(())
}

/// Number of points allocated to each leg.
///
/// Each share is rounded (ties to even) and the last leg absorbs the
/// remainder. Shares are capped at the points still unallocated so that
/// rounding overshoot never produces a negative remainder.
pub fn leg_sizes(total: usize, percentages: &[u32]) -> Result<Vec<usize>> {
    validate_percentages(percentages)?;

    let mut sizes = Vec::with_capacity(percentages.len());
    let mut remaining = total;

    for &pct in &percentages[..percentages.len() - 1] {
        let rounded = (total as f64 * f64::from(pct) / 100.0).round_ties_even() as usize;
        let size = rounded.min(remaining);
        remaining -= size;
        sizes.push(size);
    }
    sizes.push(remaining);

    Ok(sizes)
}

/// Split `points` into consecutive legs according to `percentages`.
pub fn split_legs(points: &[Point], percentages: &[u32]) -> Result<Vec<Vec<Point>>> {
    let sizes = leg_sizes(points.len(), percentages)?;

    let mut legs = Vec::with_capacity(sizes.len());
    let mut start = 0;
    for size in sizes {
        legs.push(points[start..start + size].to_vec());
        start += size;
    }

    log::debug!(
        "split {} points into legs of {:?}",
        points.len(),
        legs.iter().map(Vec::len).collect::<Vec<_>>()
    );

    Ok(legs)
}
