//! Track simplification.
//!
//! Recorded tracks carry far more points than a directions route needs.
//! The Ramer-Douglas-Peucker algorithm drops every point that lies within
//! `tolerance_m` of the line through its neighbours, which keeps the
//! corners the maneuver detector cares about.

use crate::gpx::Point;

/// Simplify a point sequence with Ramer-Douglas-Peucker.
///
/// `tolerance_m` is the maximum perpendicular deviation in meters. A
/// tolerance of zero or less returns the input unchanged.
pub fn simplify(points: &[Point], tolerance_m: f64) -> Vec<Point> {
    if tolerance_m <= 0.0 {
        return points.to_vec();
    }

    let simplified = rdp_simplify(points, tolerance_m);
    log::debug!(
        "simplified {} points to {} (tolerance {tolerance_m} m)",
        points.len(),
        simplified.len()
    );
    simplified
}

fn rdp_simplify(points: &[Point], tolerance_m: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = &points[0];
    let last = &points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance_m(p, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > tolerance_m {
        let mut left = rdp_simplify(&points[..=max_idx], tolerance_m);
        let right = rdp_simplify(&points[max_idx..], tolerance_m);

        // Junction point is the head of `right`
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first.clone(), last.clone()]
    }
}

/// Perpendicular distance from point P to the line through A and B, in meters.
///
/// Uses a planar approximation with latitude-cosine scaling.
fn perpendicular_distance_m(p: &Point, a: &Point, b: &Point) -> f64 {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let m_per_deg_lat = 111_320.0;
    let m_per_deg_lon = 111_320.0 * cos_lat;

    let ax = a.lon * m_per_deg_lon;
    let ay = a.lat * m_per_deg_lat;
    let bx = b.lon * m_per_deg_lon;
    let by = b.lat * m_per_deg_lat;
    let px = p.lon * m_per_deg_lon;
    let py = p.lat * m_per_deg_lat;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    // Closed loop: fall back to the distance from the shared endpoint
    if len_sq < 1e-10 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    let cross = ((px - ax) * dy - (py - ay) * dx).abs();
    cross / len_sq.sqrt()
}
