//! Geodesy and path computations.
//!
//! Great-circle distance, initial bearing and the along-path helpers
//! used by voice instruction placement. All coordinates use WGS84
//! (lat/lon in degrees); elevation is ignored.

use crate::gpx::Point;

/// Earth radius in meters used for all distance computations.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn distance(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from point A to point B in degrees [0, 360).
pub fn bearing(a: &Point, b: &Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Total length of a point sequence in meters.
pub fn track_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| distance(&w[0], &w[1]))
        .sum()
}

/// Index of the path point closest to `target`.
///
/// Full linear scan; ties resolve to the first occurrence. Returns None
/// for an empty path.
pub fn nearest_point_index(points: &[Point], target: &Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, p) in points.iter().enumerate() {
        let dist = distance(target, p);
        let is_better = match best {
            Some((_, best_dist)) => dist < best_dist,
            None => true,
        };
        if is_better {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Distance along the path between the path points nearest to `a` and `b`.
///
/// Order of `a` and `b` does not matter. Returns 0 for paths with fewer
/// than 2 points.
pub fn path_distance_between(points: &[Point], a: &Point, b: &Point) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let (Some(ia), Some(ib)) = (nearest_point_index(points, a), nearest_point_index(points, b))
    else {
        return 0.0;
    };
    let (from, to) = if ia <= ib { (ia, ib) } else { (ib, ia) };

    track_length(&points[from..=to])
}

/// Position on the path `distance_before` meters before `target`.
///
/// Starts at the path point nearest to `target` and walks backward
/// segment by segment, interpolating linearly inside the segment that
/// covers the remaining distance. Clamps to the first point when the
/// path is too short. With `distance_before <= 0` or fewer than 2 path
/// points the target itself is returned.
pub fn find_position_before_point(points: &[Point], target: &Point, distance_before: f64) -> Point {
    if points.len() < 2 || distance_before <= 0.0 {
        return target.clone();
    }
    let Some(start) = nearest_point_index(points, target) else {
        return target.clone();
    };

    let mut accumulated = 0.0;
    let mut index = start;

    while index > 0 && accumulated < distance_before {
        let current = &points[index];
        let previous = &points[index - 1];
        let segment = distance(previous, current);

        if accumulated + segment >= distance_before {
            // 0 = current point, 1 = previous point
            let t = (distance_before - accumulated) / segment;
            return Point {
                lat: current.lat + t * (previous.lat - current.lat),
                lon: current.lon + t * (previous.lon - current.lon),
                ele: None,
            };
        }

        accumulated += segment;
        index -= 1;
    }

    // Ran out of path before covering the distance
    points[0].clone()
}
