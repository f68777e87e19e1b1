//! Voice instruction placement.
//!
//! Each maneuver gets a spoken announcement some distance before the
//! turn. The lead distance is capped at half the path distance to the
//! previous maneuver, so two announcements never swap order or overlap
//! when walked back from their turns. The announcement is then bound to
//! the step, strictly before the maneuver's own step, whose start point
//! is nearest to the placement.

use crate::geodesy::{distance, find_position_before_point, path_distance_between};
use crate::gpx::Point;
use crate::maneuver::ManeuverEvent;

/// A voice announcement positioned along a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePlacement {
    /// Index into the leg's maneuver list.
    pub maneuver_index: usize,
    /// Lead distance in meters actually used.
    pub safe_distance: f64,
    /// Interpolated announcement position.
    pub location: Point,
    /// Step that carries the announcement.
    pub target_step_index: usize,
}

/// Lead distance for every maneuver, in maneuver order.
///
/// The first maneuver gets `desired_m`; every later one gets at most half
/// the along-path distance from its predecessor.
pub fn safe_distances(maneuvers: &[ManeuverEvent], points: &[Point], desired_m: f64) -> Vec<f64> {
    let mut distances = Vec::with_capacity(maneuvers.len());

    for (i, maneuver) in maneuvers.iter().enumerate() {
        if i == 0 {
            distances.push(desired_m);
            continue;
        }

        let gap = path_distance_between(points, &maneuvers[i - 1].location, &maneuver.location);
        distances.push(desired_m.min(gap / 2.0));
    }

    distances
}

/// Step to attach an announcement to.
///
/// Step `i` starts at `points[i]`. Only steps before `maneuver_step` are
/// eligible; among them the one whose start is nearest to `placement`
/// wins, ties going to the earlier step. Returns None when no step
/// precedes the maneuver.
pub fn bind_step(points: &[Point], maneuver_step: usize, placement: &Point) -> Option<usize> {
    let step_count = points.len().saturating_sub(1);
    let mut best: Option<(usize, f64)> = None;

    for (i, start) in points.iter().enumerate().take(maneuver_step.min(step_count)) {
        let dist = distance(placement, start);
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

/// Place and bind the voice announcement of every maneuver on a leg.
///
/// Maneuvers without an eligible preceding step are skipped.
pub fn place_voice_instructions(
    maneuvers: &[ManeuverEvent],
    points: &[Point],
    desired_m: f64,
) -> Vec<VoicePlacement> {
    let distances = safe_distances(maneuvers, points, desired_m);

    maneuvers
        .iter()
        .zip(distances)
        .enumerate()
        .filter_map(|(maneuver_index, (maneuver, safe_distance))| {
            let location = find_position_before_point(points, &maneuver.location, safe_distance);

            let Some(target_step_index) = bind_step(points, maneuver.step_index, &location) else {
                log::debug!(
                    "dropping voice instruction for maneuver at step {}: no preceding step",
                    maneuver.step_index
                );
                return None;
            };

            log::debug!(
                "maneuver at step {} announced on step {target_step_index}, {safe_distance:.1} m ahead",
                maneuver.step_index
            );

            Some(VoicePlacement {
                maneuver_index,
                safe_distance,
                location,
                target_step_index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::track_length;
    use crate::maneuver::{detect_maneuvers, Locale};
    use approx::assert_abs_diff_eq;

    fn pt(lat: f64, lon: f64) -> Point {
        Point { lat, lon, ele: None }
    }

    /// East/north staircase with `steps` treads of `size` degrees.
    fn staircase(steps: usize, size: f64) -> Vec<Point> {
        let mut points = vec![pt(0.0, 0.0)];
        for i in 0..steps {
            let last = points.last().unwrap().clone();
            if i % 2 == 0 {
                points.push(pt(last.lat, last.lon + size));
            } else {
                points.push(pt(last.lat + size, last.lon));
            }
        }
        points
    }

    fn maneuvers_of(points: &[Point]) -> Vec<ManeuverEvent> {
        detect_maneuvers(points, Locale::English.phrases())
    }

    #[test]
    fn first_maneuver_gets_desired_distance() {
        let points = staircase(4, 0.001);
        let maneuvers = maneuvers_of(&points);
        let distances = safe_distances(&maneuvers, &points, 80.0);
        assert_eq!(distances[0], 80.0);
    }

    #[test]
    fn later_maneuvers_capped_at_half_gap() {
        let points = staircase(6, 0.001);
        let maneuvers = maneuvers_of(&points);
        assert_eq!(maneuvers.len(), 5);

        for desired in [0.0, 10.0, 55.0, 100.0, 1_000.0] {
            let distances = safe_distances(&maneuvers, &points, desired);
            for i in 1..maneuvers.len() {
                let gap = path_distance_between(
                    &points,
                    &maneuvers[i - 1].location,
                    &maneuvers[i].location,
                );
                assert!(distances[i] <= gap / 2.0 + 1e-9, "desired {desired}, maneuver {i}");
                assert!(distances[i] <= desired);
            }
        }
    }

    #[test]
    fn bind_step_excludes_maneuver_step() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 0.001), pt(0.0, 0.002), pt(0.0, 0.003)];
        // Placement sits exactly on step 2's start, but step 2 is the maneuver
        assert_eq!(bind_step(&points, 2, &points[2]), Some(1));
    }

    #[test]
    fn bind_step_without_preceding_step() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 0.001)];
        assert_eq!(bind_step(&points, 0, &points[0]), None);
    }

    #[test]
    fn right_angle_binds_to_first_step() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 1.0), pt(1.0, 1.0)];
        let maneuvers = maneuvers_of(&points);
        let placements = place_voice_instructions(&maneuvers, &points, 100.0);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].target_step_index, 0);
        assert_eq!(placements[0].safe_distance, 100.0);
        // 100 m west of the corner
        assert_abs_diff_eq!(placements[0].location.lat, 0.0, epsilon = 1e-12);
        assert!(placements[0].location.lon < 1.0);
        assert_abs_diff_eq!(
            distance(&placements[0].location, &points[1]),
            100.0,
            epsilon = 0.01
        );
    }

    #[test]
    fn zero_distance_places_at_maneuver() {
        let points = staircase(3, 0.001);
        let maneuvers = maneuvers_of(&points);
        let placements = place_voice_instructions(&maneuvers, &points, 0.0);

        assert_eq!(placements.len(), maneuvers.len());
        for placement in &placements {
            let maneuver = &maneuvers[placement.maneuver_index];
            assert_eq!(placement.location, maneuver.location);
            assert_eq!(placement.target_step_index, maneuver.step_index - 1);
        }
    }

    #[test]
    fn placements_never_cross() {
        let points = staircase(8, 0.0005);
        let maneuvers = maneuvers_of(&points);
        let placements = place_voice_instructions(&maneuvers, &points, 500.0);
        assert_eq!(placements.len(), maneuvers.len());

        // Every tread moves north or east, so lat + lon measures progress
        let progress = |p: &Point| p.lat + p.lon;
        for pair in placements.windows(2) {
            let previous_maneuver = &maneuvers[pair[0].maneuver_index];
            assert!(progress(&pair[1].location) >= progress(&previous_maneuver.location) - 1e-12);
            assert!(progress(&pair[1].location) >= progress(&pair[0].location));
        }
    }

    #[test]
    fn target_step_always_precedes_maneuver() {
        let points = staircase(7, 0.002);
        let maneuvers = maneuvers_of(&points);
        for desired in [0.0, 50.0, 150.0, 5_000.0] {
            for placement in place_voice_instructions(&maneuvers, &points, desired) {
                let maneuver = &maneuvers[placement.maneuver_index];
                assert!(placement.target_step_index < maneuver.step_index);
            }
        }
    }

    #[test]
    fn lead_longer_than_path_clamps_to_start() {
        let points = vec![pt(0.0, 0.0), pt(0.0, 0.001), pt(0.001, 0.001)];
        let maneuvers = maneuvers_of(&points);
        let lead = track_length(&points) * 10.0;
        let placements = place_voice_instructions(&maneuvers, &points, lead);

        assert_eq!(placements[0].location, points[0]);
        assert_eq!(placements[0].target_step_index, 0);
    }
}
