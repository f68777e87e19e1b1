//! Directions response assembly.
//!
//! Builds the route -> leg -> step structure a navigation SDK expects
//! from a directions API call. Each leg runs three passes over its
//! points: maneuver detection, voice placement and step assembly.

use geo_types::Coord;
use serde::Serialize;

use crate::config::{AdminRegion, RouteOptions};
use crate::geodesy::{bearing, distance};
use crate::gpx::{self, Point};
use crate::maneuver::{detect_maneuvers, ManeuverEvent, Modifier};
use crate::segment::split_legs;
use crate::simplify::simplify;
use crate::voice::{place_voice_instructions, VoicePlacement};
use crate::{Error, Result};

/// Constant travel speed used to derive durations, in m/s.
pub const ASSUMED_SPEED_MPS: f64 = 10.0;

/// Polyline precision expected by the navigation SDK.
pub const POLYLINE_PRECISION: u32 = 6;

/// Trigger distance of every voice announcement.
const VOICE_DISTANCE_ALONG_GEOMETRY: u32 = 30;

/// Top-level directions API response.
#[derive(Debug, Clone, Serialize)]
pub struct DirectionsResponse {
    pub routes: Vec<DirectionsRoute>,
    pub waypoints: Vec<ResponseWaypoint>,
    pub code: &'static str,
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRoute {
    pub weight_name: &'static str,
    pub weight: f64,
    pub duration: f64,
    pub distance: f64,
    pub legs: Vec<RouteLeg>,
    pub geometry: String,
    #[serde(rename = "voiceLocale")]
    pub voice_locale: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub via_waypoints: Vec<[f64; 2]>,
    pub admins: Vec<AdminRegion>,
    pub weight: f64,
    pub duration: f64,
    pub steps: Vec<RouteStep>,
    pub distance: f64,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteStep {
    #[serde(rename = "bannerInstructions")]
    pub banner_instructions: Vec<BannerInstruction>,
    #[serde(rename = "voiceInstructions")]
    pub voice_instructions: Vec<VoiceInstruction>,
    pub intersections: Vec<Intersection>,
    pub maneuver: StepManeuver,
    pub name: String,
    pub duration: f64,
    pub distance: f64,
    pub driving_side: &'static str,
    pub weight: f64,
    pub mode: &'static str,
    pub geometry: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepManeuver {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub instruction: &'static str,
    pub modifier: Modifier,
    pub bearing_after: f64,
    pub bearing_before: f64,
    pub location: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerInstruction {
    pub primary: BannerText,
    #[serde(rename = "distanceAlongGeometry")]
    pub distance_along_geometry: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerText {
    pub components: Vec<BannerComponent>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub modifier: Modifier,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BannerComponent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceInstruction {
    #[serde(rename = "ssmlAnnouncement")]
    pub ssml_announcement: String,
    pub announcement: &'static str,
    #[serde(rename = "distanceAlongGeometry")]
    pub distance_along_geometry: u32,
    pub location: [f64; 2],
    pub safe_distance_used: f64,
    pub target_maneuver_step: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Intersection {
    pub entry: Vec<bool>,
    pub bearings: Vec<u32>,
    pub duration: f64,
    pub mapbox_streets_v8: StreetClass,
    pub is_urban: bool,
    pub admin_index: usize,
    pub out: usize,
    pub weight: f64,
    pub geometry_index: usize,
    pub location: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct StreetClass {
    pub class: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseWaypoint {
    pub distance: f64,
    pub name: String,
    pub location: [f64; 2],
}

impl DirectionsResponse {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Encode points as a polyline string at [`POLYLINE_PRECISION`].
pub fn encode_geometry(points: &[Point]) -> Result<String> {
    let coords = points.iter().map(|p| Coord { x: p.lon, y: p.lat });
    polyline::encode_coordinates(coords, POLYLINE_PRECISION)
        .map_err(|e| Error::Polyline(e.to_string()))
}

/// Banner trigger distance for a segment of the given length.
fn banner_distance_along_geometry(segment_m: f64) -> u32 {
    if segment_m < 60.0 { 30 } else { 50 }
}

fn ssml(announcement: &str) -> String {
    format!(
        "<speak><amazon:effect name=\"drc\"><prosody rate=\"1.08\">{announcement}</prosody></amazon:effect></speak>"
    )
}

fn voice_instruction(placement: &VoicePlacement, maneuver: &ManeuverEvent) -> VoiceInstruction {
    VoiceInstruction {
        ssml_announcement: ssml(maneuver.instruction),
        announcement: maneuver.instruction,
        distance_along_geometry: VOICE_DISTANCE_ALONG_GEOMETRY,
        location: placement.location.lon_lat(),
        safe_distance_used: placement.safe_distance,
        target_maneuver_step: maneuver.step_index,
    }
}

/// Assemble one step per segment of `points`.
pub fn assemble_steps(
    points: &[Point],
    maneuvers: &[ManeuverEvent],
    placements: &[VoicePlacement],
) -> Result<Vec<RouteStep>> {
    let mut steps = Vec::with_capacity(points.len().saturating_sub(1));
    let mut bearing_before = 0.0;

    for (i, segment) in points.windows(2).enumerate() {
        let (start, end) = (&segment[0], &segment[1]);
        let bearing_after = bearing(start, end);
        let length = distance(start, end);
        let duration = length / ASSUMED_SPEED_MPS;
        let weight = duration;

        let instruction = maneuvers
            .iter()
            .find(|m| m.step_index == i)
            .map_or("", |m| m.instruction);
        let modifier = Modifier::from_instruction(instruction);

        let voice_instructions = placements
            .iter()
            .filter(|p| p.target_step_index == i)
            .map(|p| voice_instruction(p, &maneuvers[p.maneuver_index]))
            .collect();

        steps.push(RouteStep {
            banner_instructions: vec![BannerInstruction {
                primary: BannerText {
                    components: vec![BannerComponent { kind: "text", text: instruction }],
                    kind: "turn",
                    modifier,
                    text: instruction,
                },
                distance_along_geometry: banner_distance_along_geometry(length),
            }],
            voice_instructions,
            intersections: vec![Intersection {
                entry: vec![true],
                bearings: vec![bearing_after.round() as u32 % 360],
                duration,
                mapbox_streets_v8: StreetClass { class: "street" },
                is_urban: false,
                admin_index: 0,
                out: 0,
                weight,
                geometry_index: 0,
                location: start.lon_lat(),
            }],
            maneuver: StepManeuver {
                kind: "turn",
                instruction,
                modifier,
                bearing_after,
                bearing_before,
                location: start.lon_lat(),
            },
            name: String::new(),
            duration,
            distance: length,
            driving_side: "right",
            weight,
            mode: "driving",
            geometry: encode_geometry(segment)?,
        });

        bearing_before = bearing_after;
    }

    Ok(steps)
}

/// Build one leg: detect maneuvers, place announcements, assemble steps.
///
/// A leg with fewer than 2 points has no segments and comes back with an
/// empty step list.
pub fn build_leg(points: &[Point], options: &RouteOptions) -> Result<RouteLeg> {
    if points.len() < 2 {
        log::warn!("leg has {} point(s), emitting it without steps", points.len());
    }

    let maneuvers = detect_maneuvers(points, options.locale.phrases());
    let placements = place_voice_instructions(&maneuvers, points, options.voice_instruction_distance);
    let steps = assemble_steps(points, &maneuvers, &placements)?;

    log::debug!(
        "leg: {} steps, {} maneuvers, {} voice instructions",
        steps.len(),
        maneuvers.len(),
        placements.len()
    );

    Ok(RouteLeg {
        via_waypoints: Vec::new(),
        admins: vec![options.admin.clone()],
        weight: steps.iter().map(|s| s.weight).sum(),
        duration: steps.iter().map(|s| s.duration).sum(),
        distance: steps.iter().map(|s| s.distance).sum(),
        steps,
        summary: String::new(),
    })
}

/// Convert a raw track into a directions response.
///
/// The track is simplified, split into legs and every leg is assembled
/// independently. Consecutive legs do not share their boundary point.
pub fn build_response(track: &[Point], options: &RouteOptions) -> Result<DirectionsResponse> {
    options.validate()?;
    assemble_response(track, options)
}

fn assemble_response(track: &[Point], options: &RouteOptions) -> Result<DirectionsResponse> {
    let points = simplify(track, options.simplify_tolerance_m);
    if points.len() < 2 {
        return Err(Error::Input(format!(
            "route needs at least 2 points after simplification, got {}",
            points.len()
        )));
    }

    let legs = split_legs(&points, &options.leg_percentages)?
        .iter()
        .map(|leg| build_leg(leg, options))
        .collect::<Result<Vec<_>>>()?;

    let route = DirectionsRoute {
        weight_name: "auto",
        weight: legs.iter().map(|l| l.weight).sum(),
        duration: legs.iter().map(|l| l.duration).sum(),
        distance: legs.iter().map(|l| l.distance).sum(),
        legs,
        geometry: encode_geometry(&points)?,
        voice_locale: options.locale.voice_locale(),
    };

    log::info!(
        "route: {} points, {} legs, {:.0} m, {:.0} s",
        points.len(),
        route.legs.len(),
        route.distance,
        route.duration
    );

    let waypoints = points
        .iter()
        .map(|p| ResponseWaypoint {
            distance: 0.0,
            name: String::new(),
            location: p.lon_lat(),
        })
        .collect();

    Ok(DirectionsResponse {
        routes: vec![route],
        waypoints,
        code: "Ok",
        uuid: String::new(),
    })
}

/// Parse GPX bytes and convert their first track (or route).
pub fn gpx_to_directions(data: &[u8], options: &RouteOptions) -> Result<DirectionsResponse> {
    options.validate()?;

    let gpx_data = gpx::parse_bytes(data)?;
    let track = gpx_data.source_points()?;
    log::info!("converting {} GPX points", track.len());

    assemble_response(track, options)
}
