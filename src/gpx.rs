//! GPX 1.1 file reading.
//!
//! Wraps the `gpx` crate and extracts tracks and routes into plain point
//! sequences. Only the first track segment (or the first route, when the
//! file carries no tracks) feeds the directions pipeline.

use std::io::Read;

use crate::{Error, Result};

/// A geographic coordinate with optional elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, ele: None }
    }

    /// `[lon, lat]` pair as used by the directions response.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// A recorded path, one point list per `<trkseg>`.
#[derive(Debug, Clone)]
pub struct Track {
    pub segments: Vec<Vec<Point>>,
}

/// A planned route.
#[derive(Debug, Clone)]
pub struct Route {
    pub points: Vec<Point>,
}

/// Tracks and routes extracted from a GPX file.
#[derive(Debug, Clone)]
pub struct GpxData {
    pub tracks: Vec<Track>,
    pub routes: Vec<Route>,
}

impl GpxData {
    /// Point sequence to convert.
    ///
    /// The first segment of the first track wins; files without tracks
    /// fall back to their first route.
    pub fn source_points(&self) -> Result<&[Point]> {
        if let Some(track) = self.tracks.first() {
            if track.segments.len() > 1 {
                log::warn!(
                    "track has {} segments, only the first one is converted",
                    track.segments.len()
                );
            }
            return Ok(track.segments.first().map(Vec::as_slice).unwrap_or(&[]));
        }

        if let Some(route) = self.routes.first() {
            return Ok(&route.points);
        }

        Err(Error::Input("neither tracks nor routes in GPX data".into()))
    }
}

fn to_point(wp: &gpx::Waypoint) -> Point {
    Point {
        lat: wp.point().y(),
        lon: wp.point().x(),
        ele: wp.elevation,
    }
}

/// Parse a GPX file from any reader and return structured data.
pub fn parse<R: Read>(reader: R) -> Result<GpxData> {
    let gpx = gpx::read(reader)?;

    let tracks = gpx
        .tracks
        .iter()
        .map(|t| Track {
            segments: t
                .segments
                .iter()
                .map(|seg| seg.points.iter().map(to_point).collect())
                .collect(),
        })
        .collect();

    let routes = gpx
        .routes
        .iter()
        .map(|r| Route {
            points: r.points.iter().map(to_point).collect(),
        })
        .collect();

    Ok(GpxData { tracks, routes })
}

/// Parse GPX from a byte slice. Convenience wrapper for JNI.
pub fn parse_bytes(data: &[u8]) -> Result<GpxData> {
    parse(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Test Track</name>
    <trkseg>
      <trkpt lat="48.2082" lon="16.3738"><ele>171</ele></trkpt>
      <trkpt lat="48.2090" lon="16.3750"><ele>173</ele></trkpt>
      <trkpt lat="48.2100" lon="16.3760"><ele>170</ele></trkpt>
    </trkseg>
  </trk>
  <rte>
    <name>Test Route</name>
    <rtept lat="48.2000" lon="16.3500"></rtept>
    <rtept lat="48.2100" lon="16.3600"></rtept>
  </rte>
</gpx>"#;

    #[test]
    fn parse_minimal_gpx() {
        let data = parse_bytes(MINIMAL_GPX.as_bytes()).unwrap();

        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.tracks[0].segments[0].len(), 3);

        let p = &data.tracks[0].segments[0][0];
        assert!((p.lat - 48.2082).abs() < 1e-6);
        assert!((p.lon - 16.3738).abs() < 1e-6);
        assert_eq!(p.ele, Some(171.0));
    }

    #[test]
    fn parse_route() {
        let data = parse_bytes(MINIMAL_GPX.as_bytes()).unwrap();

        assert_eq!(data.routes.len(), 1);
        assert_eq!(data.routes[0].points.len(), 2);
    }

    #[test]
    fn source_points_prefer_track() {
        let data = parse_bytes(MINIMAL_GPX.as_bytes()).unwrap();
        assert_eq!(data.source_points().unwrap().len(), 3);
    }

    #[test]
    fn source_points_fall_back_to_route() {
        let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <rtept lat="48.0" lon="16.0"></rtept>
    <rtept lat="48.1" lon="16.1"></rtept>
  </rte>
</gpx>"#;

        let data = parse_bytes(gpx.as_bytes()).unwrap();
        let points = data.source_points().unwrap();
        assert_eq!(points.len(), 2);
        assert!((points[1].lon - 16.1).abs() < 1e-6);
    }

    #[test]
    fn source_points_empty_gpx_is_input_error() {
        let empty = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
</gpx>"#;

        let data = parse_bytes(empty.as_bytes()).unwrap();
        assert!(matches!(data.source_points(), Err(Error::Input(_))));
    }

    #[test]
    fn parse_invalid_xml_returns_error() {
        let result = parse_bytes(b"not xml at all");
        assert!(matches!(result, Err(Error::Gpx(_))));
    }

    #[test]
    fn parse_track_without_elevation() {
        let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="48.0" lon="16.0"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

        let data = parse_bytes(gpx.as_bytes()).unwrap();
        assert_eq!(data.tracks[0].segments[0][0].ele, None);
    }

    #[test]
    fn multi_segment_track_uses_first_segment() {
        let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Multi Segment</name>
    <trkseg>
      <trkpt lat="48.0" lon="16.0"></trkpt>
      <trkpt lat="48.1" lon="16.1"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="48.2" lon="16.2"></trkpt>
      <trkpt lat="48.3" lon="16.3"></trkpt>
      <trkpt lat="48.4" lon="16.4"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

        let data = parse_bytes(gpx.as_bytes()).unwrap();
        assert_eq!(data.tracks[0].segments.len(), 2);
        let points = data.source_points().unwrap();
        assert_eq!(points.len(), 2);
        assert!((points[0].lat - 48.0).abs() < 1e-6);
    }
}
