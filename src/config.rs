//! Conversion options.
//!
//! Options can be stored as TOML next to the GPX files; every field is
//! optional and falls back to its default. Command-line flags override
//! whatever the file provides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::maneuver::Locale;
use crate::segment::validate_percentages;
use crate::{Error, Result};

/// Default lead distance of voice announcements in meters.
pub const DEFAULT_VOICE_INSTRUCTION_DISTANCE_M: f64 = 100.0;

/// Default simplification tolerance in meters (about 1e-5 degrees).
pub const DEFAULT_SIMPLIFY_TOLERANCE_M: f64 = 1.0;

/// Country the route's legs are reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRegion {
    pub iso_3166_1_alpha3: String,
    pub iso_3166_1: String,
}

impl Default for AdminRegion {
    fn default() -> Self {
        Self {
            iso_3166_1_alpha3: "DEU".into(),
            iso_3166_1: "DE".into(),
        }
    }
}

/// Everything that shapes a GPX to directions conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Share of the simplified points per leg; must sum to 100.
    pub leg_percentages: Vec<u32>,
    /// Meters before a maneuver its announcement is placed; 0 announces
    /// at the maneuver itself.
    pub voice_instruction_distance: f64,
    /// 0 = English, 1 = Arabic.
    pub locale: Locale,
    /// Ramer-Douglas-Peucker tolerance in meters; 0 keeps every point.
    pub simplify_tolerance_m: f64,
    pub admin: AdminRegion,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            leg_percentages: vec![100],
            voice_instruction_distance: DEFAULT_VOICE_INSTRUCTION_DISTANCE_M,
            locale: Locale::default(),
            simplify_tolerance_m: DEFAULT_SIMPLIFY_TOLERANCE_M,
            admin: AdminRegion::default(),
        }
    }
}

impl RouteOptions {
    /// Parse options from TOML text.
    ///
    /// Only the syntax and field types are checked here; call
    /// [`RouteOptions::validate`] once all overrides are applied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Configuration(format!("invalid options: {e}")))
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read options file {}: {e}", path.display()))
        })?;
        let options = Self::from_toml_str(&content)?;
        log::info!("options loaded from {}", path.display());
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        validate_percentages(&self.leg_percentages)?;

        if !self.voice_instruction_distance.is_finite() || self.voice_instruction_distance < 0.0 {
            return Err(Error::Configuration(format!(
                "voice instruction distance must be a non-negative number of meters, got {}",
                self.voice_instruction_distance
            )));
        }

        if !self.simplify_tolerance_m.is_finite() {
            return Err(Error::Configuration(format!(
                "simplification tolerance must be finite, got {}",
                self.simplify_tolerance_m
            )));
        }

        Ok(())
    }
}
