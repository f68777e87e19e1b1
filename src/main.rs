//! `gpx-directions` command line converter.
//!
//! Reads a GPX file, converts its first track into a directions route
//! and writes the JSON response next to the input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gpx_directions::{gpx_to_directions, Locale, RouteOptions};

#[derive(Parser, Debug)]
#[command(name = "gpx-directions", version, about)]
struct Args {
    /// GPX file to convert.
    input: PathBuf,

    /// Output file; defaults to `<INPUT>.json`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML options file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leg split as comma separated percentages summing to 100.
    #[arg(long, value_delimiter = ',')]
    legs: Option<Vec<u32>>,

    /// Meters before a maneuver its voice instruction is placed.
    #[arg(long)]
    voice_distance: Option<f64>,

    /// Instruction language: 0 = English, 1 = Arabic.
    #[arg(long)]
    locale: Option<u8>,

    /// Simplification tolerance in meters.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Write single-line JSON.
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn options(&self) -> Result<RouteOptions> {
        let mut options = match &self.config {
            Some(path) => RouteOptions::load(path)?,
            None => RouteOptions::default(),
        };

        if let Some(legs) = &self.legs {
            options.leg_percentages = legs.clone();
        }
        if let Some(distance) = self.voice_distance {
            options.voice_instruction_distance = distance;
        }
        if let Some(locale) = self.locale {
            options.locale = Locale::try_from(locale)?;
        }
        if let Some(tolerance) = self.tolerance {
            options.simplify_tolerance_m = tolerance;
        }

        options.validate()?;
        Ok(options)
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut name = self.input.clone().into_os_string();
            name.push(".json");
            PathBuf::from(name)
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let options = args.options()?;

    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let response = gpx_to_directions(&data, &options)
        .with_context(|| format!("converting {}", args.input.display()))?;

    let output = args.output_path();
    std::fs::write(&output, response.to_json(!args.compact)?)
        .with_context(|| format!("writing {}", output.display()))?;

    log::info!("converted route written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_options(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gpx-directions-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn flags_override_options_file() {
        let path = write_options("override", "leg_percentages = [40, 40]\nlocale = 1\n");
        let config = path.to_str().unwrap();
        let args = Args::parse_from(["gpx-directions", "track.gpx", "--config", config, "--legs", "50,50"]);

        let options = args.options().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(options.leg_percentages, vec![50, 50]);
        assert_eq!(options.locale, Locale::Arabic);
    }

    #[test]
    fn invalid_file_value_without_override_fails() {
        let path = write_options("invalid", "leg_percentages = [40, 40]\n");
        let config = path.to_str().unwrap();
        let args = Args::parse_from(["gpx-directions", "track.gpx", "--config", config]);

        let result = args.options();
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn invalid_flag_value_fails() {
        let args = Args::parse_from(["gpx-directions", "track.gpx", "--voice-distance=-10"]);
        assert!(args.options().is_err());
    }

    #[test]
    fn output_defaults_next_to_input() {
        let args = Args::parse_from(["gpx-directions", "rides/track.gpx"]);
        assert_eq!(args.output_path(), PathBuf::from("rides/track.gpx.json"));
    }
}
