pub mod android_jni;
pub mod config;
pub mod directions;
pub mod geodesy;
pub mod gpx;
pub mod maneuver;
pub mod segment;
pub mod simplify;
pub mod voice;

pub use config::RouteOptions;
pub use directions::{build_response, gpx_to_directions, DirectionsResponse};
pub use gpx::Point;
pub use maneuver::Locale;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors raised while converting a GPX track into directions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("GPX parse error: {0}")]
    Gpx(#[from] ::gpx::errors::GpxError),

    #[error("polyline encoding error: {0}")]
    Polyline(String),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
