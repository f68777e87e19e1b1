//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.

use jni::objects::{JByteArray, JClass, JIntArray};
use jni::sys::{jdouble, jint, jstring};
use jni::JNIEnv;

use crate::config::RouteOptions;
use crate::directions::gpx_to_directions;
use crate::maneuver::Locale;
use crate::{Error, Result};

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("gpx-directions"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {}

/// Returns the library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_gpxdirections_app_RustBridge_version(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    match env.new_string(crate::VERSION) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Converts GPX bytes into a directions response JSON string.
/// Maps to: RustBridge.gpxToDirections(ByteArray, IntArray, Double, Int) -> String
///
/// Invalid input throws `IllegalArgumentException` and returns null.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_gpxdirections_app_RustBridge_gpxToDirections<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    gpx_bytes: JByteArray<'local>,
    leg_percentages: JIntArray<'local>,
    voice_distance: jdouble,
    locale: jint,
) -> jstring {
    init_logging();

    let result = convert(&mut env, &gpx_bytes, &leg_percentages, voice_distance, locale)
        .and_then(|json| Ok(env.new_string(json)?));

    match result {
        Ok(s) => s.into_raw(),
        Err(e) => {
            log::error!("gpxToDirections failed: {e}");
            // A pending exception already explains a JNI failure
            if !env.exception_check().unwrap_or(true) {
                let _ = env.throw_new("java/lang/IllegalArgumentException", e.to_string());
            }
            std::ptr::null_mut()
        }
    }
}

fn convert(
    env: &mut JNIEnv,
    gpx_bytes: &JByteArray,
    leg_percentages: &JIntArray,
    voice_distance: jdouble,
    locale: jint,
) -> Result<String> {
    let data = env
        .convert_byte_array(gpx_bytes)
        .map_err(|e| Error::Input(format!("cannot read GPX bytes: {e}")))?;

    let options = RouteOptions {
        leg_percentages: read_percentages(env, leg_percentages)?,
        voice_instruction_distance: voice_distance,
        locale: u8::try_from(locale)
            .map_err(|_| Error::Configuration(format!("unsupported locale {locale}")))
            .and_then(Locale::try_from)?,
        ..RouteOptions::default()
    };

    gpx_to_directions(&data, &options)?.to_json(false)
}

fn read_percentages(env: &mut JNIEnv, array: &JIntArray) -> Result<Vec<u32>> {
    let jni_error = |e: jni::errors::Error| Error::Configuration(format!("cannot read leg percentages: {e}"));

    let len = env.get_array_length(array).map_err(jni_error)?;
    let mut raw = vec![0; usize::try_from(len).unwrap_or(0)];
    env.get_int_array_region(array, 0, &mut raw).map_err(jni_error)?;

    raw.into_iter()
        .map(|p| {
            u32::try_from(p)
                .map_err(|_| Error::Configuration(format!("leg percentage {p} is negative")))
        })
        .collect()
}
