//! Maneuver detection.
//!
//! Walks the segments of a leg, compares each segment's bearing with the
//! previous one and turns large heading changes into turn instructions.
//! The bearing delta is not wrapped into [-180, 180]: a
//! positive delta above 180 degrees reads as a sharp left turn.

use serde::{Deserialize, Serialize};

use crate::geodesy::bearing;
use crate::gpx::Point;
use crate::Error;

/// Turn categories a bearing change can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Right,
    SharpRight,
    Left,
    SharpLeft,
}

/// Instruction language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl Locale {
    /// Phrase table for this locale.
    pub fn phrases(self) -> &'static PhraseTable {
        match self {
            Locale::English => &ENGLISH,
            Locale::Arabic => &ARABIC,
        }
    }

    /// Locale tag announced to the navigation SDK's speech engine.
    pub fn voice_locale(self) -> &'static str {
        match self {
            Locale::English => "en-US",
            Locale::Arabic => "ar-SA",
        }
    }
}

impl TryFrom<u8> for Locale {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Locale::English),
            1 => Ok(Locale::Arabic),
            other => Err(Error::Configuration(format!(
                "unsupported locale {other}, expected 0 (English) or 1 (Arabic)"
            ))),
        }
    }
}

impl From<Locale> for u8 {
    fn from(locale: Locale) -> Self {
        match locale {
            Locale::English => 0,
            Locale::Arabic => 1,
        }
    }
}

/// Instruction text for every turn kind in one language.
#[derive(Debug)]
pub struct PhraseTable {
    pub right: &'static str,
    pub sharp_right: &'static str,
    pub left: &'static str,
    pub sharp_left: &'static str,
}

impl PhraseTable {
    pub fn text(&self, kind: TurnKind) -> &'static str {
        match kind {
            TurnKind::Right => self.right,
            TurnKind::SharpRight => self.sharp_right,
            TurnKind::Left => self.left,
            TurnKind::SharpLeft => self.sharp_left,
        }
    }
}

static ENGLISH: PhraseTable = PhraseTable {
    right: "Make a right turn",
    sharp_right: "Make a sharp right turn",
    left: "Make a left turn",
    sharp_left: "Make a sharp left turn",
};

static ARABIC: PhraseTable = PhraseTable {
    right: "اتجه يمينًا",
    sharp_right: "قم بالانعطاف الحاد إلى اليمين",
    left: "اتخذ المنعطف الأيسر",
    sharp_left: "قم بإجراء انعطاف حاد إلى اليسار",
};

const RIGHT_KEYWORDS: [&str; 2] = ["right", "يمين"];
const LEFT_KEYWORDS: [&str; 2] = ["left", "يسار"];
const SHARP_KEYWORDS: [&str; 2] = ["sharp", "حاد"];

/// Maneuver modifier reported in the directions response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Straight,
    Right,
    Left,
    Sharp,
}

impl Modifier {
    /// Derive the modifier from instruction text in either locale.
    pub fn from_instruction(text: &str) -> Self {
        let lower = text.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
        let sharp = contains_any(&SHARP_KEYWORDS);

        if contains_any(&RIGHT_KEYWORDS) {
            if sharp { Modifier::Sharp } else { Modifier::Right }
        } else if contains_any(&LEFT_KEYWORDS) {
            if sharp { Modifier::Sharp } else { Modifier::Left }
        } else {
            Modifier::Straight
        }
    }
}

/// A detected heading change.
#[derive(Debug, Clone, PartialEq)]
pub struct ManeuverEvent {
    /// Start point of the segment the turn leads into.
    pub location: Point,
    pub kind: TurnKind,
    pub instruction: &'static str,
    /// Index of the originating segment within its leg.
    pub step_index: usize,
    pub bearing_before: f64,
    pub bearing_after: f64,
}

impl ManeuverEvent {
    pub fn modifier(&self) -> Modifier {
        Modifier::from_instruction(self.instruction)
    }
}

/// Classify a signed, unwrapped bearing delta.
///
/// Deltas of exactly 20, 120 or 180 degrees produce no turn.
pub fn classify_delta(delta: f64) -> Option<TurnKind> {
    let magnitude = delta.abs();

    if delta > 0.0 {
        if magnitude > 20.0 && magnitude < 120.0 {
            Some(TurnKind::Right)
        } else if magnitude > 120.0 && magnitude < 180.0 {
            Some(TurnKind::SharpRight)
        } else if magnitude > 180.0 {
            Some(TurnKind::SharpLeft)
        } else {
            None
        }
    } else if delta < 0.0 {
        if magnitude > 20.0 && magnitude < 120.0 {
            Some(TurnKind::Left)
        } else if (magnitude > 120.0 && magnitude < 180.0) || magnitude > 180.0 {
            Some(TurnKind::SharpLeft)
        } else {
            None
        }
    } else {
        None
    }
}

/// Detect maneuvers along a leg.
///
/// The first segment never yields a maneuver since there is no previous
/// bearing to compare with. Events come out ordered by `step_index`.
pub fn detect_maneuvers(points: &[Point], phrases: &PhraseTable) -> Vec<ManeuverEvent> {
    let mut events = Vec::new();
    let mut bearing_before: Option<f64> = None;

    for (i, segment) in points.windows(2).enumerate() {
        let bearing_after = bearing(&segment[0], &segment[1]);

        if let Some(before) = bearing_before {
            let delta = bearing_after - before;
            if let Some(kind) = classify_delta(delta) {
                log::debug!(
                    "segment {i}: {kind:?} (bearing {before:.1} -> {bearing_after:.1}, delta {delta:.1})"
                );
                events.push(ManeuverEvent {
                    location: segment[0].clone(),
                    kind,
                    instruction: phrases.text(kind),
                    step_index: i,
                    bearing_before: before,
                    bearing_after,
                });
            }
        }

        bearing_before = Some(bearing_after);
    }

    events
}
