//! Environment → music parameter mapping.
//!
//! The mapping is a static 5×5 table indexed by [`TimeOfDay`] and
//! [`WeatherCondition`], plus a few small adjustments keyed on [`WorkType`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::environment::{TimeOfDay, UnknownVariant, WeatherCondition};

/// Kind of work the listener is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    #[default]
    Focus,
    Creative,
    Relaxed,
    Energetic,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [
        Self::Focus,
        Self::Creative,
        Self::Relaxed,
        Self::Energetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Creative => "creative",
            Self::Relaxed => "relaxed",
            Self::Energetic => "energetic",
        }
    }

    /// Display name used in track titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Focus => "Focus Session",
            Self::Creative => "Creative Flow",
            Self::Relaxed => "Relaxation Time",
            Self::Energetic => "Energy Boost",
        }
    }

    fn base_bpm(self) -> i32 {
        match self {
            Self::Focus => 85,
            Self::Creative => 95,
            Self::Relaxed => 72,
            Self::Energetic => 108,
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "work type",
                value: s.to_owned(),
            })
    }
}

/// Energy level of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Energy {
    VeryLow,
    Low,
    Medium,
    MediumHigh,
    High,
}

impl Energy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of the static mood table.
struct MoodProfile {
    mood: &'static str,
    instruments: &'static [&'static str],
    bpm_range: (u16, u16),
    keys: &'static [&'static str],
    energy: Energy,
    description: &'static str,
}

const fn profile(
    mood: &'static str,
    instruments: &'static [&'static str],
    bpm_range: (u16, u16),
    keys: &'static [&'static str],
    energy: Energy,
    description: &'static str,
) -> MoodProfile {
    MoodProfile {
        mood,
        instruments,
        bpm_range,
        keys,
        energy,
        description,
    }
}

// Rows follow `TimeOfDay::ALL`, columns follow `WeatherCondition::ALL`.
static MOOD_TABLE: [[MoodProfile; 5]; 5] = [
    // morning
    [
        profile(
            "uplifting",
            &["piano", "acoustic_guitar", "strings"],
            (90, 120),
            &["C", "G", "D"],
            Energy::MediumHigh,
            "Bright and energizing morning music with sunny disposition",
        ),
        profile(
            "gentle",
            &["acoustic_guitar", "piano", "soft_strings"],
            (75, 100),
            &["Am", "Dm", "Em"],
            Energy::Medium,
            "Soft and soothing morning ambient music",
        ),
        profile(
            "calm",
            &["piano", "ambient_pads", "light_percussion"],
            (60, 85),
            &["Dm", "Am", "Gm"],
            Energy::Low,
            "Peaceful rainy morning ambiance with gentle melodies",
        ),
        profile(
            "serene",
            &["strings", "piano", "bells"],
            (55, 80),
            &["F", "Bb", "Eb"],
            Energy::Low,
            "Warm and cozy snowy morning atmosphere",
        ),
        profile(
            "neutral",
            &["piano", "strings"],
            (70, 95),
            &["C", "Am"],
            Energy::Medium,
            "Balanced morning background music",
        ),
    ],
    // late_morning
    [
        profile(
            "focused",
            &["electronic", "piano", "light_percussion"],
            (100, 130),
            &["C", "D", "G"],
            Energy::High,
            "Productive and energetic work music for sunny late morning",
        ),
        profile(
            "concentrated",
            &["piano", "minimal_electronics", "strings"],
            (90, 110),
            &["Am", "Dm"],
            Energy::MediumHigh,
            "Focused ambient music for cloudy productivity",
        ),
        profile(
            "contemplative",
            &["lo-fi", "piano", "rain_sounds"],
            (70, 95),
            &["Dm", "Gm", "Cm"],
            Energy::Medium,
            "Calm lo-fi beats with rain ambiance for concentration",
        ),
        profile(
            "introspective",
            &["classical", "strings", "woodwinds"],
            (65, 90),
            &["F", "Bb"],
            Energy::Medium,
            "Classical ambiance for snowy contemplation",
        ),
        profile(
            "steady",
            &["piano", "ambient"],
            (80, 105),
            &["C", "G"],
            Energy::Medium,
            "Steady focus music for late morning work",
        ),
    ],
    // afternoon
    [
        profile(
            "energetic",
            &["upbeat_electronics", "synth", "drums"],
            (110, 140),
            &["C", "D", "A"],
            Energy::High,
            "High-energy afternoon boost with sunny vibes",
        ),
        profile(
            "balanced",
            &["acoustic", "light_electronics", "piano"],
            (95, 115),
            &["G", "Am", "Dm"],
            Energy::MediumHigh,
            "Balanced afternoon work ambiance",
        ),
        profile(
            "meditative",
            &["ambient", "soft_piano", "rain_textures"],
            (60, 85),
            &["Dm", "Am", "Em"],
            Energy::Low,
            "Meditative rainy afternoon soundscape",
        ),
        profile(
            "minimal",
            &["minimal_piano", "strings", "ambient"],
            (55, 80),
            &["Eb", "Ab", "Db"],
            Energy::Low,
            "Minimal ambient music for snowy afternoon",
        ),
        profile(
            "neutral",
            &["piano", "ambient"],
            (85, 110),
            &["C", "G", "D"],
            Energy::Medium,
            "Neutral afternoon background music",
        ),
    ],
    // evening
    [
        profile(
            "relaxed",
            &["acoustic_guitar", "piano", "soft_synth"],
            (75, 100),
            &["G", "C", "D"],
            Energy::Medium,
            "Relaxing evening wind-down music",
        ),
        profile(
            "calm",
            &["piano", "strings", "ambient_pads"],
            (65, 90),
            &["Am", "Dm", "Em"],
            Energy::Low,
            "Calm cloudy evening atmosphere",
        ),
        profile(
            "peaceful",
            &["jazz", "piano", "double_bass", "rain"],
            (60, 85),
            &["Dm", "Gm", "Cm"],
            Energy::Low,
            "Peaceful rainy evening jazz ambiance",
        ),
        profile(
            "cozy",
            &["warm_strings", "piano", "soft_woodwinds"],
            (55, 75),
            &["F", "Bb", "Eb"],
            Energy::Low,
            "Cozy snowy evening warmth",
        ),
        profile(
            "mellow",
            &["piano", "acoustic"],
            (70, 95),
            &["C", "G", "Am"],
            Energy::Medium,
            "Mellow evening background music",
        ),
    ],
    // night
    [
        profile(
            "ambient",
            &["ambient_pads", "soft_synth", "minimal_piano"],
            (50, 70),
            &["Am", "Dm", "Em"],
            Energy::VeryLow,
            "Ambient nighttime soundscape",
        ),
        profile(
            "dreamy",
            &["drone", "ambient", "soft_textures"],
            (45, 65),
            &["Dm", "Gm"],
            Energy::VeryLow,
            "Dreamy cloudy night ambiance",
        ),
        profile(
            "soothing",
            &["rain_sounds", "distant_piano", "ambient"],
            (40, 60),
            &["Dm", "Am"],
            Energy::VeryLow,
            "Soothing rain sounds for nighttime",
        ),
        profile(
            "tranquil",
            &["minimal_ambient", "soft_bells", "silence"],
            (35, 55),
            &["F", "Bb"],
            Energy::VeryLow,
            "Tranquil snowy night silence",
        ),
        profile(
            "quiet",
            &["ambient", "minimal"],
            (45, 65),
            &["Am", "Dm"],
            Energy::VeryLow,
            "Quiet nighttime ambient music",
        ),
    ],
];

fn lookup(time: TimeOfDay, weather: WeatherCondition) -> &'static MoodProfile {
    let row = TimeOfDay::ALL.iter().position(|t| *t == time).unwrap_or(0);
    let col = WeatherCondition::ALL
        .iter()
        .position(|w| *w == weather)
        .unwrap_or(4);
    &MOOD_TABLE[row][col]
}

/// Music parameters for a (time of day, weather) pair.
///
/// Serialized with camelCase keys; stored alongside each generated track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicParameters {
    pub mood: String,
    pub instruments: Vec<String>,
    /// Inclusive `[min, max]` BPM.
    pub bpm_range: [u16; 2],
    pub keys: Vec<String>,
    pub energy: Energy,
    pub description: String,
}

impl MusicParameters {
    /// Text prompt for the audio-generation model.
    pub fn prompt(&self) -> String {
        format!(
            "Create {mood} background music for productivity and focus. {description}.\n\
             Instruments: {instruments}.\n\
             Tempo: {lo}-{hi} BPM.\n\
             Key: {keys}.\n\
             Energy level: {energy}.\n\
             Style: Instrumental, ambient, seamless loop, no lyrics, suitable for work and concentration.",
            mood = self.mood,
            description = self.description,
            instruments = self.instruments.join(", "),
            lo = self.bpm_range[0],
            hi = self.bpm_range[1],
            keys = self.keys.join(" or "),
            energy = self.energy,
        )
    }

    /// The key recorded on a generated track: first candidate of the cell.
    pub fn primary_key(&self) -> &str {
        self.keys.first().map(String::as_str).unwrap_or("C")
    }
}

/// Look up the music parameters for a time band and weather bucket.
pub fn music_parameters(time: TimeOfDay, weather: WeatherCondition) -> MusicParameters {
    let p = lookup(time, weather);
    MusicParameters {
        mood: p.mood.to_owned(),
        instruments: p.instruments.iter().map(|s| (*s).to_owned()).collect(),
        bpm_range: [p.bpm_range.0, p.bpm_range.1],
        keys: p.keys.iter().map(|s| (*s).to_owned()).collect(),
        energy: p.energy,
        description: p.description.to_owned(),
    }
}

pub const MIN_BPM: u16 = 60;
pub const MAX_BPM: u16 = 130;

/// Estimate a tempo from work type, time band and weather, clamped to 60–130.
pub fn contextual_bpm(work: WorkType, time: TimeOfDay, weather: WeatherCondition) -> u16 {
    let time_mod = match time {
        TimeOfDay::Morning => 5,
        TimeOfDay::LateMorning | TimeOfDay::Afternoon => 8,
        TimeOfDay::Evening => -5,
        TimeOfDay::Night => -10,
    };
    let weather_mod = match weather {
        WeatherCondition::Clear => 8,
        WeatherCondition::Clouds | WeatherCondition::Other => 0,
        WeatherCondition::Rain => -12,
        WeatherCondition::Snow => -8,
    };
    let bpm = (work.base_bpm() + time_mod + weather_mod).clamp(MIN_BPM as i32, MAX_BPM as i32);
    bpm as u16
}

pub const MODEL_INSTRUMENTAL: &str = "mureka/instrumental-generator";
pub const MODEL_LYRIA: &str = "fal-ai/lyria2";
pub const MODEL_V3_TTS: &str = "elevenlabs/v3-tts";
pub const MODEL_MINIMAX: &str = "fal-ai/minimax-music/v2";

/// Pick the generation model for a request.
pub fn select_model(work: WorkType, weather: WeatherCondition) -> &'static str {
    match work {
        WorkType::Focus if weather == WeatherCondition::Rain => MODEL_LYRIA,
        WorkType::Focus => MODEL_INSTRUMENTAL,
        WorkType::Creative => MODEL_V3_TTS,
        WorkType::Relaxed => MODEL_LYRIA,
        WorkType::Energetic => MODEL_MINIMAX,
    }
}

pub fn genre_for_model(model: &str) -> &'static str {
    match model {
        MODEL_INSTRUMENTAL => "Instrumental",
        MODEL_LYRIA => "Ambient",
        MODEL_V3_TTS => "Contemporary",
        MODEL_MINIMAX => "Electronic",
        _ => "Background Music",
    }
}

/// Title such as `"🌅☀️ Focus Session - Morning BGM"`.
pub fn contextual_title(work: WorkType, time: TimeOfDay, weather: WeatherCondition) -> String {
    format!(
        "{}{} {} - {} BGM",
        time.emoji(),
        weather.emoji(),
        work.display_name(),
        time.label()
    )
}
