use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Phrase spoken when a trigger asks for speech with empty text.
pub const DEFAULT_PHRASE: &str = "再生します。";

/// Default pause between two plays of the randomized mode, in milliseconds.
pub const DEFAULT_RANDOM_DELAY_MILLISECONDS: u64 = 500;

/// Playback behaviour shared by every mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Pause between the end of one randomized play and the next pick.
    pub random_delay_ms: u64,
    /// Directory that relative clip sources are resolved against. The current
    /// working directory is used when absent.
    pub sounds_dir: Option<PathBuf>,
    /// Output volume for clips, in range [0.0, 1.0].
    pub volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            random_delay_ms: DEFAULT_RANDOM_DELAY_MILLISECONDS,
            sounds_dir: None,
            volume: 1.0,
        }
    }
}

/// Configuration of the external speech synthesizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Synthesizer program. Speech is unsupported when unset.
    pub program: Option<String>,
    /// Arguments placed before the text to speak.
    pub args: Vec<String>,
    /// Phrase used when the requested text is empty.
    pub default_phrase: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: Some("espeak-ng".to_string()),
            args: vec!["-v".to_string(), "ja".to_string()],
            default_phrase: DEFAULT_PHRASE.to_string(),
        }
    }
}

/// Configuration for selecting the audio output device.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioDeviceConfig {
    /// Name of the preferred output device. The host default is used when
    /// absent or not found.
    pub selected_device_name: Option<String>,
}

/// Description of a single trigger on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Unique identifier of the trigger.
    pub id: String,
    /// Title; also the source of the derived label.
    pub title: String,
    /// Visible label. Derived from the title when empty.
    pub label: String,
    /// Static clip source.
    pub src: Option<String>,
    /// Comma-delimited list of candidate clip sources.
    pub src_list: Option<String>,
    /// Text spoken when no clip source is available.
    pub phrase: Option<String>,
}

/// A named, ordered group of triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub id: String,
    pub title: String,
    pub triggers: Vec<TriggerConfig>,
}

/// Layout of the board. Omitted categories fall back to the default ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub categories: Vec<CategoryConfig>,
    /// Triggers that do not belong to any category.
    pub triggers: Vec<TriggerConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let category = |id: &str, title: &str| CategoryConfig {
            id: id.to_string(),
            title: title.to_string(),
            triggers: Vec::new(),
        };
        Self {
            categories: vec![
                category("outrage-category", "Outrage"),
                category("beyond-category", "Beyond"),
                category("final-category", "Final"),
            ],
            triggers: Vec::new(),
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub speech: SpeechConfig,
    pub audio_device_config: AudioDeviceConfig,
    pub board: BoardConfig,
}
