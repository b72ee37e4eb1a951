//! Configuration types for the lip-sync controller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Heuristic text-duration clock settings.
    pub clock: ClockConfig,
    /// Audio-locked word highlight settings.
    pub highlight: HighlightConfig,
    /// Session controller settings (delays, practice threshold).
    pub session: SessionConfig,
    /// Voice parameters forwarded to the synthesis service.
    pub voice: VoiceConfig,
}

/// Estimated-duration clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Speaking rate used to estimate utterance length.
    ///
    /// At the default of 120 a single word is expected to last 500ms.
    pub words_per_minute: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 120.0,
        }
    }
}

/// Word highlighter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Lead time added to the audio position before computing the word index.
    ///
    /// Compensates for render lag so the highlight lands when the word is heard.
    pub lead_ms: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { lead_ms: 200 }
    }
}

impl HighlightConfig {
    /// Lead time as a [`Duration`].
    pub fn lead(&self) -> Duration {
        Duration::from_millis(self.lead_ms)
    }
}

/// Playback session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of plays after which the one-time celebration fires.
    pub practice_threshold: u32,
    /// Delay between `stop()` and the follow-up `play()` in `restart()`.
    pub restart_delay_ms: u64,
    /// Delay between a natural completion and the next looped `play()`.
    pub loop_delay_ms: u64,
    /// Initial playback-rate multiplier.
    pub playback_rate: f64,
    /// Frame interval for the frame loop driver (16ms ~ 60fps).
    pub frame_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            practice_threshold: 3,
            restart_delay_ms: 100,
            loop_delay_ms: 500,
            playback_rate: 1.0,
            frame_interval_ms: 16,
        }
    }
}

impl SessionConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Voice settings passed through to the speech-synthesis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Voice identifier understood by the synthesis service.
    pub voice_id: String,
    /// Emotion / style hint.
    pub emotion: String,
    /// BCP-47 language tag.
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice_id: "default".to_owned(),
            emotion: "neutral".to_owned(),
            language: "en-US".to_owned(),
        }
    }
}

impl LipSyncConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::LipSyncError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LipSyncError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path`, or from [`default_config_path`](Self::default_config_path)
    /// when `None`. A missing default file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or if an
    /// explicitly given path does not exist.
    pub fn load_or_default(path: Option<&std::path::Path>) -> crate::error::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Returns the default config file path: `~/.config/mouthsync/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("mouthsync").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("mouthsync")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/mouthsync-config/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LipSyncConfig::default();
        assert!(config.clock.words_per_minute > 0.0);
        assert_eq!(config.highlight.lead_ms, 200);
        assert_eq!(config.session.practice_threshold, 3);
        assert!(config.session.playback_rate > 0.0);
        assert!(config.session.frame_interval() > Duration::ZERO);
        assert!(!config.voice.voice_id.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LipSyncConfig::default();
        config.clock.words_per_minute = 90.0;
        config.highlight.lead_ms = 150;
        config.voice.language = "en-GB".to_string();

        config.save_to_file(&path).unwrap();
        assert!(path.exists());

        let loaded = LipSyncConfig::from_file(&path).unwrap();
        assert!((loaded.clock.words_per_minute - 90.0).abs() < f64::EPSILON);
        assert_eq!(loaded.highlight.lead_ms, 150);
        assert_eq!(loaded.voice.language, "en-GB");
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = LipSyncConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(crate::error::LipSyncError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = LipSyncConfig::from_file(&path);
        assert!(matches!(result, Err(crate::error::LipSyncError::Config(_))));
    }

    #[test]
    fn partial_section_uses_defaults() {
        let config: LipSyncConfig = toml::from_str("[session]\nloop_delay_ms = 50").unwrap();
        assert_eq!(config.session.loop_delay_ms, 50);
        assert_eq!(config.session.restart_delay_ms, 100);
        assert_eq!(config.highlight.lead_ms, 200);
    }

    #[test]
    fn load_or_default_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[highlight]\nlead_ms = 80").unwrap();

        let loaded = LipSyncConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded.highlight.lead_ms, 80);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            LipSyncConfig::load_or_default(Some(&missing)),
            Err(crate::error::LipSyncError::Io(_))
        ));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = LipSyncConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
