//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServicesConfig
// ---------------------------------------------------------------------------

/// Connection settings for the transcription / generation collaborators.
///
/// All endpoints hang off one `base_url` (the deployment serves them as
/// sibling routes under `/api/…`); nothing is hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the API host, without a trailing slash.
    pub base_url: String,
    /// API key — `None` when the host requires no authentication.
    pub api_key: Option<String>,
    /// Transcription model identifier sent with each audio upload.
    pub transcription_model: String,
    /// Maximum seconds to wait for a service response before timing out.
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            api_key: None,
            transcription_model: "whisper-1".into(),
            timeout_secs: 60,
        }
    }
}

impl ServicesConfig {
    /// Endpoint accepting a multipart audio upload, returning a transcript.
    pub fn transcribe_url(&self) -> String {
        format!("{}/api/transcribe", self.base_url)
    }

    /// Endpoint accepting `{prompt}` JSON, returning a streamed text body.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Endpoint accepting `{prompt}` JSON, returning `{questions}`.
    pub fn questions_url(&self) -> String {
        format!("{}/api/generate-llama", self.base_url)
    }

    /// Endpoint accepting a multipart resume upload, returning `{feedback}`.
    pub fn resume_url(&self) -> String {
        format!("{}/api/upload-resume", self.base_url)
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for answer capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds the candidate has per answer; the countdown stops capture
    /// automatically when it expires.
    pub answer_secs: u32,
    /// Size of each media chunk delivered by the file-backed source, in bytes.
    pub chunk_bytes: usize,
    /// Path to the media file streamed by the file-backed source.
    ///
    /// `None` means the binary cannot run an interview — the engine itself
    /// accepts any [`crate::capture::MediaSource`].
    pub media_file: Option<std::path::PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            answer_secs: 150,
            chunk_bytes: 64 * 1024,
            media_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// TranscodeConfig
// ---------------------------------------------------------------------------

/// Settings for the external audio-extraction step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodeConfig {
    /// Explicit path to the `ffmpeg` binary; `None` means resolve via `PATH`.
    pub ffmpeg_path: Option<std::path::PathBuf>,
    /// Directory for intermediate clip/audio files; `None` means the system
    /// temp directory.
    pub work_dir: Option<std::path::PathBuf>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use interview_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collaborator endpoints and credentials.
    pub services: ServicesConfig,
    /// Answer-capture settings.
    pub capture: CaptureConfig,
    /// Audio-extraction settings.
    pub transcode: TranscodeConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
