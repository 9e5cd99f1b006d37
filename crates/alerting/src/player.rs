//! Audio player capability and implementations

use std::io::Cursor;
use std::path::{Path, PathBuf};

use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, Sink, Source};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::AlertError;

/// Fire-and-forget audio output.
///
/// `play` must not block. There is no stop: a clip ends on its own.
pub trait AudioPlayer {
    /// Whether a previously started clip is still audible
    fn is_playing(&self) -> bool;

    /// Start the alert clip
    fn play(&mut self);
}

/// Alert sound configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Sound the alert; false runs with visual alerts only
    pub audio: bool,
    /// Alert sound asset. `None` runs with visual alerts only.
    pub sound_path: Option<PathBuf>,
    /// Abort startup when the sound cannot be loaded instead of
    /// falling back to visual-only alerting
    pub require_sound: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            audio: true,
            sound_path: Some(PathBuf::from("music.wav")),
            require_sound: false,
        }
    }
}

impl AlertConfig {
    /// Reject combinations that cannot be honoured
    pub fn validate(&self) -> Result<(), AlertError> {
        if self.require_sound && (!self.audio || self.sound_path.is_none()) {
            return Err(AlertError::Config(
                "require_sound needs audio enabled and a sound_path".into(),
            ));
        }
        Ok(())
    }
}

type Clip = Buffered<Decoder<Cursor<Vec<u8>>>>;

/// Decode the asset once; every `play` appends a copy of the samples.
fn decode_clip(path: &Path) -> Result<Clip, AlertError> {
    let asset_error = |reason: String| AlertError::AssetLoad {
        path: path.display().to_string(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| asset_error(e.to_string()))?;
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| asset_error(e.to_string()))?;
    Ok(decoder.buffered())
}

/// Plays the alert clip decoded at startup on the default output device.
pub struct ClipPlayer {
    path: PathBuf,
    clip: Clip,
    sink: Sink,
    // Dropping the stream silences the sink
    _stream: OutputStream,
}

impl ClipPlayer {
    /// Decode the clip and open the output device
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AlertError> {
        let path = path.as_ref();
        let clip = decode_clip(path)?;

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AlertError::Output(format!("failed to open output stream: {}", e)))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| AlertError::Output(format!("failed to create sink: {}", e)))?;

        info!(
            "Loaded alert sound {} ({} Hz, {} channel(s))",
            path.display(),
            clip.sample_rate(),
            clip.channels()
        );
        Ok(Self {
            path: path.to_path_buf(),
            clip,
            sink,
            _stream: stream,
        })
    }

    /// Asset location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioPlayer for ClipPlayer {
    fn is_playing(&self) -> bool {
        !self.sink.empty()
    }

    fn play(&mut self) {
        self.sink.append(self.clip.clone());
    }
}

/// Visual-only alerting: never sounds.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn is_playing(&self) -> bool {
        false
    }

    fn play(&mut self) {
        debug!("Alert raised with audio disabled");
    }
}

/// Build the player described by `config`.
///
/// An undecodable asset or a missing output device is fatal only when
/// `require_sound` is set; otherwise the monitor degrades to visual-only
/// alerting.
pub fn open_player(config: &AlertConfig) -> Result<Box<dyn AudioPlayer>, AlertError> {
    config.validate()?;

    let path = match &config.sound_path {
        Some(path) if config.audio => path,
        _ => {
            info!("Alert sound disabled, using visual alerts only");
            return Ok(Box::new(SilentPlayer));
        }
    };

    match ClipPlayer::load(path) {
        Ok(player) => Ok(Box::new(player)),
        Err(e) if config.require_sound => Err(e),
        Err(e) => {
            warn!("{}; falling back to visual alerts only", e);
            Ok(Box::new(SilentPlayer))
        }
    }
}
