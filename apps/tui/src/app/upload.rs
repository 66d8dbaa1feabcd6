use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app::state::App;

/// Extensions accepted for upload, mapped to the declared content
/// type sent with both the grant request and the PUT. There is no
/// magic-byte sniffing; the declared type is all the service checks.
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// A validated file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: &'static str,
    pub size_bytes: u64,
}

impl Selection {
    /// Validates a user-entered path. Non-image extensions are
    /// refused before the filesystem is consulted at all.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let content_type = image_content_type(path)
            .ok_or_else(|| "Please select a valid image file".to_string())?;

        let metadata = std::fs::metadata(path)
            .map_err(|err| format!("Could not read {}: {err}", path.display()))?;
        if !metadata.is_file() {
            return Err(format!("{} is not a file", path.display()));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| "Invalid file name".to_string())?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            content_type,
            size_bytes: metadata.len(),
        })
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

// The upload sequence runs as a small state machine owned by the
// event loop, so a second trigger while a transfer is in flight has
// nowhere valid to go.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UploadPhase {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::InFlight => write!(f, "InFlight"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum UploadEvent {
    Start,
    Finished,
    Failed(String),
    Reset,
}

impl fmt::Display for UploadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Finished => write!(f, "Finished"),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
pub struct UploadTransitionError {
    from: UploadPhase,
    event: UploadEvent,
}

impl fmt::Display for UploadTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for UploadTransitionError {}

pub struct UploadMachine {
    phase: UploadPhase,
}

impl UploadMachine {
    pub const fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
        }
    }

    pub const fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Applies an event, updating both the machine and the app's
    /// upload flags.
    pub fn process_event(
        &mut self,
        event: &UploadEvent,
        app: &mut App,
        now: Instant,
    ) -> Result<(), UploadTransitionError> {
        match (self.phase, event) {
            (UploadPhase::Idle, UploadEvent::Start) => {
                app.upload.uploading = true;
                app.upload.error = None;
                self.phase = UploadPhase::InFlight;
                Ok(())
            }
            (UploadPhase::InFlight, UploadEvent::Finished) => {
                app.apply_upload_success(now);
                self.phase = UploadPhase::Succeeded;
                Ok(())
            }
            (UploadPhase::InFlight, UploadEvent::Failed(message)) => {
                app.apply_upload_failure(message.clone());
                self.phase = UploadPhase::Failed;
                Ok(())
            }
            (UploadPhase::Succeeded | UploadPhase::Failed, UploadEvent::Reset) => {
                self.phase = UploadPhase::Idle;
                Ok(())
            }
            _ => Err(UploadTransitionError {
                from: self.phase,
                event: event.clone(),
            }),
        }
    }
}
