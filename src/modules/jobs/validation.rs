use std::fmt;
use std::path::Path;

pub const MEDIA_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "webp", "mp4", "mov", "avi", "mkv", "webm",
];
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "m4a", "aac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Media,
    Audio,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Media => write!(f, "media"),
            FileKind::Audio => write!(f, "audio"),
        }
    }
}

/// Filename rejected because its extension is missing or not accepted.
/// Carries the observed extension for the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFormat {
    pub kind: FileKind,
    pub extension: Option<String>,
}

impl fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allowed = match self.kind {
            FileKind::Media => MEDIA_EXTENSIONS.join(", "),
            FileKind::Audio => AUDIO_EXTENSIONS.join(", "),
        };
        match &self.extension {
            Some(ext) => write!(
                f,
                "invalid {} format: .{} (allowed: {})",
                self.kind, ext, allowed
            ),
            None => write!(
                f,
                "invalid {} format: missing extension (allowed: {})",
                self.kind, allowed
            ),
        }
    }
}

impl std::error::Error for InvalidFormat {}

pub fn validate_media(filename: &str) -> Result<(), InvalidFormat> {
    validate(filename, FileKind::Media, &MEDIA_EXTENSIONS)
}

pub fn validate_audio(filename: &str) -> Result<(), InvalidFormat> {
    validate(filename, FileKind::Audio, &AUDIO_EXTENSIONS)
}

fn validate(filename: &str, kind: FileKind, allowed: &[&str]) -> Result<(), InvalidFormat> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match &extension {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(InvalidFormat { kind, extension }),
    }
}
