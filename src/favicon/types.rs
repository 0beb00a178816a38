use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Failures met while searching a site for icons.
///
/// None of these ever reach the caller of [`crate::favicon::discover`];
/// they are logged where they happen and the candidate (or strategy) is dropped.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Timeout, refused connection, DNS failure
    #[error("network error: {0}")]
    Network(String),

    /// Body is not a decodable image, or not the JSON we expected
    #[error("decode error: {0}")]
    Decode(String),

    /// Non-success status, or the tag we looked for is not there
    #[error("not found: {0}")]
    NotFound(String),

    /// Candidate could not be written to its temp file
    #[error("storage error: {0:?}")]
    Storage(#[from] std::io::Error),
}

/// Where a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IconSource {
    #[serde(rename = "Favicon Grabber")]
    FaviconGrabber,
    #[serde(rename = "apple-touch-icon")]
    AppleTouchIcon,
    #[serde(rename = "shortcut icon")]
    ShortcutIcon,
    #[serde(rename = "icon")]
    Icon,
    #[serde(rename = "msapplication-TileImage")]
    TileImage,
    #[serde(rename = "favicon")]
    Favicon,
    #[serde(rename = "og:image")]
    OgImage,
}

impl IconSource {
    /// `<link rel>` patterns searched for on the page, highest priority first.
    pub const LINK_RELS: [IconSource; 4] = [
        IconSource::AppleTouchIcon,
        IconSource::ShortcutIcon,
        IconSource::Icon,
        IconSource::TileImage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IconSource::FaviconGrabber => "Favicon Grabber",
            IconSource::AppleTouchIcon => "apple-touch-icon",
            IconSource::ShortcutIcon => "shortcut icon",
            IconSource::Icon => "icon",
            IconSource::TileImage => "msapplication-TileImage",
            IconSource::Favicon => "favicon",
            IconSource::OgImage => "og:image",
        }
    }
}

impl std::fmt::Display for IconSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A downloaded, decoded image that may become a launcher icon.
///
/// The encoded PNG at `path` belongs to whoever holds this value: call
/// [`CandidateIcon::discard`] once it is no longer wanted.
#[derive(Debug, Clone)]
pub struct CandidateIcon {
    pub source: IconSource,
    pub image: DynamicImage,
    pub path: PathBuf,
}

/// Printable view of a candidate, without pixel data.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub source: IconSource,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
}

impl CandidateIcon {
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            source: self.source,
            width: self.image.width(),
            height: self.image.height(),
            path: self.path.clone(),
        }
    }

    /// Remove the temp file backing this candidate.
    pub fn discard(self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
