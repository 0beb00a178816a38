use serde::Serialize;
use std::path::{Path, PathBuf};

/// External tool that wraps a URL into a standalone executable.
pub trait Packager {
    /// Package `url` under `codename`, optionally with a PNG icon, and return
    /// the path of the produced executable.
    fn package(&self, codename: &str, url: &str, icon: Option<&Path>) -> anyhow::Result<PathBuf>;
}

/// Fields of the desktop entry describing a freshly packaged launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherDescriptor {
    /// Where the desktop entry belongs
    pub path: PathBuf,
    pub codename: String,
    pub name: String,
    pub exec: PathBuf,
    pub icon: String,
    pub category: String,
    pub url: String,
}

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct LauncherRequest {
    pub name: String,
    pub url: String,
    /// Icon file path or theme icon name
    pub icon: String,
    pub category: String,
}
