use serde::Serialize;
use std::path::{Path, PathBuf};

const WEBAPP_WM_CLASSES: [&str; 3] = ["WebApp", "Chromium", "ICE-SSB"];
const PACKAGED_MARKER: &str = "-nativefier-";

/// A web-app launcher read back from its desktop-entry file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Launcher {
    pub path: PathBuf,
    pub codename: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub exec: Option<String>,
    pub category: Option<String>,
    pub url: String,
    pub is_valid: bool,
}

impl Launcher {
    pub fn load(path: &Path, codename: &str) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, codename, &contents))
    }

    /// Only launchers we (or a compatible tool) made count as valid: they must
    /// be marked as web apps and carry both a name and an icon.
    pub fn parse(path: &Path, codename: &str, contents: &str) -> Self {
        let mut launcher = Launcher {
            path: path.to_path_buf(),
            codename: codename.to_string(),
            ..Default::default()
        };

        let mut is_webapp = false;
        for line in contents.lines().map(str::trim) {
            if line.contains(PACKAGED_MARKER) {
                is_webapp = true;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            match key.trim() {
                "StartupWMClass" if WEBAPP_WM_CLASSES.contains(&value.trim()) => is_webapp = true,
                "Name" => launcher.name = Some(value.to_string()),
                "Icon" => launcher.icon = Some(value.to_string()),
                "Exec" => launcher.exec = Some(value.to_string()),
                "Categories" => {
                    launcher.category = Some(value.replace("GTK;", "").replace(';', ""))
                }
                "X-WebApp-URL" => launcher.url = value.to_string(),
                _ => {}
            }
        }

        launcher.is_valid = is_webapp && launcher.name.is_some() && launcher.icon.is_some();
        launcher
    }
}
