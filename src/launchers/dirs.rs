use anyhow::Context;
use homedir::my_home;
use std::path::{Path, PathBuf};

/// Filesystem layout shared with other web-app launcher tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub ice: PathBuf,
    pub apps: PathBuf,
    pub profiles: PathBuf,
    pub firefox_profiles: PathBuf,
    pub firefox_flatpak_profiles: PathBuf,
    pub epiphany_profiles: PathBuf,
    pub falkon_profiles: PathBuf,
    pub icons: PathBuf,
    /// Output directory of the packaging tool
    pub packaged_apps: PathBuf,
}

impl AppDirs {
    pub fn from_home(home: &Path) -> Self {
        let ice = home.join(".local/share/ice");
        Self {
            apps: home.join(".local/share/applications"),
            profiles: ice.join("profiles"),
            firefox_profiles: ice.join("firefox"),
            firefox_flatpak_profiles: home.join(".var/app/org.mozilla.firefox/data/ice/firefox"),
            epiphany_profiles: ice.join("epiphany"),
            falkon_profiles: ice.join("falkon"),
            icons: ice.join("icons"),
            packaged_apps: home.join(".webapp-manager"),
            ice,
        }
    }

    pub fn discover() -> anyhow::Result<Self> {
        let home = my_home()
            .context("couldnt find home dir")?
            .context("couldnt find home dir")?;
        Ok(Self::from_home(&home))
    }

    /// Create every directory we own if missing. The packaged-apps directory is
    /// left to the packaging tool.
    pub fn bootstrap(&self) -> std::io::Result<()> {
        for dir in [
            &self.ice,
            &self.apps,
            &self.profiles,
            &self.firefox_profiles,
            &self.firefox_flatpak_profiles,
            &self.icons,
            &self.epiphany_profiles,
            &self.falkon_profiles,
        ] {
            if !dir.exists() {
                log::debug!("creating {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}
