pub mod desktop_entry;
pub mod dirs;
pub mod packager;

pub use desktop_entry::Launcher;
pub use dirs::AppDirs;
pub use packager::{LauncherDescriptor, LauncherRequest, Packager};

use rand::Rng;
use std::path::{Path, PathBuf};

const DESCRIPTOR_PREFIX: &str = "webapp-";
const DESCRIPTOR_SUFFIX: &str = ".desktop";

#[derive(thiserror::Error, Debug)]
pub enum LauncherError {
    #[error("io error: {0:?}")]
    Io(#[from] std::io::Error),

    #[error("packaging failed: {0}")]
    Packaging(String),

    #[error("launcher name {0:?} has no letters")]
    InvalidName(String),

    #[error("launcher {0:?} not found")]
    NotFound(String),
}

/// Letters of `name` plus a 4 digit random suffix, so launchers sharing a
/// name don't collide.
pub fn codename(name: &str) -> Result<String, LauncherError> {
    let letters: String = name.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return Err(LauncherError::InvalidName(name.to_string()));
    }

    let mut rng = rand::rng();
    let digits: String = (0..4)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect();

    Ok(format!("{letters}{digits}"))
}

fn descriptor_codename(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(DESCRIPTOR_PREFIX)?
        .strip_suffix(DESCRIPTOR_SUFFIX)
}

pub struct WebAppManager {
    dirs: AppDirs,
}

impl WebAppManager {
    /// Bootstraps the directory layout.
    pub fn new(dirs: AppDirs) -> std::io::Result<Self> {
        dirs.bootstrap()?;
        Ok(Self { dirs })
    }

    pub fn dirs(&self) -> &AppDirs {
        &self.dirs
    }

    /// Valid web-app launchers in the applications directory, by name.
    pub fn list(&self) -> Result<Vec<Launcher>, LauncherError> {
        let mut launchers = Vec::new();

        for entry in std::fs::read_dir(&self.dirs.apps)? {
            let entry = entry?;
            let path = entry.path();
            let file_name = entry.file_name();
            let Some(codename) = file_name.to_str().and_then(descriptor_codename) else {
                continue;
            };
            if path.is_dir() {
                continue;
            }

            match Launcher::load(&path, codename) {
                Ok(launcher) if launcher.is_valid => launchers.push(launcher),
                Ok(_) => log::debug!("{}: not a web app", path.display()),
                Err(err) => log::warn!("could not read launcher {}: {err}", path.display()),
            }
        }

        launchers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.codename.cmp(&b.codename)));
        Ok(launchers)
    }

    pub fn find(&self, codename: &str) -> Result<Launcher, LauncherError> {
        self.list()?
            .into_iter()
            .find(|l| l.codename == codename)
            .ok_or_else(|| LauncherError::NotFound(codename.to_string()))
    }

    fn find_packaged_folder(&self, codename: &str) -> Option<PathBuf> {
        std::fs::read_dir(&self.dirs.packaged_apps)
            .ok()?
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_name().to_string_lossy().starts_with(codename))
            .map(|entry| entry.path())
    }

    /// Remove the packaged app (best effort) and the desktop entry.
    pub fn delete(&self, launcher: &Launcher) -> Result<(), LauncherError> {
        if let Some(folder) = self.find_packaged_folder(&launcher.codename) {
            log::info!("removing {}", folder.display());
            if let Err(err) = std::fs::remove_dir_all(&folder) {
                log::warn!("could not remove {}: {err}", folder.display());
            }
        }

        if launcher.path.exists() {
            std::fs::remove_file(&launcher.path)?;
        }

        Ok(())
    }

    /// Package `request.url` through `packager` and describe the resulting
    /// launcher. Writing the desktop entry is left to the caller.
    pub fn create(
        &self,
        packager: &dyn Packager,
        request: &LauncherRequest,
    ) -> Result<LauncherDescriptor, LauncherError> {
        let codename = codename(&request.name)?;

        // the packaging tool only accepts PNG files, theme icon names are skipped
        let icon = request
            .icon
            .contains(".png")
            .then(|| Path::new(&request.icon));

        let exec = packager
            .package(&codename, &request.url, icon)
            .map_err(|err| LauncherError::Packaging(format!("{err:#}")))?;

        log::info!("packaged {} as {}", request.url, exec.display());

        Ok(LauncherDescriptor {
            path: self
                .dirs
                .apps
                .join(format!("{DESCRIPTOR_PREFIX}{codename}{DESCRIPTOR_SUFFIX}")),
            codename,
            name: request.name.clone(),
            exec,
            icon: request.icon.clone(),
            category: request.category.clone(),
            url: request.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codename_letters_and_digits() {
        let code = codename("My Mail 2!").unwrap();
        assert!(code.starts_with("MyMail"));
        let suffix = &code["MyMail".len()..];
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_codename_needs_letters() {
        assert!(matches!(codename("1234 !"), Err(LauncherError::InvalidName(_))));
    }

    #[test]
    fn test_descriptor_codename() {
        assert_eq!(descriptor_codename("webapp-Mail1234.desktop"), Some("Mail1234"));
        assert_eq!(descriptor_codename("firefox.desktop"), None);
        assert_eq!(descriptor_codename("webapp-Mail1234.png"), None);
    }
}
