use std::{fs, io, path::PathBuf};

use directories_next::ProjectDirs;
use eyre::WrapErr;

/// Keeps the bearer token between two invocations.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/huddle/session`
    pub fn default_location() -> eyre::Result<Self> {
        let proj_dirs = ProjectDirs::from("", "", "huddle")
            .ok_or_else(|| eyre::eyre!("Project directories could not be found."))?;
        Ok(Self::new(proj_dirs.data_dir().join("session")))
    }

    pub fn load(&self) -> eyre::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).wrap_err_with(|| format!("couldn't read {}", self.path.display())),
        }
    }

    pub fn save(&self, token: &str) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
            .wrap_err_with(|| format!("couldn't write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub fn clear(&self) -> eyre::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).wrap_err_with(|| format!("couldn't remove {}", self.path.display())),
        }
    }
}
