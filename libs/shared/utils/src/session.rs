use std::fs;
use std::path::PathBuf;

use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::SessionUser;

/// File-backed persistence for the session object. The application
/// bootstrap reads it once and hands the user to every component; views
/// never re-read storage on their own.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.session_path.clone())
    }

    /// Read the persisted session, if any. A missing file is simply "not
    /// logged in", not an error.
    pub fn load(&self) -> Result<Option<SessionUser>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        let user: SessionUser = serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("corrupt session file: {}", e)))?;

        debug!("Loaded session for user {}", user.id);
        Ok(Some(user))
    }

    /// Read the persisted session or fail with the absent-session error.
    /// Callers treat this as fatal for the current view.
    pub fn require(&self) -> Result<SessionUser, AppError> {
        self.load()?.ok_or(AppError::SessionRequired)
    }

    pub fn save(&self, user: &SessionUser) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        let raw = serde_json::to_string_pretty(user)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        fs::write(&self.path, raw)
            .map_err(|e| AppError::Storage(e.to_string()))?;

        debug!("Saved session for user {}", user.id);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}
