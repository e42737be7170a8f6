use std::path::{Path, PathBuf};

/// Represents the configuration settings for the application.
pub struct Configuration {
    state_path: PathBuf,
    port: u16,
    assets_dir: PathBuf,
}

impl Configuration {
    /// Returns the path the session state is persisted at.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Returns the port the static responder listens on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the directory holding `index.html` and `index.js`.
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            state_path: PathBuf::from("wgconf.json"),
            port: 8080,
            assets_dir: PathBuf::from("assets"),
        }
    }
}
