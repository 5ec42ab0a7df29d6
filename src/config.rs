//! Runtime configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `BANDCAMP_SCRAPER_*` environment variables.

use crate::headers::DEFAULT_USER_AGENT;
use crate::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "BANDCAMP_SCRAPER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Address the HTTP API listens on.
    pub bind_address: String,
    /// Where fetched cover art is kept between downloads.
    pub art_cache_dir: PathBuf,
    /// Default download directory.
    pub directory: PathBuf,
    /// Default prefix for downloaded files inside playlists.
    pub playlist_song_directory: String,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            art_cache_dir: std::env::temp_dir(),
            directory: PathBuf::from("/tmp"),
            playlist_song_directory: "/music".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScraperConfig {
    /// `$XDG_CONFIG_HOME/bandcamp-link-scraper/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bandcamp-link-scraper").join("config.toml"))
    }

    /// Load configuration. An explicit `path` must exist; the default
    /// location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default(
                "art_cache_dir",
                defaults.art_cache_dir.to_string_lossy().into_owned(),
            )?
            .set_default(
                "directory",
                defaults.directory.to_string_lossy().into_owned(),
            )?
            .set_default("playlist_song_directory", defaults.playlist_song_directory)?
            .set_default("user_agent", defaults.user_agent)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => match Self::default_path() {
                Some(default) => builder.add_source(File::from(default).required(false)),
                None => builder,
            },
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        log::debug!("Loaded configuration: {loaded:?}");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "bind_address = \"127.0.0.1:9000\"").unwrap();
        writeln!(file, "playlist_song_directory = \"/srv/music\"").unwrap();

        let config = ScraperConfig::load(Some(&path)).unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.playlist_song_directory, "/srv/music");
        assert_eq!(config.directory, PathBuf::from("/tmp"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScraperConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(crate::BandcampError::Config(_))));
    }
}
