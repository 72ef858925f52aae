use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER: &str = "http://localhost:3500";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.yml`. Every key is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub server: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Effective settings after layering flags over the file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.yml"))
}

pub fn load_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    if data.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let config: FileConfig =
        serde_yaml::from_str(&data).with_context(|| format!("parsing config file {:?}", path))?;
    Ok(config)
}

pub fn resolve(overrides: Overrides, file: FileConfig) -> Settings {
    Settings {
        server: overrides
            .server
            .or(file.server)
            .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
        log_level: overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        log_file: overrides
            .log_file
            .or(file.log_file)
            .or_else(default_log_path),
    }
}

pub fn load_settings(config_path: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let file = match locate_config(config_path) {
        Some(path) => load_config(&path)?,
        None => FileConfig::default(),
    };
    Ok(resolve(overrides, file))
}

fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("postmgr.log"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "postmgr")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tmp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tmp file");
        file.write_all(contents.as_bytes()).expect("write tmp");
        file
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = load_config(&dir.path().join("nope.yml"))?;
        assert_eq!(config, FileConfig::default());
        Ok(())
    }

    #[test]
    fn reads_partial_yaml() -> Result<()> {
        let file = tmp_file("server: http://posts.local:8080\n");
        let config = load_config(file.path())?;
        assert_eq!(config.server.as_deref(), Some("http://posts.local:8080"));
        assert!(config.log_level.is_none());
        Ok(())
    }

    #[test]
    fn rejects_malformed_yaml() {
        let file = tmp_file("server: [unclosed\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn flags_win_over_file_over_defaults() {
        let file = FileConfig {
            server: Some("http://file:1".into()),
            log_level: Some("debug".into()),
            log_file: Some(PathBuf::from("/tmp/file.log")),
        };
        let settings = resolve(
            Overrides {
                server: Some("http://flag:2".into()),
                ..Overrides::default()
            },
            file,
        );
        assert_eq!(settings.server, "http://flag:2");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/file.log")));

        let settings = resolve(Overrides::default(), FileConfig::default());
        assert_eq!(settings.server, DEFAULT_SERVER);
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn explicit_config_path_is_used() -> Result<()> {
        let file = tmp_file("log_level: warn\n");
        let settings = load_settings(Some(file.path()), Overrides::default())?;
        assert_eq!(settings.log_level, "warn");
        Ok(())
    }
}
