use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

pub const CFG_FILE_NAME: &str = "myblog.toml";

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    /// JSON document holding every category, tag, post, comment and sidebar
    pub data_file: PathBuf,
}

fn default_page_size() -> u32 {
    3
}

fn default_cache_enabled() -> bool {
    true
}

fn default_hot_posts_ttl_secs() -> i64 {
    600
}

fn default_sync_interval_secs() -> u64 {
    30
}

#[derive(Deserialize)]
pub struct Defaults {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    #[serde(default = "default_hot_posts_ttl_secs")]
    pub hot_posts_ttl_secs: i64,
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            page_size: default_page_size(),
            cache_enabled: default_cache_enabled(),
            hot_posts_ttl_secs: default_hot_posts_ttl_secs(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: PathBuf,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    let Some(str_path) = path.to_str() else {
        return Ok(path);
    };
    if !str_path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .and_then(|p| p.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable directory is not a valid path"))?;
    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.defaults.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.page_size must be greater than 0"));
    }

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
        data_file: parse_path(cfg.paths.data_file)?,
    };
    if let Some(ref mut log) = cfg.log {
        log.location = parse_path(log.location.clone())?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

/// Looks next to the executable, then in the current directory, then in the user config directory.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|p| p.exists())
}

/// Reads the given config file, or the first one found by [`find_config_path`].
pub fn open_config(cfg_path: Option<PathBuf>) -> io::Result<Config> {
    let config_path = match cfg_path.or_else(find_config_path) {
        Some(path) => path,
        None => return Err(io::Error::new(ErrorKind::NotFound, format!("Could not find {}", CFG_FILE_NAME))),
    };

    read_config(&config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CFG: &str = r##"
[paths]
template_dir = "res/template"
public_dir = "res/public"
data_file = "${exe_dir}/data/blog.json"

[defaults]
page_size = 5
cache_enabled = false
hot_posts_ttl_secs = 60
sync_interval_secs = 10

[server]
address = "127.0.0.1"
port = 8001

[log]
level = "Debug"
log_to_console = true
location = "logs/myblog.log"
"##;

    #[test]
    fn test_full_config() {
        let cfg = parse_config(FULL_CFG).unwrap();
        assert_eq!(cfg.paths.template_dir, PathBuf::from("res/template"));
        assert!(!cfg.paths.data_file.to_str().unwrap().contains("${exe_dir}"));
        assert!(cfg.paths.data_file.ends_with("data/blog.json"));
        assert_eq!(cfg.defaults.page_size, 5);
        assert!(!cfg.defaults.cache_enabled);
        assert_eq!(cfg.defaults.hot_posts_ttl_secs, 60);
        assert_eq!(cfg.defaults.sync_interval_secs, 10);
        assert_eq!(cfg.server.port, 8001);
        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert_eq!(log.location, PathBuf::from("logs/myblog.log"));
    }

    #[test]
    fn test_defaults_when_missing() {
        let cfg = parse_config(r##"
[paths]
template_dir = "t"
public_dir = "p"
data_file = "blog.json"

[server]
address = "0.0.0.0"
port = 80
"##).unwrap();
        assert_eq!(cfg.defaults.page_size, 3);
        assert!(cfg.defaults.cache_enabled);
        assert_eq!(cfg.defaults.hot_posts_ttl_secs, 600);
        assert_eq!(cfg.defaults.sync_interval_secs, 30);
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[paths]\ntemplate_dir = 1").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let err = read_config(Path::new("/does/not/exist/myblog.toml")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_open_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CFG_FILE_NAME);
        fs::write(&path, FULL_CFG).unwrap();
        let cfg = open_config(Some(path)).unwrap();
        assert_eq!(cfg.server.address, "127.0.0.1");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let cfg = FULL_CFG.replace("page_size = 5", "page_size = 0");
        assert!(parse_config(&cfg).is_err());
    }

    #[test]
    fn test_sample_config_parses() {
        let cfg = parse_config(include_str!("../myblog.toml")).unwrap();
        assert_eq!(cfg.defaults.page_size, 3);
        assert_eq!(cfg.defaults.hot_posts_ttl_secs, 600);
    }
}
