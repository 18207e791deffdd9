use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "site")]
    pub site_url: Option<String>,
    #[serde(alias = "prefixes")]
    pub api_prefixes: Option<Vec<String>>,
    pub route: Option<String>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub header: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub error_mode: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".recipe-feed").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# recipe-feed config
#
# Location (default):
#   ~/.recipe-feed/config.yml

# WordPress site serving the recipe posts
site_url: https://postmanoil.com

# Path prefixes tried in order; each is tried with and then without _embed
api_prefixes:
  - ""
  - /blog

# Listing route whose `page` query parameter selects the page
route: /recipes

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080
# header: "Authorization: Basic ..."

# Output (optional)
# output: ./recipes.html
# output_format: html

# What to show when every endpoint fails: fallback | surface
error_mode: fallback

no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_back() {
        let cfg = parse_config(&default_config_yaml(), Path::new("default")).unwrap();
        assert_eq!(cfg.site_url.as_deref(), Some("https://postmanoil.com"));
        assert_eq!(
            cfg.api_prefixes,
            Some(vec!["".to_string(), "/blog".to_string()])
        );
        assert_eq!(cfg.error_mode.as_deref(), Some("fallback"));
        assert_eq!(cfg.timeout, Some(10));
        assert!(cfg.proxy.is_none());
    }

    #[test]
    fn aliases_are_accepted() {
        let yaml = "site: https://example.com\nprefixes: [/news]\n";
        let cfg = parse_config(yaml, Path::new("x")).unwrap();
        assert_eq!(cfg.site_url.as_deref(), Some("https://example.com"));
        assert_eq!(cfg.api_prefixes, Some(vec!["/news".to_string()]));
    }

    #[test]
    fn missing_file_is_allowed_only_when_requested() {
        let path = Path::new("/nonexistent/recipe-feed/config.yml");
        assert!(load_config(path, true).is_ok());
        assert!(load_config(path, false).unwrap_err().contains("not found"));
    }

    #[test]
    fn ensure_default_config_writes_once() {
        let dir = env::temp_dir().join(format!("recipe-feed-cfg-{}", std::process::id()));
        let path = dir.join("config.yml");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        assert!(load_config(&path, false).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("./cfg.yml"), PathBuf::from("./cfg.yml"));
    }
}
