// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "DASHBOARD_CONFIG_PATH";

/// Refresh intervals the dashboard offers, in seconds.
pub const ALLOWED_REFRESH_INTERVALS: [u64; 4] = [30, 60, 120, 300];

fn default_cache_ttl_secs() -> u64 {
    60
}
fn default_refresh_interval_secs() -> u64 {
    60
}
fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

/// One RSS feed to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Publisher label shown in the Source column, e.g. "TechCrunch".
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "DashboardConfig::default_feeds")]
    pub feeds: Vec<FeedConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            auto_refresh: false,
            refresh_interval_secs: default_refresh_interval_secs(),
            bind_addr: default_bind_addr(),
            feeds: Self::default_feeds(),
        }
    }
}

impl DashboardConfig {
    /// Built-in seed of AI news feeds, used when no config file is found.
    pub fn default_feeds() -> Vec<FeedConfig> {
        [
            ("TechCrunch", "https://techcrunch.com/category/artificial-intelligence/feed/"),
            ("VentureBeat", "https://venturebeat.com/category/ai/feed/"),
            ("MIT Technology Review", "https://www.technologyreview.com/topic/artificial-intelligence/feed"),
            ("The Verge", "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml"),
        ]
        .into_iter()
        .map(|(name, url)| FeedConfig {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
    }

    /// Load config from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut cfg = parse_config(&content, ext.as_str())?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load config using env var + fallbacks:
    /// 1) $DASHBOARD_CONFIG_PATH
    /// 2) config/dashboard.toml
    /// 3) config/dashboard.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("DASHBOARD_CONFIG_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/dashboard.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/dashboard.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// Clamp out-of-catalog values back to safe defaults instead of failing.
    fn sanitize(&mut self) {
        if !ALLOWED_REFRESH_INTERVALS.contains(&self.refresh_interval_secs) {
            tracing::warn!(
                configured = self.refresh_interval_secs,
                fallback = default_refresh_interval_secs(),
                "refresh interval not in the allowed set, using default"
            );
            self.refresh_interval_secs = default_refresh_interval_secs();
        }
        if self.cache_ttl_secs == 0 {
            self.cache_ttl_secs = default_cache_ttl_secs();
        }
        self.feeds.retain(|f| {
            let keep = !f.name.trim().is_empty() && !f.url.trim().is_empty();
            if !keep {
                tracing::warn!(name = %f.name, url = %f.url, "dropping feed with blank name or url");
            }
            keep
        });
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DashboardConfig> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[feeds]]");
    if try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported dashboard config format"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_both_parse() {
        let toml_src = r#"
            cache_ttl_secs = 30
            auto_refresh = true
            refresh_interval_secs = 120

            [[feeds]]
            name = "TechCrunch"
            url = "https://techcrunch.com/feed/"
        "#;
        let cfg = parse_config(toml_src, "toml").unwrap();
        assert_eq!(cfg.cache_ttl_secs, 30);
        assert!(cfg.auto_refresh);
        assert_eq!(cfg.feeds.len(), 1);

        let json_src = r#"{"refresh_interval_secs": 300, "feeds": []}"#;
        let cfg = parse_config(json_src, "json").unwrap();
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert!(!cfg.auto_refresh);
    }

    #[test]
    fn unknown_interval_falls_back_to_default() {
        let mut cfg = DashboardConfig {
            refresh_interval_secs: 45,
            ..DashboardConfig::default()
        };
        cfg.sanitize();
        assert_eq!(cfg.refresh_interval_secs, 60);
    }

    #[test]
    fn blank_feeds_are_dropped() {
        let mut cfg = DashboardConfig {
            feeds: vec![
                FeedConfig {
                    name: "  ".into(),
                    url: "https://x.test/feed".into(),
                },
                FeedConfig {
                    name: "Ok".into(),
                    url: "https://ok.test/feed".into(),
                },
            ],
            ..DashboardConfig::default()
        };
        cfg.sanitize();
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.feeds[0].name, "Ok");
    }

    #[serial_test::serial]
    #[test]
    fn load_default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD: built-in defaults.
        let cfg = DashboardConfig::load_default().unwrap();
        assert_eq!(cfg.cache_ttl_secs, 60);
        assert!(!cfg.feeds.is_empty());

        // Env var takes precedence.
        let p_json = tmp.path().join("dashboard.json");
        fs::write(&p_json, r#"{"cache_ttl_secs": 15}"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let cfg2 = DashboardConfig::load_default().unwrap();
        assert_eq!(cfg2.cache_ttl_secs, 15);
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
