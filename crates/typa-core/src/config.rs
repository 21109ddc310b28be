//! Process configuration from the environment
//!
//! Read once on first use:
//!
//! - `TYPA_FONT_PATH`: colon-separated font directories
//! - `TYPA_WIDTH_LIMIT` / `TYPA_HEIGHT_LIMIT`: pixel budgets for text blocks
//! - `TYPA_GHOSTSCRIPT`: PostScript interpreter executable
//!
//! ```bash
//! TYPA_FONT_PATH=/opt/fonts:/usr/share/fonts TYPA_HEIGHT_LIMIT=8192 typa annotate ...
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::traits::ResourceLimits;
use crate::types::ResourceKind;

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub font_dirs: Vec<PathBuf>,
    pub limits: Limits,
    pub ghostscript: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let font_dirs = match std::env::var("TYPA_FONT_PATH") {
            Ok(val) if !val.trim().is_empty() => std::env::split_paths(&val).collect(),
            _ => default_font_dirs(),
        };
        let limits = Limits {
            width: limit_var("TYPA_WIDTH_LIMIT"),
            height: limit_var("TYPA_HEIGHT_LIMIT"),
        };
        let ghostscript = std::env::var_os("TYPA_GHOSTSCRIPT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gs"));
        Config {
            font_dirs,
            limits,
            ghostscript,
        }
    }
}

/// The configuration read from the environment at first use
pub fn global() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let config = Config::from_env();
        log::debug!(
            "Typa config: {} font dir(s), limits {:?}",
            config.font_dirs.len(),
            config.limits
        );
        config
    })
}

pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect();
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }
    dirs
}

fn limit_var(name: &str) -> Option<f64> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse::<f64>() {
        Ok(v) if v > 0.0 => Some(v),
        _ => {
            log::warn!("Ignoring {}={:?}: not a positive number", name, value);
            None
        },
    }
}

/// Width/height budget; `None` is unlimited
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Limits {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Limits {
    pub const fn unlimited() -> Self {
        Limits {
            width: None,
            height: None,
        }
    }

    pub const fn new(width: f64, height: f64) -> Self {
        Limits {
            width: Some(width),
            height: Some(height),
        }
    }
}

impl ResourceLimits for Limits {
    fn try_reserve(&self, kind: ResourceKind, amount: f64) -> bool {
        let limit = match kind {
            ResourceKind::Width => self.width,
            ResourceKind::Height => self.height,
        };
        amount.is_finite() && amount >= 0.0 && limit.map_or(true, |max| amount <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        let limits = Limits::new(100.0, 50.0);
        assert!(limits.try_reserve(ResourceKind::Width, 100.0));
        assert!(!limits.try_reserve(ResourceKind::Width, 100.5));
        assert!(!limits.try_reserve(ResourceKind::Height, 51.0));
        assert!(!limits.try_reserve(ResourceKind::Height, f64::NAN));
        assert!(Limits::unlimited().try_reserve(ResourceKind::Height, 1e12));
    }

    #[test]
    fn test_default_dirs_include_system() {
        assert!(default_font_dirs()
            .iter()
            .any(|d| d == &PathBuf::from("/usr/share/fonts")));
    }
}
