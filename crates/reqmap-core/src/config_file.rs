use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::RequirementKey;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub input: Option<InputConfig>,
    pub output: Option<OutputConfig>,
    pub display: Option<DisplayConfig>,
    pub patterns: Option<PatternsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Input files to look for, in priority order.
    pub candidates: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use the Unicode bidi algorithm for display repair (default: true).
    pub bidi: Option<bool>,
}

/// Extra cue regexes appended to the built-in ones, per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsConfig {
    pub gas_usage: Option<Vec<String>>,
    pub meat_service: Option<Vec<String>>,
    pub seating: Option<Vec<String>>,
}

impl PatternsConfig {
    /// Extra cues configured for `key`, empty if none.
    pub fn cues_for(&self, key: RequirementKey) -> &[String] {
        let cues = match key {
            RequirementKey::GasUsage => &self.gas_usage,
            RequirementKey::MeatService => &self.meat_service,
            RequirementKey::Seating => &self.seating,
        };
        cues.as_deref().unwrap_or(&[])
    }
}

/// Platform config directory path: `<config_dir>/reqmap/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reqmap").join("config.toml"))
}

/// Load config by cascading CWD `.reqmap.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".reqmap.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        input: Some(InputConfig {
            candidates: overlay
                .input
                .as_ref()
                .and_then(|i| i.candidates.clone())
                .or_else(|| base.input.as_ref().and_then(|i| i.candidates.clone())),
        }),
        output: Some(OutputConfig {
            path: overlay
                .output
                .as_ref()
                .and_then(|o| o.path.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.path.clone())),
        }),
        display: Some(DisplayConfig {
            bidi: overlay
                .display
                .as_ref()
                .and_then(|d| d.bidi)
                .or_else(|| base.display.as_ref().and_then(|d| d.bidi)),
        }),
        patterns: Some(PatternsConfig {
            gas_usage: overlay
                .patterns
                .as_ref()
                .and_then(|p| p.gas_usage.clone())
                .or_else(|| base.patterns.as_ref().and_then(|p| p.gas_usage.clone())),
            meat_service: overlay
                .patterns
                .as_ref()
                .and_then(|p| p.meat_service.clone())
                .or_else(|| base.patterns.as_ref().and_then(|p| p.meat_service.clone())),
            seating: overlay
                .patterns
                .as_ref()
                .and_then(|p| p.seating.clone())
                .or_else(|| base.patterns.as_ref().and_then(|p| p.seating.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_round_trip_toml() {
        let config = ConfigFile {
            output: Some(OutputConfig {
                path: Some("/tmp/processed.json".to_string()),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.output.unwrap().path.unwrap(), "/tmp/processed.json");
    }

    #[test]
    fn partial_config_parses() {
        let toml_str = "[display]\nbidi = false\n\n[patterns]\nseating = [\"כיסאות\"]\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.display.unwrap().bidi, Some(false));
        let patterns = parsed.patterns.unwrap();
        assert_eq!(patterns.cues_for(RequirementKey::Seating), ["כיסאות"]);
        assert!(patterns.cues_for(RequirementKey::GasUsage).is_empty());
        assert!(parsed.input.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            output: Some(OutputConfig {
                path: Some("base.json".to_string()),
            }),
            display: Some(DisplayConfig { bidi: Some(true) }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            output: Some(OutputConfig {
                path: Some("overlay.json".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.output.unwrap().path.unwrap(), "overlay.json");
        assert_eq!(merged.display.unwrap().bidi, Some(true));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            input: Some(InputConfig {
                candidates: Some(vec!["a.pdf".into(), "a.docx".into()]),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.input.unwrap().candidates.unwrap(),
            vec!["a.pdf".to_string(), "a.docx".to_string()]
        );
    }

    #[test]
    fn load_from_missing_path_is_none() {
        assert!(load_from_path(Path::new("/nonexistent/reqmap/config.toml")).is_none());
    }
}
