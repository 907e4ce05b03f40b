//! Configuration system for pseudocode.
//!
//! Loads config from:
//! 1. Global: ~/.config/pseudocode/config.toml (or $XDG_CONFIG_HOME)
//! 2. Per-project: .pseudocode/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [translate]
//! from = "python"
//! to = "ib"
//!
//! [render]
//! indent_width = 4
//! output_functions = ["print", "show"]
//! input_functions = ["input"]
//! ```

use pseudocode_syntax::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::commands::translate::{SourceLanguage, TargetLanguage};

/// Default languages for the translate command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub from: Option<SourceLanguage>,
    pub to: Option<TargetLanguage>,
}

/// Rendering knobs. Unset fields fall back to [`RenderOptions::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub indent_width: Option<usize>,
    pub output_functions: Option<Vec<String>>,
    pub input_functions: Option<Vec<String>>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PseudocodeConfig {
    pub translate: TranslateConfig,
    pub render: RenderConfig,
}

impl PseudocodeConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/pseudocode/config.toml,
    /// then merges with per-project config from .pseudocode/config.toml.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    fn load_from(global_path: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global_path.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".pseudocode").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("pseudocode").join("config.toml"))
    }

    /// Load config from a file path. A missing file is silent, a broken one
    /// is logged and skipped.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {err}");
                None
            }
        }
    }

    /// Merge another config into this one, field by field: anything set in
    /// `other` wins.
    fn merge(self, other: Self) -> Self {
        Self {
            translate: TranslateConfig {
                from: other.translate.from.or(self.translate.from),
                to: other.translate.to.or(self.translate.to),
            },
            render: RenderConfig {
                indent_width: other.render.indent_width.or(self.render.indent_width),
                output_functions: other
                    .render
                    .output_functions
                    .or(self.render.output_functions),
                input_functions: other
                    .render
                    .input_functions
                    .or(self.render.input_functions),
            },
        }
    }

    /// Render options with config overrides applied.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            indent_width: self.render.indent_width.unwrap_or(defaults.indent_width),
            output_functions: self
                .render
                .output_functions
                .clone()
                .unwrap_or(defaults.output_functions),
            input_functions: self
                .render
                .input_functions
                .clone()
                .unwrap_or(defaults.input_functions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{content}").unwrap();
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = PseudocodeConfig::load_from(None, dir.path());
        assert!(config.translate.from.is_none());
        assert_eq!(config.render_options(), RenderOptions::default());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".pseudocode").join("config.toml"),
            r#"
[translate]
from = "python"

[render]
indent_width = 2
output_functions = ["print", "show"]
"#,
        );

        let config = PseudocodeConfig::load_from(None, dir.path());
        assert_eq!(config.translate.from, Some(SourceLanguage::Python));
        let options = config.render_options();
        assert_eq!(options.indent_width, 2);
        assert!(options.is_output_function("show"));
        assert_eq!(options.input_functions, vec!["input"]); // default
    }

    #[test]
    fn test_project_overrides_global_per_field() {
        let global = TempDir::new().unwrap();
        let global_path = global.path().join("pseudocode").join("config.toml");
        write_config(
            &global_path,
            r#"
[render]
indent_width = 8
input_functions = ["ask"]
"#,
        );

        let project = TempDir::new().unwrap();
        write_config(
            &project.path().join(".pseudocode").join("config.toml"),
            r#"
[render]
indent_width = 3
"#,
        );

        let options = PseudocodeConfig::load_from(Some(&global_path), project.path())
            .render_options();
        assert_eq!(options.indent_width, 3);
        assert_eq!(options.input_functions, vec!["ask"]);
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".pseudocode").join("config.toml"),
            "[render]\nindent_width = \"wide\"",
        );

        let config = PseudocodeConfig::load_from(None, dir.path());
        assert_eq!(config.render_options().indent_width, 4);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let parsed: Result<PseudocodeConfig, _> = toml::from_str("[translate]\nfrom = \"cobol\"");
        assert!(parsed.is_err());
    }
}
