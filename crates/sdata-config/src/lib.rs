//! Configuration management for sdata.
//!
//! Parses `sdata.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [engine]
//! semantic = "rdfa"
//! suffixes = ["sd", "md"]
//! enabled = true
//! substitution = "anchored"
//!
//! [vocabulary]
//! path = "${SCHEMA_DIR:-schema}/types.json"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `engine.semantic` and `vocabulary.path` support `${VAR}` and
//! `${VAR:-default}`. `vocabulary.path` additionally expands a leading `~`
//! and is resolved relative to the config file's directory.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "sdata.toml";

/// Semantic names accepted in `engine.semantic`.
const SEMANTICS: [&str; 2] = ["microdata", "rdfa"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output semantic.
    pub semantic: Option<String>,
    /// Extra suffixes appended to the configured ones.
    pub suffixes: Vec<String>,
    /// Override vocabulary file.
    pub vocabulary_path: Option<PathBuf>,
    /// Override substitution mode.
    pub substitution: Option<SubstitutionMode>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine configuration.
    pub engine: EngineConfig,
    /// Vocabulary source.
    pub vocabulary: VocabularyConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `microdata` or `rdfa`.
    pub semantic: String,
    /// Directive attribute suffixes (`data-<suffix>`).
    pub suffixes: Vec<String>,
    /// Whether annotations are emitted.
    pub enabled: bool,
    /// How directive attributes are located in the source.
    pub substitution: SubstitutionMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            semantic: "microdata".to_owned(),
            suffixes: vec!["sd".to_owned()],
            enabled: true,
            substitution: SubstitutionMode::default(),
        }
    }
}

/// Substitution mode as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstitutionMode {
    /// `anchored`
    #[default]
    Anchored,
    /// `first-match`
    FirstMatch,
}

/// Vocabulary configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// External vocabulary JSON file. `None` selects the bundled vocabulary.
    pub path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`vocabulary.path`").
        field: String,
        /// Error message (e.g., "${`SCHEMA_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sdata.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so they take precedence over
    /// config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(semantic) = &settings.semantic {
            self.engine.semantic.clone_from(semantic);
        }
        for suffix in &settings.suffixes {
            if !self.engine.suffixes.contains(suffix) {
                self.engine.suffixes.push(suffix.clone());
            }
        }
        if let Some(path) = &settings.vocabulary_path {
            self.vocabulary.path = Some(path.clone());
        }
        if let Some(substitution) = settings.substitution {
            self.engine.substitution = substitution;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Normalizes `engine.semantic` to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an unknown semantic or an empty
    /// suffix list.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let semantic = self.engine.semantic.trim().to_lowercase();
        if !SEMANTICS.contains(&semantic.as_str()) {
            return Err(ConfigError::Validation(format!(
                "engine.semantic must be one of {}, got '{}'",
                SEMANTICS.join(", "),
                self.engine.semantic
            )));
        }
        self.engine.semantic = semantic;

        if self.engine.suffixes.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "engine.suffixes must contain at least one suffix".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.engine.semantic = expand::expand_env(&self.engine.semantic, "engine.semantic")?;

        if let Some(path) = &self.vocabulary.path {
            let raw = path.to_string_lossy();
            self.vocabulary.path = Some(PathBuf::from(expand::expand_path(
                &raw,
                "vocabulary.path",
            )?));
        }

        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(path) = &self.vocabulary.path
            && path.is_relative()
        {
            self.vocabulary.path = Some(config_dir.join(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.semantic, "microdata");
        assert_eq!(config.engine.suffixes, vec!["sd".to_owned()]);
        assert!(config.engine.enabled);
        assert_eq!(config.engine.substitution, SubstitutionMode::Anchored);
        assert!(config.vocabulary.path.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine.semantic, "microdata");
        assert!(config.engine.enabled);
    }

    #[test]
    fn test_parse_engine_config() {
        let toml = r#"
[engine]
semantic = "rdfa"
suffixes = ["sd", "md"]
enabled = false
substitution = "first-match"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.semantic, "rdfa");
        assert_eq!(
            config.engine.suffixes,
            vec!["sd".to_owned(), "md".to_owned()]
        );
        assert!(!config.engine.enabled);
        assert_eq!(config.engine.substitution, SubstitutionMode::FirstMatch);
    }

    #[test]
    fn test_parse_unknown_substitution() {
        let toml = r#"
[engine]
substitution = "everywhere"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_validate_normalizes_semantic() {
        let mut config = Config::default();
        config.engine.semantic = " RDFa ".to_owned();
        config.validate().unwrap();
        assert_eq!(config.engine.semantic, "rdfa");
    }

    #[test]
    fn test_validate_unknown_semantic() {
        let mut config = Config::default();
        config.engine.semantic = "json-ld".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("engine.semantic"));
        assert!(err.to_string().contains("json-ld"));
    }

    #[test]
    fn test_validate_empty_suffixes() {
        let mut config = Config::default();
        config.engine.suffixes = vec![" ".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine.suffixes"));
    }

    #[test]
    fn test_resolve_relative_vocabulary_path() {
        let toml = r#"
[vocabulary]
path = "schema/types.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.vocabulary.path,
            Some(PathBuf::from("/project/schema/types.json"))
        );
    }

    #[test]
    fn test_resolve_absolute_vocabulary_path() {
        let toml = r#"
[vocabulary]
path = "/opt/types.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.vocabulary.path, Some(PathBuf::from("/opt/types.json")));
    }

    #[test]
    fn test_expand_vocabulary_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SDATA_TEST_SCHEMA", "/schemas");
        }
        let toml = r#"
[vocabulary]
path = "${SDATA_TEST_SCHEMA}/types.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(
            config.vocabulary.path,
            Some(PathBuf::from("/schemas/types.json"))
        );
        unsafe {
            std::env::remove_var("SDATA_TEST_SCHEMA");
        }
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SDATA_TEST_MISSING");
        }
        let toml = r#"
[engine]
semantic = "${SDATA_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("engine.semantic"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let settings = CliSettings {
            semantic: Some("rdfa".to_owned()),
            suffixes: vec!["sd".to_owned(), "md".to_owned()],
            vocabulary_path: Some(PathBuf::from("/custom/types.json")),
            substitution: Some(SubstitutionMode::FirstMatch),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.engine.semantic, "rdfa");
        assert_eq!(
            config.engine.suffixes,
            vec!["sd".to_owned(), "md".to_owned()]
        );
        assert_eq!(
            config.vocabulary.path,
            Some(PathBuf::from("/custom/types.json"))
        );
        assert_eq!(config.engine.substitution, SubstitutionMode::FirstMatch);
        assert!(config.engine.enabled); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.engine.semantic, "microdata");
        assert_eq!(config.engine.suffixes, vec!["sd".to_owned()]);
        assert!(config.vocabulary.path.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
[engine]
semantic = "RDFA"

[vocabulary]
path = "types.json"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.engine.semantic, "rdfa");
        assert_eq!(config.vocabulary.path, Some(dir.path().join("types.json")));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[engine]\nsemantic = \"rdfa\"\n").unwrap();

        let settings = CliSettings {
            semantic: Some("Microdata".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.engine.semantic, "microdata");
    }

    #[test]
    fn test_load_cli_invalid_semantic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        let settings = CliSettings {
            semantic: Some("owl".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/sdata.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[engine\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
