//! CLI command implementations.

mod annotate;
mod inspect;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use sdata_config::{CliSettings, Config, SubstitutionMode};
use sdata_html::{Engine, Substitution};
use sdata_vocab::Vocabulary;

use crate::error::CliError;

pub(crate) use annotate::AnnotateArgs;
pub(crate) use inspect::InspectArgs;
pub(crate) use types::TypesArgs;

/// Options shared by every command that needs a vocabulary.
#[derive(Args)]
pub(crate) struct VocabularyArgs {
    /// Vocabulary JSON file (overrides config, default: bundled schema.org subset).
    #[arg(long, env = "SDATA_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover sdata.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl VocabularyArgs {
    /// Load configuration, applying `settings` and the vocabulary override.
    fn load_config(&self, mut settings: CliSettings) -> Result<Config, CliError> {
        settings.vocabulary_path.clone_from(&self.vocabulary);
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Load the configured vocabulary, or the bundled one.
fn load_vocabulary(config: &Config) -> Result<Arc<Vocabulary>, CliError> {
    match &config.vocabulary.path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading vocabulary");
            Ok(Arc::new(Vocabulary::from_path(path)?))
        }
        None => Ok(Vocabulary::bundled()?),
    }
}

/// Build an engine from the loaded configuration.
fn build_engine(config: &Config) -> Result<Engine, CliError> {
    let vocabulary = load_vocabulary(config)?;
    let substitution = match config.engine.substitution {
        SubstitutionMode::Anchored => Substitution::Anchored,
        SubstitutionMode::FirstMatch => Substitution::FirstMatch,
    };

    let mut engine = Engine::new(&config.engine.semantic, vocabulary)?
        .with_substitution(substitution);
    // The configured list replaces the built-in default.
    engine.remove_suffix(sdata_html::DEFAULT_SUFFIX);
    engine.add_suffixes(&config.engine.suffixes);
    engine.set_enabled(config.engine.enabled);

    if engine.suffixes().is_empty() {
        return Err(CliError::Validation(
            "No usable directive suffix configured".to_owned(),
        ));
    }

    Ok(engine)
}
