//! `sdata types` command implementation.

use clap::Args;
use sdata_config::CliSettings;
use sdata_vocab::Vocabulary;

use super::{VocabularyArgs, load_vocabulary};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the types command.
#[derive(Args)]
pub(crate) struct TypesArgs {
    /// Only list types that extend this one (directly or not).
    #[arg(long)]
    extends: Option<String>,

    #[command(flatten)]
    vocabulary: VocabularyArgs,
}

impl TypesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.vocabulary.load_config(CliSettings::default())?;
        let vocabulary = load_vocabulary(&config)?;

        let listed = list_types(&vocabulary, self.extends.as_deref());
        for (name, parent) in &listed {
            match parent {
                Some(parent) => output.print(&format!("{name:<32} {}", output.dimmed(parent))),
                None => output.print(name),
            }
        }

        if listed.is_empty() {
            output.warning("No matching types");
        }
        Ok(())
    }
}

/// Type names with their parent, in name order.
fn list_types<'a>(
    vocabulary: &'a Vocabulary,
    extends: Option<&str>,
) -> Vec<(&'a str, Option<&'a str>)> {
    vocabulary
        .types()
        .values()
        .filter(|schema| {
            extends.is_none_or(|base| {
                schema.name != base
                    && vocabulary
                        .ancestors(&schema.name)
                        .any(|ancestor| ancestor.name == base)
            })
        })
        .map(|schema| (schema.name.as_str(), schema.extends.as_deref()))
        .collect()
}
