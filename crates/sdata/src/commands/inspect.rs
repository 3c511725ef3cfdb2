//! `sdata inspect` command implementation.

use std::collections::HashSet;

use clap::Args;
use sdata_config::CliSettings;
use sdata_vocab::{ExpectedDisplay, Vocabulary};

use super::{VocabularyArgs, load_vocabulary};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Type name, e.g. `Movie`.
    type_name: String,

    /// Show a single property of the type.
    #[arg(short, long)]
    property: Option<String>,

    #[command(flatten)]
    vocabulary: VocabularyArgs,
}

impl InspectArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.vocabulary.load_config(CliSettings::default())?;
        let vocabulary = load_vocabulary(&config)?;

        let type_name = self.type_name.trim();
        if !vocabulary.is_type_available(type_name) {
            return Err(CliError::Validation(format!(
                "Unknown type '{type_name}'"
            )));
        }

        output.heading(&inheritance_chain(&vocabulary, type_name).join(" > "));

        if let Some(property) = &self.property {
            let row = describe_property(&vocabulary, type_name, property.trim()).ok_or_else(
                || {
                    CliError::Validation(format!(
                        "Property '{}' is not defined for type '{type_name}'",
                        property.trim()
                    ))
                },
            )?;
            output.print(&row.format(&output));
            return Ok(());
        }

        for row in describe_type(&vocabulary, type_name) {
            output.print(&row.format(&output));
        }
        Ok(())
    }
}

/// One property as shown by `inspect`.
#[derive(Debug, PartialEq, Eq)]
struct PropertyRow {
    name: String,
    declared_on: String,
    expected_types: Vec<String>,
    display: ExpectedDisplay,
}

impl PropertyRow {
    fn format(&self, output: &Output) -> String {
        let expected = if self.expected_types.is_empty() {
            "-".to_owned()
        } else {
            self.expected_types.join(" | ")
        };
        format!(
            "  {:<28} {:<32} {:<7} {}",
            self.name,
            expected,
            display_label(self.display),
            output.dimmed(&self.declared_on)
        )
    }
}

fn display_label(display: ExpectedDisplay) -> &'static str {
    match display {
        ExpectedDisplay::Normal => "normal",
        ExpectedDisplay::Nested => "nested",
        ExpectedDisplay::Meta => "meta",
    }
}

fn inheritance_chain<'a>(vocabulary: &'a Vocabulary, type_name: &str) -> Vec<&'a str> {
    vocabulary
        .ancestors(type_name)
        .map(|schema| schema.name.as_str())
        .collect()
}

/// Own and inherited properties, nearest declaration first.
fn describe_type(vocabulary: &Vocabulary, type_name: &str) -> Vec<PropertyRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for schema in vocabulary.ancestors(type_name) {
        for (name, property) in &schema.properties {
            if !seen.insert(name.as_str()) {
                continue;
            }
            rows.push(PropertyRow {
                name: name.clone(),
                declared_on: schema.name.clone(),
                expected_types: property.expected_types.clone(),
                display: ExpectedDisplay::classify(property.primary_type(), name),
            });
        }
    }

    rows
}

fn describe_property(vocabulary: &Vocabulary, type_name: &str, property: &str) -> Option<PropertyRow> {
    let declared_on = vocabulary
        .ancestors(type_name)
        .find(|schema| schema.properties.contains_key(property))?;

    Some(PropertyRow {
        name: property.to_owned(),
        declared_on: declared_on.name.clone(),
        expected_types: vocabulary.expected_types(type_name, property).to_vec(),
        display: vocabulary.expected_display(type_name, property),
    })
}
