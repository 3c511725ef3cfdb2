//! `sdata annotate` command implementation.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;
use sdata_config::{CliSettings, SubstitutionMode};
use sdata_html::Engine;

use super::{VocabularyArgs, build_engine};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the annotate command.
#[derive(Args)]
pub(crate) struct AnnotateArgs {
    /// HTML files to annotate (default: read from stdin).
    files: Vec<PathBuf>,

    /// Output file, or directory when several files are given (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output semantic: microdata or rdfa (overrides config).
    #[arg(short, long)]
    semantic: Option<String>,

    /// Additional directive attribute suffix, e.g. `md` for `data-md`.
    #[arg(long = "suffix")]
    suffixes: Vec<String>,

    /// Replace the first textual match of each attribute instead of the
    /// occurrence belonging to the element.
    #[arg(long)]
    first_match: bool,

    /// Strip directive attributes without emitting annotations.
    #[arg(long)]
    strip: bool,

    #[command(flatten)]
    vocabulary: VocabularyArgs,
}

impl AnnotateArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            semantic: self.semantic.clone(),
            suffixes: self.suffixes.clone(),
            substitution: self.first_match.then_some(SubstitutionMode::FirstMatch),
            ..CliSettings::default()
        };
        let config = self.vocabulary.load_config(cli_settings)?;

        let mut engine = build_engine(&config)?;
        if self.strip {
            engine.set_enabled(false);
        }

        match self.files.as_slice() {
            [] => {
                let mut html = String::new();
                io::stdin().read_to_string(&mut html)?;
                write_result(&engine.parse(&html), self.output.as_deref())
            }
            [file] => {
                let html = read_file(file)?;
                write_result(&engine.parse(&html), self.output.as_deref())
            }
            files => {
                let out_dir = self.output.as_deref().ok_or_else(|| {
                    CliError::Validation(
                        "Several input files require --output DIR".to_owned(),
                    )
                })?;
                annotate_many(&engine, files, out_dir, &output)
            }
        }
    }
}

/// Annotate `files` in parallel into `out_dir`.
///
/// Every file is attempted; the command fails if any of them failed.
fn annotate_many(
    engine: &Engine,
    files: &[PathBuf],
    out_dir: &Path,
    output: &Output,
) -> Result<(), CliError> {
    check_unique_names(files)?;
    fs::create_dir_all(out_dir).map_err(|source| CliError::File {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let results: Vec<(&PathBuf, Result<PathBuf, CliError>)> = files
        .par_iter()
        .map(|file| (file, annotate_file(engine, file, out_dir)))
        .collect();

    let mut failed = 0usize;
    for (file, result) in &results {
        match result {
            Ok(target) => {
                tracing::info!(source = %file.display(), target = %target.display(), "Annotated");
            }
            Err(err) => {
                failed += 1;
                output.warning(&format!("Failed: {err}"));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Validation(format!(
            "{failed} of {} files failed",
            files.len()
        )));
    }

    output.success(&format!(
        "Annotated {} files into {}",
        files.len(),
        out_dir.display()
    ));
    Ok(())
}

fn annotate_file(engine: &Engine, file: &Path, out_dir: &Path) -> Result<PathBuf, CliError> {
    let html = read_file(file)?;
    let target = out_dir.join(file.file_name().unwrap_or(OsStr::new("index.html")));
    fs::write(&target, engine.parse(&html)).map_err(|source| CliError::File {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// Outputs are named after their input, so two inputs must not share a name.
fn check_unique_names(files: &[PathBuf]) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    for file in files {
        let name = file.file_name().ok_or_else(|| {
            CliError::Validation(format!("Not a file: {}", file.display()))
        })?;
        if !seen.insert(name) {
            return Err(CliError::Validation(format!(
                "Duplicate output name: {}",
                name.to_string_lossy()
            )));
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn write_result(html: &str, target: Option<&Path>) -> Result<(), CliError> {
    match target {
        Some(path) => fs::write(path, html).map_err(|source| CliError::File {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
