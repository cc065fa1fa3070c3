// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conflict finder for Gettext PO files.
//!
//! This program reads a set of PO files and looks for source strings
//! which have been translated in different ways. The conflicting
//! messages are grouped by their longest word and written to one PO
//! file per group in the output directory, each message annotated
//! with the file it came from.
//!
//! Usage: `poconflicts [OPTIONS] <INPUT>... <OUTPUT-DIR>`

use std::path::PathBuf;

use clap::Parser;
use poconflicts::analyze;
use poconflicts::index::IndexOptions;
use poconflicts::inputs::{discover_inputs, prepare_output_dir, resolve_paths, ResolvedPaths};
use poconflicts::normalize::CleanOptions;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Find conflicting translations in Gettext PO files")]
struct Args {
    /// PO file or directory to read. Can be given several times.
    #[arg(short, long = "input", value_name = "PATH")]
    input: Vec<PathBuf>,
    /// Directory in which to write the conflict files.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Ignore case distinctions.
    #[arg(short = 'I', long)]
    ignore_case: bool,
    /// Invert the conflicts, finding translations which are shared by
    /// different source strings.
    #[arg(short = 'v', long)]
    invert: bool,
    /// Characters to ignore when matching, e.g. `&` or `_`.
    #[arg(long = "accelerator", value_name = "ACCELERATORS", default_value = "")]
    accelerators: String,
    /// Inputs followed by the output directory.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

impl Args {
    fn index_options(&self) -> IndexOptions {
        IndexOptions {
            clean: CleanOptions::new(self.ignore_case, self.accelerators.as_str()),
            invert: self.invert,
        }
    }
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let options = args.index_options();
    let ResolvedPaths { inputs, output } = resolve_paths(args.input, args.output, args.paths)?;
    prepare_output_dir(&output)?;

    let files = discover_inputs(&inputs);
    let analysis = analyze(&files, options);
    let failed = analysis.ingest.failed().count();
    if failed > 0 {
        tracing::warn!("{failed} of {} input files could not be read", files.len());
    }
    println!("{}", analysis.summary());
    analysis.write_to(&output)?;

    Ok(())
}
