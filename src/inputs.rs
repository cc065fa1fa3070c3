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

//! Work out which files to read and where to write the results.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use walkdir::WalkDir;

const PO_EXTENSION: &str = "po";

/// Input and output locations after argument resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

/// Combine `--input`, `--output` and positional arguments.
///
/// Positional arguments fill in whatever was not given explicitly:
/// without `--input` they are inputs, and without `--output` the last
/// one is the output directory.
pub fn resolve_paths(
    mut inputs: Vec<PathBuf>,
    mut output: Option<PathBuf>,
    mut positional: Vec<PathBuf>,
) -> anyhow::Result<ResolvedPaths> {
    if !positional.is_empty() && inputs.is_empty() {
        if output.is_none() {
            let last = positional.split_off(positional.len() - 1);
            inputs = std::mem::replace(&mut positional, last);
        } else {
            inputs = std::mem::take(&mut positional);
        }
    }
    if output.is_none() {
        output = positional.pop();
    }
    let Some(output) = output else {
        bail!("An output directory is required");
    };
    if !positional.is_empty() {
        bail!("Invalid combination of --input, --output and positional arguments");
    }
    if inputs.is_empty() {
        bail!("At least one input is required");
    }
    Ok(ResolvedPaths { inputs, output })
}

/// Make sure `output` is a directory, creating it if needed.
pub fn prepare_output_dir(output: &Path) -> anyhow::Result<()> {
    if output.is_dir() {
        return Ok(());
    }
    if output.exists() {
        bail!("Output {} is not a directory", output.display());
    }
    tracing::warn!(
        "Output directory {} does not exist, creating it",
        output.display()
    );
    fs::create_dir_all(output)
        .with_context(|| format!("Could not create output directory {}", output.display()))
}

/// Expand directories in `inputs` into the PO files below them.
///
/// Files are returned as given, directories are searched recursively
/// in file name order.
pub fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Cannot access path: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_po_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files
}

fn is_po_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PO_EXTENSION)
}
