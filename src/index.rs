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

//! Index translated messages by their cleaned source text.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::catalog::parse_catalog;
use crate::normalize::{clean, CleanOptions};
use crate::unit::TranslationUnit;

/// Options used while indexing catalogs.
#[derive(Clone, Debug, Default)]
pub struct IndexOptions {
    pub clean: CleanOptions,
    /// Swap the roles of `msgid` and `msgstr`. This finds source
    /// strings which were translated to the same text.
    pub invert: bool,
}

/// A translated message together with the file it came from.
#[derive(Debug)]
pub struct Entry {
    /// The cleaned text the entry is indexed under.
    pub source: String,
    /// The cleaned text that is compared between entries.
    pub target: String,
    pub unit: TranslationUnit,
    pub origin: PathBuf,
}

/// The result of indexing a single input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Number of indexed units, or the reason the file was skipped.
    pub result: anyhow::Result<usize>,
}

/// Per-file outcomes of a whole ingestion run.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl IngestSummary {
    /// Number of files which were indexed successfully.
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    /// Paths of the files which could not be indexed.
    pub fn failed(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .map(|outcome| outcome.path.as_path())
    }
}

/// Map from cleaned source text to every entry with that source.
///
/// Keys and the entries under each key keep their insertion order.
#[derive(Debug, Default)]
pub struct TextIndex {
    options: IndexOptions,
    entries: IndexMap<String, Vec<Entry>>,
}

impl TextIndex {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            entries: IndexMap::new(),
        }
    }

    /// Add the translated units from `origin` to the index.
    ///
    /// The header, untranslated units and plural units are skipped.
    /// Returns the number of units added.
    pub fn add_units(
        &mut self,
        origin: &Path,
        units: impl IntoIterator<Item = TranslationUnit>,
    ) -> usize {
        let mut count = 0;
        for unit in units {
            if unit.is_header() || !unit.is_translated() || unit.has_plural() {
                continue;
            }
            let mut source = clean(unit.source(), &self.options.clean);
            let mut target = clean(unit.target(), &self.options.clean);
            if self.options.invert {
                std::mem::swap(&mut source, &mut target);
            }
            self.entries.entry(source.clone()).or_default().push(Entry {
                source,
                target,
                unit,
                origin: origin.to_path_buf(),
            });
            count += 1;
        }
        count
    }

    /// Parse the PO file at `path` and add its units to the index.
    pub fn add_file(&mut self, path: &Path) -> FileOutcome {
        let result = parse_catalog(path).map(|units| self.add_units(path, units));
        FileOutcome {
            path: path.to_path_buf(),
            result,
        }
    }

    /// Add every file in `paths`, in order.
    ///
    /// A file which cannot be parsed is logged and skipped; the
    /// remaining files are still indexed.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for path in paths {
            let outcome = self.add_file(path.as_ref());
            match &outcome.result {
                Ok(count) => {
                    tracing::debug!("Indexed {count} messages from {}", outcome.path.display())
                }
                Err(err) => {
                    tracing::warn!("Error processing input {}: {err:#}", outcome.path.display())
                }
            }
            summary.outcomes.push(outcome);
        }
        summary
    }

    /// Number of distinct cleaned source strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, source: &str) -> Option<&[Entry]> {
        self.entries.get(source).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.entries
            .iter()
            .map(|(source, entries)| (source.as_str(), entries.as_slice()))
    }

    pub fn into_entries(self) -> IndexMap<String, Vec<Entry>> {
        self.entries
    }
}
