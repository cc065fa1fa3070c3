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

//! Find conflicting translations in Gettext PO files.
//!
//! A conflict is a source string (`msgid`) which has been translated
//! in more than one way, either across several PO files or within a
//! single one. Conflicts are grouped into clusters by the longest word
//! of their source string and every cluster is written to its own PO
//! file, so that a translator can review related messages together
//! and settle on one translation.
//!
//! The pipeline is:
//!
//! 1. [`index::TextIndex`] reads the catalogs and groups the translated
//!    messages by their [cleaned](normalize::clean) source text.
//! 2. [`conflicts::build_conflict_map`] keeps the sources with more
//!    than one distinct translation.
//! 3. [`conflicts::reduce`] groups the conflicts into clusters.
//! 4. [`conflicts::write_clusters`] writes one PO file per cluster.

pub mod catalog;
pub mod conflicts;
pub mod index;
pub mod inputs;
pub mod normalize;
pub mod unit;

use std::path::{Path, PathBuf};

use conflicts::{build_conflict_map, reduce, summary_line, write_clusters, ConflictMap};
use index::{IndexOptions, IngestSummary, TextIndex};

/// The conflicts found in a set of PO files, not yet written out.
#[derive(Debug)]
pub struct Analysis {
    /// Per-file results of reading the inputs.
    pub ingest: IngestSummary,
    pub conflicts: ConflictMap,
}

impl Analysis {
    /// The one-line summary printed after a run.
    pub fn summary(&self) -> String {
        self.conflicts.summary()
    }

    /// Write one PO file per cluster into `output_dir`, which must exist.
    pub fn write_to(self, output_dir: &Path) -> anyhow::Result<Report> {
        let conflicts = self.conflicts.len();
        let total_strings = self.conflicts.total_strings();
        let written = write_clusters(reduce(self.conflicts), output_dir)?;
        Ok(Report {
            ingest: self.ingest,
            conflicts,
            total_strings,
            written,
        })
    }
}

/// The outcome of a complete run.
#[derive(Debug)]
pub struct Report {
    /// Per-file results of reading the inputs.
    pub ingest: IngestSummary,
    /// Number of source strings with conflicting translations.
    pub conflicts: usize,
    /// Number of distinct source strings seen.
    pub total_strings: usize,
    /// The PO files written, one per cluster.
    pub written: Vec<PathBuf>,
}

impl Report {
    pub fn summary(&self) -> String {
        summary_line(self.conflicts, self.total_strings)
    }
}

/// Read the PO files in `files` and find the conflicting translations.
///
/// Files which cannot be parsed are reported in [`Analysis::ingest`]
/// and otherwise ignored.
pub fn analyze<P: AsRef<Path>>(files: &[P], options: IndexOptions) -> Analysis {
    let mut index = TextIndex::new(options);
    let ingest = index.add_files(files);
    Analysis {
        ingest,
        conflicts: build_conflict_map(index),
    }
}

/// Read the PO files in `files` and write the conflicts found into
/// `output_dir`, which must exist.
pub fn find_conflicts<P: AsRef<Path>>(
    files: &[P],
    output_dir: &Path,
    options: IndexOptions,
) -> anyhow::Result<Report> {
    analyze(files, options).write_to(output_dir)
}
