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

//! Detect conflicting translations and group them into clusters.
//!
//! A source string is in conflict when it has been translated in more
//! than one way. Conflicts are then grouped by the longest word of
//! their source, so that e.g. "Open file" and "Open files..." end up
//! in the same cluster, and each cluster is written to its own PO
//! file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::catalog::write_catalog;
use crate::index::{Entry, TextIndex};
use crate::normalize::flatten;

/// Marker used in the comment recording where a unit came from.
pub const PROVENANCE_MARKER: &str = "(poconflicts)";

/// Source strings with more than one distinct translation.
#[derive(Debug, Default)]
pub struct ConflictMap {
    conflicts: IndexMap<String, Vec<Entry>>,
    total_strings: usize,
}

/// Find the conflicting entries in `index`.
///
/// Sources are keyed by their flattened text. A source which flattens
/// to a single character or less is never a conflict.
pub fn build_conflict_map(index: TextIndex) -> ConflictMap {
    let total_strings = index.len();
    let mut conflicts = IndexMap::<String, Vec<Entry>>::new();
    for (source, entries) in index.into_entries() {
        let flat_source = flatten(&source, ' ');
        if flat_source.chars().count() <= 1 || entries.len() <= 1 {
            continue;
        }
        let targets = entries
            .iter()
            .map(|entry| entry.target.as_str())
            .collect::<HashSet<_>>();
        if targets.len() > 1 {
            conflicts.entry(flat_source).or_default().extend(entries);
        }
    }
    ConflictMap {
        conflicts,
        total_strings,
    }
}

impl ConflictMap {
    /// Number of conflicting source strings.
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of distinct source strings that were examined.
    pub fn total_strings(&self) -> usize {
        self.total_strings
    }

    pub fn get(&self, source: &str) -> Option<&[Entry]> {
        self.conflicts.get(source).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.conflicts.keys().map(String::as_str)
    }

    /// Total number of entries across all conflicts.
    pub fn entry_count(&self) -> usize {
        self.conflicts.values().map(Vec::len).sum()
    }

    /// The one-line report printed after a run.
    pub fn summary(&self) -> String {
        summary_line(self.len(), self.total_strings)
    }
}

/// Format the report line for `conflicts` out of `total_strings`.
pub fn summary_line(conflicts: usize, total_strings: usize) -> String {
    format!("{conflicts}/{total_strings} different strings have conflicts")
}

/// Return the longest word of `source`.
///
/// When several words are equally long, the last of them is used.
pub fn cluster_key(source: &str) -> Option<&str> {
    source.split_whitespace().max_by_key(|word| word.chars().count())
}

/// Conflicts grouped by cluster key.
#[derive(Debug, Default)]
pub struct ReducedMap {
    clusters: IndexMap<String, Vec<Entry>>,
}

/// Group the conflicts by their cluster key and fold plurals.
pub fn reduce(conflicts: ConflictMap) -> ReducedMap {
    let mut reduced = ReducedMap::default();
    for (source, entries) in conflicts.conflicts {
        let Some(key) = cluster_key(&source) else {
            continue;
        };
        reduced.insert(key, entries);
    }
    reduced.fold_plurals();
    reduced
}

impl ReducedMap {
    /// Append `entries` to the cluster `key`.
    pub fn insert(&mut self, key: &str, entries: Vec<Entry>) {
        match self.clusters.get_mut(key) {
            Some(cluster) => cluster.extend(entries),
            None => {
                self.clusters.insert(String::from(key), entries);
            }
        }
    }

    /// Merge the cluster `word + "s"` into the cluster `word`.
    ///
    /// Only the pairs present before folding are considered, and a
    /// word which has itself been folded away is not folded again.
    pub fn fold_plurals(&mut self) {
        let pairs = self
            .clusters
            .keys()
            .filter_map(|word| {
                let plural = format!("{word}s");
                self.clusters
                    .contains_key(&plural)
                    .then(|| (word.clone(), plural))
            })
            .collect::<Vec<_>>();
        for (word, plural) in pairs {
            if !self.clusters.contains_key(&word) {
                continue;
            }
            if let Some(entries) = self.clusters.shift_remove(&plural) {
                self.insert(&word, entries);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[Entry]> {
        self.clusters.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    /// Total number of entries across all clusters.
    pub fn entry_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    /// Split the map into clusters, in insertion order.
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
            .into_iter()
            .map(|(key, entries)| Cluster { key, entries })
            .collect()
    }
}

/// A group of conflicting entries sharing a cluster key.
#[derive(Debug)]
pub struct Cluster {
    pub key: String,
    pub entries: Vec<Entry>,
}

impl Cluster {
    /// File name, without extension, for this cluster.
    pub fn file_stem(&self) -> String {
        flatten(&self.key, '-').to_lowercase()
    }
}

/// Write one PO file per cluster into `output_dir`.
///
/// Each unit gets a comment naming the file it was read from. Clusters
/// whose file names coincide are written to the same file. Returns the
/// paths written, in order.
pub fn write_clusters(reduced: ReducedMap, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = IndexMap::<String, Vec<Entry>>::new();
    for cluster in reduced.into_clusters() {
        files
            .entry(cluster.file_stem())
            .or_default()
            .extend(cluster.entries);
    }

    let mut written = Vec::with_capacity(files.len());
    for (stem, mut entries) in files {
        for entry in &mut entries {
            let comment = format!("{PROVENANCE_MARKER} {}", entry.origin.display());
            entry.unit.add_comment(comment);
        }
        let path = output_dir.join(format!("{stem}.po"));
        write_catalog(&path, entries.iter().map(|entry| &entry.unit))?;
        tracing::info!("Wrote {} messages to {}", entries.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexOptions;
    use crate::normalize::CleanOptions;
    use crate::unit::TranslationUnit;
    use pretty_assertions::assert_eq;

    fn index(files: &[(&str, &[(&str, &str)])]) -> TextIndex {
        index_with(IndexOptions::default(), files)
    }

    fn index_with(options: IndexOptions, files: &[(&str, &[(&str, &str)])]) -> TextIndex {
        let mut index = TextIndex::new(options);
        for (origin, translations) in files {
            let units = translations
                .iter()
                .map(|(msgid, msgstr)| TranslationUnit::singular(msgid, msgstr));
            index.add_units(Path::new(origin), units);
        }
        index
    }

    fn entry(source: &str, target: &str) -> Entry {
        Entry {
            source: String::from(source),
            target: String::from(target),
            unit: TranslationUnit::singular(source, target),
            origin: PathBuf::from("x.po"),
        }
    }

    fn targets(entries: Option<&[Entry]>) -> Vec<&str> {
        entries
            .unwrap_or_default()
            .iter()
            .map(|entry| entry.target.as_str())
            .collect()
    }

    #[test]
    fn test_conflict_between_files() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[("Open", "Abrir"), ("Close", "Cerrar")]),
            ("b.po", &[("Open", "Abra"), ("Close", "Cerrar")]),
        ]));
        assert_eq!(conflicts.keys().collect::<Vec<_>>(), vec!["Open"]);
        assert_eq!(targets(conflicts.get("Open")), vec!["Abrir", "Abra"]);
        assert_eq!(conflicts.summary(), "1/2 different strings have conflicts");
    }

    #[test]
    fn test_conflict_within_file() {
        let conflicts = build_conflict_map(index(&[(
            "a.po",
            &[("Open", "Abrir"), ("  Open", "Abra")],
        )]));
        assert_eq!(targets(conflicts.get("Open")), vec!["Abrir", "Abra"]);
    }

    #[test]
    fn test_identical_translations_are_not_conflicts() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[("Open", "Abrir")]),
            ("b.po", &[("Open", "Abrir")]),
            ("c.po", &[("Save", "Guardar")]),
        ]));
        assert!(conflicts.is_empty());
        assert_eq!(conflicts.total_strings(), 2);
    }

    #[test]
    fn test_short_sources_are_not_conflicts() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[(":", ";"), ("A", "Un"), ("...", "…")]),
            ("b.po", &[(":", "："), ("A", "Una"), ("...", "...")]),
        ]));
        assert!(conflicts.is_empty());
        assert_eq!(conflicts.summary(), "0/3 different strings have conflicts");
    }

    #[test]
    fn test_conflict_key_is_flattened() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[("Save as...", "Guardar como...")]),
            ("b.po", &[("Save as...", "Guardar como…")]),
        ]));
        assert_eq!(conflicts.keys().collect::<Vec<_>>(), vec!["Save as"]);
    }

    #[test]
    fn test_flattened_collisions_keep_all_entries() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[("Save as...", "Guardar como"), ("Save as", "Guardar")]),
            ("b.po", &[("Save as...", "Salvar como"), ("Save as", "Salvar")]),
        ]));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts.entry_count(), 4);
    }

    #[test]
    fn test_ignore_case() {
        let files: &[(&str, &[(&str, &str)])] = &[
            ("a.po", &[("Open", "Abrir")]),
            ("b.po", &[("Open", "abrir")]),
        ];
        assert_eq!(build_conflict_map(index(files)).len(), 1);
        let options = IndexOptions {
            clean: CleanOptions::new(true, ""),
            invert: false,
        };
        assert!(build_conflict_map(index_with(options, files)).is_empty());
    }

    #[test]
    fn test_accelerators() {
        let files: &[(&str, &[(&str, &str)])] = &[
            ("a.po", &[("&Open", "&Abrir")]),
            ("b.po", &[("Open", "_Abrir")]),
        ];
        let options = IndexOptions {
            clean: CleanOptions::new(false, "&_"),
            invert: false,
        };
        assert!(build_conflict_map(index_with(options, files)).is_empty());
    }

    #[test]
    fn test_invert_matches_swapped_catalogs() {
        let options = IndexOptions {
            invert: true,
            ..IndexOptions::default()
        };
        let inverted = build_conflict_map(index_with(
            options,
            &[
                ("a.po", &[("Open", "Abrir"), ("Close", "Cerrar")]),
                ("b.po", &[("Unlock", "Abrir")]),
            ],
        ));
        let swapped = build_conflict_map(index(&[
            ("a.po", &[("Abrir", "Open"), ("Cerrar", "Close")]),
            ("b.po", &[("Abrir", "Unlock")]),
        ]));
        assert_eq!(
            inverted.keys().collect::<Vec<_>>(),
            swapped.keys().collect::<Vec<_>>()
        );
        assert_eq!(targets(inverted.get("Abrir")), targets(swapped.get("Abrir")));
        assert_eq!(inverted.summary(), swapped.summary());
    }

    #[test]
    fn test_cluster_key() {
        assert_eq!(cluster_key("Open it now"), Some("Open"));
        assert_eq!(cluster_key("Open the file"), Some("file"));
        assert_eq!(cluster_key("Save document now"), Some("document"));
        assert_eq!(cluster_key("word"), Some("word"));
        assert_eq!(cluster_key(""), None);
    }

    #[test]
    fn test_cluster_key_counts_characters() {
        assert_eq!(cluster_key("über ab"), Some("über"));
        assert_eq!(cluster_key("ab ñ"), Some("ab"));
    }

    #[test]
    fn test_reduce_merges_sources_with_same_key() {
        let conflicts = build_conflict_map(index(&[
            ("a.po", &[("Open it", "Ábrelo"), ("Open", "Abrir")]),
            ("b.po", &[("Open it", "Abrelo"), ("Open", "Abra")]),
        ]));
        let reduced = reduce(conflicts);
        assert_eq!(reduced.keys().collect::<Vec<_>>(), vec!["Open"]);
        assert_eq!(
            targets(reduced.get("Open")),
            vec!["Ábrelo", "Abrelo", "Abrir", "Abra"]
        );
    }

    #[test]
    fn test_reduce_keeps_every_entry() {
        let conflicts = build_conflict_map(index(&[
            (
                "a.po",
                &[("Open file", "Abrir archivo"), ("Close", "Cerrar"), ("file", "archivo")],
            ),
            (
                "b.po",
                &[("Open file", "Abrir fichero"), ("Close", "Cierra"), ("files", "ficheros")],
            ),
            ("c.po", &[("file", "fichero"), ("files", "archivos")]),
        ]));
        let conflict_entries = conflicts.entry_count();
        let reduced = reduce(conflicts);
        assert_eq!(reduced.entry_count(), conflict_entries);
    }

    #[test]
    fn test_fold_plurals() {
        let mut reduced = ReducedMap::default();
        reduced.insert("file", vec![entry("file", "archivo"), entry("file", "fichero")]);
        reduced.insert("open", vec![entry("open", "abrir")]);
        reduced.insert("files", vec![entry("files", "archivos")]);
        reduced.fold_plurals();
        assert_eq!(reduced.keys().collect::<Vec<_>>(), vec!["file", "open"]);
        assert_eq!(
            targets(reduced.get("file")),
            vec!["archivo", "fichero", "archivos"]
        );
    }

    #[test]
    fn test_fold_plurals_does_not_chain() {
        let mut reduced = ReducedMap::default();
        reduced.insert("bus", vec![entry("bus", "autobús")]);
        reduced.insert("buss", vec![entry("buss", "bus")]);
        reduced.insert("busss", vec![entry("busss", "buses")]);
        reduced.fold_plurals();
        assert_eq!(reduced.keys().collect::<Vec<_>>(), vec!["bus", "busss"]);
        assert_eq!(targets(reduced.get("bus")), vec!["autobús", "bus"]);
        assert_eq!(targets(reduced.get("busss")), vec!["buses"]);
    }

    #[test]
    fn test_fold_plurals_ignores_other_forms() {
        let mut reduced = ReducedMap::default();
        reduced.insert("box", vec![entry("box", "caja")]);
        reduced.insert("boxes", vec![entry("boxes", "cajas")]);
        reduced.fold_plurals();
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn test_file_stem() {
        let cluster = Cluster {
            key: String::from("Open"),
            entries: Vec::new(),
        };
        assert_eq!(cluster.file_stem(), "open");
    }

    #[test]
    fn test_write_clusters() {
        let tmpdir = tempfile::tempdir().unwrap();
        let reduced = reduce(build_conflict_map(index(&[
            ("po/a.po", &[("Open", "Abrir")]),
            ("po/b.po", &[("Open", "Abra")]),
        ])));
        let written = write_clusters(reduced, tmpdir.path()).unwrap();
        assert_eq!(written, vec![tmpdir.path().join("open.po")]);

        let contents = std::fs::read_to_string(&written[0]).unwrap();
        let (_, body) = contents.split_once("\n\n").unwrap();
        assert_eq!(
            body,
            "# (poconflicts) po/a.po\n\
             msgid \"Open\"\n\
             msgstr \"Abrir\"\n\
             \n\
             # (poconflicts) po/b.po\n\
             msgid \"Open\"\n\
             msgstr \"Abra\"\n"
        );
    }

    #[test]
    fn test_write_clusters_merges_same_file_name() {
        let tmpdir = tempfile::tempdir().unwrap();
        let reduced = reduce(build_conflict_map(index(&[
            ("a.po", &[("Open", "Abrir"), ("open", "abrir")]),
            ("b.po", &[("Open", "Abra"), ("open", "abra")]),
        ])));
        assert_eq!(reduced.len(), 2);
        let written = write_clusters(reduced, tmpdir.path()).unwrap();
        assert_eq!(written, vec![tmpdir.path().join("open.po")]);
        let contents = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(contents.matches("# (poconflicts) ").count(), 4);
    }
}
