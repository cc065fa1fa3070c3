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

//! Reading and writing PO files.
//!
//! Parsing is done by `polib`. Writing is done here since a
//! [`polib::catalog::Catalog`] keeps at most one message per `msgid`,
//! whereas a conflict file holds the same `msgid` once per input file.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::panic;
use std::path::Path;

use anyhow::{anyhow, Context};
use polib::catalog::Catalog;
use polib::message::{CatalogMessageMutView, MessageView};
use polib::metadata::CatalogMetadata;
use polib::po_file;

use crate::unit::TranslationUnit;

const PLURAL_FORMS: &str = "Plural-Forms";

/// Header fields polib requires, with the values used when a catalog
/// leaves them out. `Last-Translator` is optional.
const HEADER_DEFAULTS: [(&str, &str); 9] = [
    ("Project-Id-Version", "PACKAGE VERSION"),
    ("POT-Creation-Date", ""),
    ("PO-Revision-Date", ""),
    ("Language-Team", ""),
    ("MIME-Version", "1.0"),
    ("Content-Type", "text/plain; charset=UTF-8"),
    ("Content-Transfer-Encoding", "8bit"),
    ("Language", ""),
    (PLURAL_FORMS, "nplurals=2; plural=(n != 1);"),
];

/// Parse the PO file at `path` into translation units.
///
/// The header is consumed as catalog metadata and is not returned. A
/// missing or sparse header is completed before parsing, so only files
/// which are not valid UTF-8 or not valid PO syntax are rejected.
pub fn parse_catalog(path: &Path) -> anyhow::Result<Vec<TranslationUnit>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let mut catalog = match complete_header(&contents) {
        Some(completed) => {
            tracing::debug!("Completing the header of {}", path.display());
            let mut file =
                tempfile::NamedTempFile::new().context("Could not create temporary file")?;
            file.write_all(completed.as_bytes())
                .context("Could not write temporary file")?;
            parse_po(file.path(), path)?
        }
        None => parse_po(path, path)?,
    };
    let units = catalog
        .messages_mut()
        .map(|mut message| TranslationUnit::new(message.detach()))
        .collect();
    Ok(units)
}

/// Parse `file` with polib, reporting errors against `origin`.
fn parse_po(file: &Path, origin: &Path) -> anyhow::Result<Catalog> {
    // polib slices quoted strings without checking them first.
    let parsed = panic::catch_unwind(|| po_file::parse(file))
        .map_err(|_| anyhow!("Could not parse {}: malformed entry", origin.display()))?;
    parsed.with_context(|| format!("Could not parse {}", origin.display()))
}

/// Return `text` with a header polib can parse, or `None` if it already
/// has one.
///
/// A catalog without a header gets a complete one. Missing fields and
/// plural rules polib cannot read are appended to an existing header,
/// where they take precedence over earlier lines.
fn complete_header(text: &str) -> Option<String> {
    let (bom, text) = match text.strip_prefix('\u{feff}') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let lines = text.lines().collect::<Vec<_>>();
    let Some(first) = lines
        .iter()
        .position(|line| line.starts_with("msgid ") || line.starts_with("msgctxt "))
    else {
        return bom.then(|| text.to_owned());
    };

    let has_header = lines[first].trim_end() == "msgid \"\""
        && lines
            .get(first + 1)
            .is_some_and(|line| line.starts_with("msgstr "));
    if !has_header {
        let mut completed = String::from("msgid \"\"\nmsgstr \"\"\n");
        for (key, value) in HEADER_DEFAULTS {
            completed.push_str(&header_line(key, value));
        }
        completed.push('\n');
        completed.push_str(text);
        return Some(completed);
    }

    let msgstr = first + 1;
    let end = msgstr
        + 1
        + lines[msgstr + 1..]
            .iter()
            .take_while(|line| line.starts_with('"'))
            .count();
    let fields = header_fields(&lines[msgstr..end]);
    let additions = HEADER_DEFAULTS
        .iter()
        .filter(|(key, _)| match fields.get(*key) {
            None => true,
            Some(value) => *key == PLURAL_FORMS && !plural_forms_supported(value),
        })
        .map(|(key, value)| header_line(key, value))
        .collect::<Vec<_>>();
    if additions.is_empty() && !bom {
        return None;
    }

    let mut completed = String::new();
    for line in &lines[..end] {
        completed.push_str(line);
        completed.push('\n');
    }
    completed.extend(additions);
    for line in &lines[end..] {
        completed.push_str(line);
        completed.push('\n');
    }
    Some(completed)
}

fn header_line(key: &str, value: &str) -> String {
    format!("\"{key}: {value}\\n\"\n")
}

/// Split the `msgstr` lines of a header into its `Key: value` fields.
fn header_fields(msgstr: &[&str]) -> HashMap<String, String> {
    let mut escaped = String::new();
    for &line in msgstr {
        let quoted = line.strip_prefix("msgstr").unwrap_or(line).trim();
        if let Some(content) = quoted.strip_prefix('"').and_then(|q| q.strip_suffix('"')) {
            escaped.push_str(content);
        }
    }
    escaped
        .split("\\n")
        .filter_map(|field| field.split_once(':'))
        .map(|(key, value)| (key.to_owned(), value.trim().to_owned()))
        .collect()
}

/// Can polib read `rules` as a `Plural-Forms` value?
fn plural_forms_supported(rules: &str) -> bool {
    let header = HEADER_DEFAULTS
        .iter()
        .map(|(key, default)| {
            let value = if *key == PLURAL_FORMS { rules } else { *default };
            format!("{key}: {value}\n")
        })
        .collect::<String>();
    CatalogMetadata::parse(&header).is_ok()
}

/// Metadata for a freshly generated catalog.
pub fn new_metadata() -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.mime_version = String::from("1.0");
    metadata.content_type = String::from("text/plain; charset=UTF-8");
    metadata.content_transfer_encoding = String::from("8bit");
    let now = chrono::Local::now();
    metadata.pot_creation_date = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    metadata
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_field(output: &mut String, name: &str, content: &str) {
    let escaped = escape(content);
    if !content.trim_end_matches('\n').contains('\n') {
        let _ = writeln!(output, "{name} \"{escaped}\"");
        return;
    }
    let _ = writeln!(output, "{name} \"\"");
    for line in escaped.split_inclusive("\\n") {
        let _ = writeln!(output, "\"{line}\"");
    }
}

fn write_comments(output: &mut String, prefix: &str, comments: &str) {
    for line in comments.split('\n') {
        let _ = writeln!(output, "{prefix} {line}");
    }
}

/// Serialize `units` as a PO file with the given header.
///
/// Every unit is written, even when several share a `msgid`.
pub fn serialize<'a>(
    metadata: &CatalogMetadata,
    units: impl IntoIterator<Item = &'a TranslationUnit>,
) -> String {
    let mut output = String::new();
    output.push_str("msgid \"\"\n");
    write_field(&mut output, "msgstr", &metadata.export_for_po());

    for unit in units {
        output.push('\n');
        for comment in unit.comments() {
            write_comments(&mut output, "#", comment);
        }
        let message = unit.message();
        if !message.comments().is_empty() {
            write_comments(&mut output, "#.", message.comments());
        }
        if !message.source().is_empty() {
            write_comments(&mut output, "#:", message.source());
        }
        if !message.flags().is_empty() {
            let _ = writeln!(output, "#, {}", message.flags());
        }
        if !message.msgctxt().is_empty() {
            write_field(&mut output, "msgctxt", message.msgctxt());
        }
        write_field(&mut output, "msgid", message.msgid());
        match (message.msgid_plural(), message.msgstr_plural()) {
            (Ok(msgid_plural), Ok(msgstr_plural)) => {
                write_field(&mut output, "msgid_plural", msgid_plural);
                for (idx, msgstr) in msgstr_plural.iter().enumerate() {
                    write_field(&mut output, &format!("msgstr[{idx}]"), msgstr);
                }
            }
            _ => write_field(&mut output, "msgstr", message.msgstr().unwrap_or_default()),
        }
    }

    output
}

/// Write `units` to a new PO file at `path`.
pub fn write_catalog<'a>(
    path: &Path,
    units: impl IntoIterator<Item = &'a TranslationUnit>,
) -> anyhow::Result<()> {
    let contents = serialize(&new_metadata(), units);
    fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))
}
