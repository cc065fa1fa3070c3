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

//! Normalize message text before it is compared.
//!
//! Two strings are only compared after [`clean`] has been applied to
//! both of them. [`flatten`] reduces a string to its words and is used
//! both to decide whether a source string is meaningful and to turn a
//! cluster key into a file name.

/// Options controlling how [`clean`] normalizes a string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Lowercase the text before comparing.
    pub ignore_case: bool,
    /// Characters to strip from the text, such as the `&` or `_`
    /// markers used for menu mnemonics.
    pub accelerators: String,
}

impl CleanOptions {
    pub fn new(ignore_case: bool, accelerators: impl Into<String>) -> Self {
        Self {
            ignore_case,
            accelerators: accelerators.into(),
        }
    }
}

/// Return the part of `text` which should be compared.
///
/// The text is lowercased if `options.ignore_case` is set, every
/// accelerator character is removed and surrounding whitespace is
/// trimmed.
///
/// # Examples
///
/// ```
/// use poconflicts::normalize::{clean, CleanOptions};
///
/// let options = CleanOptions::new(true, "&");
/// assert_eq!(clean("  &Open File ", &options), "open file");
/// ```
pub fn clean(text: &str, options: &CleanOptions) -> String {
    let mut cleaned = if options.ignore_case {
        text.to_lowercase()
    } else {
        String::from(text)
    };
    if !options.accelerators.is_empty() {
        cleaned.retain(|c| !options.accelerators.contains(c));
    }
    String::from(cleaned.trim())
}

/// Reduce `text` to its alphanumeric words joined by `join`.
///
/// Every run of non-alphanumeric characters between two words becomes
/// a single `join`. Leading and trailing runs are dropped.
///
/// # Examples
///
/// ```
/// use poconflicts::normalize::flatten;
///
/// assert_eq!(flatten("  Save as...", ' '), "Save as");
/// assert_eq!(flatten("File -> Open", '-'), "File-Open");
/// assert_eq!(flatten("...", ' '), "");
/// ```
pub fn flatten(text: &str, join: char) -> String {
    let mut flat = String::with_capacity(text.len());
    let mut after_word = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            flat.push(c);
            after_word = true;
        } else if after_word {
            flat.push(join);
            after_word = false;
        }
    }
    if !after_word && !flat.is_empty() {
        flat.pop();
    }
    flat
}
