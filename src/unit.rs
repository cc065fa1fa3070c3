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

use polib::message::{Message, MessageView};

/// A single message read from a catalog.
///
/// This wraps a [`Message`] together with translator comments
/// (`# ...` lines). `polib` does not keep translator comments, so they
/// are tracked here and written out by [`crate::catalog::serialize`].
#[derive(Debug)]
pub struct TranslationUnit {
    message: Message,
    comments: Vec<String>,
}

impl TranslationUnit {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            comments: Vec::new(),
        }
    }

    /// Build a translated singular unit.
    pub fn singular(msgid: &str, msgstr: &str) -> Self {
        Self::new(
            Message::build_singular()
                .with_msgid(String::from(msgid))
                .with_msgstr(String::from(msgstr))
                .done(),
        )
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The untranslated text (`msgid`).
    pub fn source(&self) -> &str {
        self.message.msgid()
    }

    /// The translated text (`msgstr`), empty for plural messages.
    pub fn target(&self) -> &str {
        self.message.msgstr().unwrap_or_default()
    }

    /// Is this the catalog header, the entry with an empty `msgid`?
    pub fn is_header(&self) -> bool {
        self.message.msgid().is_empty()
    }

    /// Does the message carry a translation? Fuzzy messages do not count.
    pub fn is_translated(&self) -> bool {
        self.message.is_translated() && !self.message.flags().is_fuzzy()
    }

    pub fn has_plural(&self) -> bool {
        self.message.is_plural()
    }

    /// Translator comments, without the leading `# `.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }
}

impl From<Message> for TranslationUnit {
    fn from(message: Message) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polib::message::MessageMutView;
    use pretty_assertions::assert_eq;

    #[test]
    fn singular_unit() {
        let unit = TranslationUnit::singular("Open", "Abrir");
        assert_eq!(unit.source(), "Open");
        assert_eq!(unit.target(), "Abrir");
        assert!(unit.is_translated());
        assert!(!unit.is_header());
        assert!(!unit.has_plural());
    }

    #[test]
    fn untranslated_unit() {
        let unit = TranslationUnit::singular("Open", "");
        assert!(!unit.is_translated());
    }

    #[test]
    fn fuzzy_unit() {
        let mut message = Message::build_singular()
            .with_msgid(String::from("Open"))
            .with_msgstr(String::from("Abra"))
            .done();
        message.flags_mut().add_flag("fuzzy");
        let unit = TranslationUnit::new(message);
        assert_eq!(unit.target(), "Abra");
        assert!(!unit.is_translated());
    }

    #[test]
    fn header_unit() {
        let unit = TranslationUnit::singular("", "Content-Type: text/plain\n");
        assert!(unit.is_header());
    }

    #[test]
    fn plural_unit() {
        let message = Message::build_plural()
            .with_msgid(String::from("One file"))
            .with_msgid_plural(String::from("{n} files"))
            .with_msgstr_plural(vec![String::from("Un archivo"), String::from("{n} archivos")])
            .done();
        let unit = TranslationUnit::from(message);
        assert!(unit.has_plural());
        assert!(unit.is_translated());
        assert_eq!(unit.target(), "");
    }

    #[test]
    fn comments_accumulate() {
        let mut unit = TranslationUnit::singular("Open", "Abrir");
        unit.add_comment("first");
        unit.add_comment(String::from("second"));
        assert_eq!(unit.comments(), &["first", "second"]);
    }
}
