//! Single-pass token replacement.
//!
//! Collects `name -> value` pairs for one token syntax and applies them in a
//! single left-to-right pass.

use std::collections::HashMap;

use crate::token::{TokenKind, Tokens};

/// Collects token replacements for single-pass application.
///
/// Instead of calling `text.replace()` once per name (which would let a later
/// replacement rewrite text inserted by an earlier one), all values are
/// registered first and [`apply()`](Self::apply) walks the tokens of the
/// original text exactly once. Inserted values are copied verbatim and never
/// scanned.
///
/// Registering the same name twice keeps the last value.
///
/// # Example
///
/// ```
/// use wj_renderer::{Replacements, TokenKind};
///
/// let mut html = "<h1>[{title}]</h1>[{missing}]".to_owned();
/// let mut replacements = Replacements::new(TokenKind::Property);
/// replacements.add("title", "Hello [{title}]");
/// replacements.apply(&mut html);
///
/// assert_eq!(html, "<h1>Hello [{title}]</h1>[{missing}]");
/// ```
#[derive(Debug)]
pub struct Replacements {
    kind: TokenKind,
    items: HashMap<String, String>,
}

impl Replacements {
    /// Create a new empty replacements collector for `kind` tokens.
    #[must_use]
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            items: HashMap::new(),
        }
    }

    /// Register a replacement: every `kind` token named `name` becomes `value`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.insert(name.into(), value.into());
    }

    /// Apply all registered replacements.
    ///
    /// Tokens with no registered value are left as literal text.
    ///
    /// Note: This consumes the replacements to prevent accidental reuse.
    pub fn apply(self, text: &mut String) {
        if self.items.is_empty() {
            return;
        }

        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for token in Tokens::new(text, self.kind) {
            if let Some(value) = self.items.get(token.name) {
                output.push_str(&text[last..token.start]);
                output.push_str(value);
                last = token.end;
            }
        }

        if last == 0 {
            return;
        }

        output.push_str(&text[last..]);
        *text = output;
    }

    /// Check if there are any replacements registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of distinct names registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_replacements() {
        let mut html = "unchanged [{x}]".to_owned();
        let replacements = Replacements::new(TokenKind::Property);
        replacements.apply(&mut html);
        assert_eq!(html, "unchanged [{x}]");
    }

    #[test]
    fn test_single_replacement() {
        let mut html = "hello [{who}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("who", "world");
        replacements.apply(&mut html);
        assert_eq!(html, "hello world");
    }

    #[test]
    fn test_multiple_occurrences() {
        let mut html = "[@hr@]a[@hr@]b[@hr@]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Include);
        replacements.add("hr", "<hr>");
        replacements.apply(&mut html);
        assert_eq!(html, "<hr>a<hr>b<hr>");
    }

    #[test]
    fn test_replacement_not_found() {
        let mut html = "hello [{world}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("foo", "bar");
        replacements.apply(&mut html);
        assert_eq!(html, "hello [{world}]");
    }

    #[test]
    fn test_other_kind_untouched() {
        let mut html = "[@title@] [{title}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("title", "T");
        replacements.apply(&mut html);
        assert_eq!(html, "[@title@] T");
    }

    #[test]
    fn test_inserted_text_not_rescanned() {
        // A sequential replace would turn [{b}] inside the value of a into "B"
        let mut html = "[{a}] [{b}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("a", "[{b}]");
        replacements.add("b", "B");
        replacements.apply(&mut html);
        assert_eq!(html, "[{b}] B");
    }

    #[test]
    fn test_self_referencing_value() {
        let mut html = "[@loop@]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Include);
        replacements.add("loop", "<div>[@loop@]</div>");
        replacements.apply(&mut html);
        assert_eq!(html, "<div>[@loop@]</div>");
    }

    #[test]
    fn test_last_add_wins() {
        let mut html = "[{relative_path}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("relative_path", "user/");
        replacements.add("relative_path", "../");
        replacements.apply(&mut html);
        assert_eq!(html, "../");
    }

    #[test]
    fn test_key_with_spaces() {
        let mut html = "[{page title}] | [{page title}]".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("page title", "Home");
        replacements.apply(&mut html);
        assert_eq!(html, "Home | Home");
    }

    #[test]
    fn test_empty_value_removes_token() {
        let mut html = "a[{gap}]b".to_owned();
        let mut replacements = Replacements::new(TokenKind::Property);
        replacements.add("gap", "");
        replacements.apply(&mut html);
        assert_eq!(html, "ab");
    }

    #[test]
    fn test_is_empty_and_len() {
        let mut replacements = Replacements::new(TokenKind::Include);
        assert!(replacements.is_empty());
        assert_eq!(replacements.len(), 0);

        replacements.add("a", "b");
        replacements.add("c", "d");
        replacements.add("a", "e");
        assert!(!replacements.is_empty());
        assert_eq!(replacements.len(), 2);
    }
}
