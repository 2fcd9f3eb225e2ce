//! Placeholder token finder.
//!
//! Recognizes two bracketed syntaxes:
//!
//! - `[@name@]` ([`TokenKind::Include`])
//! - `[{name}]` ([`TokenKind::Property`])
//!
//! The shortest name followed by the closing delimiter wins, and names never
//! span lines:
//!
//! - include names are zero or more non-whitespace characters;
//! - property names may contain spaces (descriptor keys such as `page title`)
//!   but never a line break or another `[{`.
//!
//! Matches never overlap: after a match, scanning resumes past its closing
//! delimiter; after a failed opening delimiter, scanning resumes one byte
//! later.

/// Placeholder syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Include reference: `[@name@]`.
    Include,
    /// Property reference: `[{name}]`.
    Property,
}

impl TokenKind {
    /// Opening delimiter.
    #[must_use]
    pub fn open(self) -> &'static str {
        match self {
            Self::Include => "[@",
            Self::Property => "[{",
        }
    }

    /// Closing delimiter.
    #[must_use]
    pub fn close(self) -> &'static str {
        match self {
            Self::Include => "@]",
            Self::Property => "}]",
        }
    }

    /// True if `c` can't appear in a name of this kind.
    fn ends_name(self, c: char) -> bool {
        match self {
            Self::Include => c.is_whitespace(),
            Self::Property => c == '\n' || c == '\r',
        }
    }

    /// Literal token text for `name`.
    ///
    /// ```
    /// use wj_renderer::TokenKind;
    ///
    /// assert_eq!(TokenKind::Include.literal("footer"), "[@footer@]");
    /// assert_eq!(TokenKind::Property.literal("title"), "[{title}]");
    /// ```
    #[must_use]
    pub fn literal(self, name: &str) -> String {
        format!("{}{name}{}", self.open(), self.close())
    }
}

/// A token located in a text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Syntax of the token.
    pub kind: TokenKind,
    /// Name between the delimiters.
    pub name: &'a str,
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
}

/// Iterator over the tokens of one kind in a text, left to right.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    text: &'a str,
    kind: TokenKind,
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// Create an iterator over `kind` tokens in `text`.
    #[must_use]
    pub fn new(text: &'a str, kind: TokenKind) -> Self {
        Self { text, kind, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let open = self.kind.open();
        let close = self.kind.close();

        while let Some(offset) = self.text[self.pos..].find(open) {
            let start = self.pos + offset;
            let name_start = start + open.len();

            if let Some(name_len) = scan_name(&self.text[name_start..], self.kind) {
                let name_end = name_start + name_len;
                let end = name_end + close.len();
                self.pos = end;
                return Some(Token {
                    kind: self.kind,
                    name: &self.text[name_start..name_end],
                    start,
                    end,
                });
            }

            // Opening delimiters are ASCII, so start + 1 is a char boundary
            self.pos = start + 1;
        }

        self.pos = self.text.len();
        None
    }
}

/// Length of the shortest valid `kind` name at the start of `rest` that is
/// followed by the closing delimiter.
fn scan_name(rest: &str, kind: TokenKind) -> Option<usize> {
    let (open, close) = (kind.open(), kind.close());
    for (i, c) in rest.char_indices() {
        let tail = &rest[i..];
        if tail.starts_with(close) {
            return Some(i);
        }
        if kind.ends_name(c) || (kind == TokenKind::Property && tail.starts_with(open)) {
            return None;
        }
    }
    None
}

/// Distinct include names referenced by `template`, in order of first appearance.
#[must_use]
pub fn include_names(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for token in Tokens::new(template, TokenKind::Include) {
        if !names.contains(&token.name) {
            names.push(token.name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(text: &str, kind: TokenKind) -> Vec<&str> {
        Tokens::new(text, kind).map(|t| t.name).collect()
    }

    #[test]
    fn test_no_tokens() {
        assert!(names("<p>plain</p>", TokenKind::Include).is_empty());
        assert!(names("", TokenKind::Property).is_empty());
    }

    #[test]
    fn test_single_include_offsets() {
        let text = "<body>[@header@]</body>";
        let tokens: Vec<_> = Tokens::new(text, TokenKind::Include).collect();

        assert_eq!(
            tokens,
            vec![Token {
                kind: TokenKind::Include,
                name: "header",
                start: 6,
                end: 16,
            }]
        );
        assert_eq!(&text[6..16], "[@header@]");
    }

    #[test]
    fn test_kinds_are_disjoint() {
        let text = "[@nav@] [{title}]";

        assert_eq!(names(text, TokenKind::Include), vec!["nav"]);
        assert_eq!(names(text, TokenKind::Property), vec!["title"]);
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(
            names("[{a}] and [{b}]", TokenKind::Property),
            vec!["a", "b"]
        );
        assert_eq!(names("[@a@]@]", TokenKind::Include), vec!["a"]);
    }

    #[test]
    fn test_include_name_cannot_contain_whitespace() {
        assert!(names("[@my nav@]", TokenKind::Include).is_empty());
        assert!(names("[@multi\nline@]", TokenKind::Include).is_empty());
    }

    #[test]
    fn test_property_name_may_contain_spaces() {
        assert_eq!(
            names("<h1>[{page title}]</h1>[{ padded }]", TokenKind::Property),
            vec!["page title", " padded "]
        );
    }

    #[test]
    fn test_property_name_cannot_span_lines() {
        assert!(names("[{multi\nline}]", TokenKind::Property).is_empty());
        assert!(names("[{multi\r\nline}]", TokenKind::Property).is_empty());
    }

    #[test]
    fn test_property_name_cannot_contain_open_delimiter() {
        assert_eq!(
            names("[{ unclosed [{title}]", TokenKind::Property),
            vec!["title"]
        );
    }

    #[test]
    fn test_failed_open_resumes_scanning() {
        assert_eq!(
            names("[@broken [@footer@]", TokenKind::Include),
            vec!["footer"]
        );
        assert_eq!(names("[[{x}]", TokenKind::Property), vec!["x"]);
    }

    #[test]
    fn test_unterminated() {
        assert!(names("[{title", TokenKind::Property).is_empty());
        assert!(names("[@", TokenKind::Include).is_empty());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(names("[@@]", TokenKind::Include), vec![""]);
    }

    #[test]
    fn test_name_may_contain_punctuation() {
        assert_eq!(
            names("[{og:title}] [{a.b-c_d}]", TokenKind::Property),
            vec!["og:title", "a.b-c_d"]
        );
    }

    #[test]
    fn test_unicode_names_and_text() {
        let text = "héllo [{título}] ✓";
        let tokens: Vec<_> = Tokens::new(text, TokenKind::Property).collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "título");
        assert_eq!(&text[tokens[0].start..tokens[0].end], "[{título}]");
    }

    #[test]
    fn test_include_names_distinct_in_first_appearance_order() {
        let template = "[@footer@][@header@][@footer@][@nav@][@header@]";

        assert_eq!(include_names(template), vec!["footer", "header", "nav"]);
    }

    #[test]
    fn test_literal() {
        assert_eq!(TokenKind::Include.literal(""), "[@@]");
        assert_eq!(TokenKind::Property.literal("relative_path"), "[{relative_path}]");
    }
}
