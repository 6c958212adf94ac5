//! Inline markup tokenizer for `<i>`, `<sup>` and `<sub>` tags.
//!
//! A tagged span is an opening tag, text without further tags, and the
//! matching closing tag. Anything else that looks like a tag is literal text
//! with no flags; in display mode such stray tag markers are dropped.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Inline markup kinds recognised in cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupTag {
    /// `<i>…</i>`
    Italic,
    /// `<sup>…</sup>`
    Superscript,
    /// `<sub>…</sub>`
    Subscript,
}

impl MarkupTag {
    /// Look up a tag by its element name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "i" => Some(MarkupTag::Italic),
            "sup" => Some(MarkupTag::Superscript),
            "sub" => Some(MarkupTag::Subscript),
            _ => None,
        }
    }

    /// Element name of the tag.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupTag::Italic => "i",
            MarkupTag::Superscript => "sup",
            MarkupTag::Subscript => "sub",
        }
    }
}

/// A contiguous span of text with its markup flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarkupRun<'a> {
    /// Display text (raw tagged text in debug mode)
    pub text: Cow<'a, str>,
    /// Rendered in italics
    pub italic: bool,
    /// Rendered as superscript
    pub superscript: bool,
    /// Rendered as subscript
    pub subscript: bool,
}

impl<'a> InlineMarkupRun<'a> {
    /// Create an unflagged run.
    pub fn plain(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            text: text.into(),
            italic: false,
            superscript: false,
            subscript: false,
        }
    }

    /// Create a run flagged by a tag; unknown tags (`None`) set no flags.
    pub fn tagged(text: impl Into<Cow<'a, str>>, tag: Option<MarkupTag>) -> Self {
        Self {
            text: text.into(),
            italic: tag == Some(MarkupTag::Italic),
            superscript: tag == Some(MarkupTag::Superscript),
            subscript: tag == Some(MarkupTag::Subscript),
        }
    }

    /// Check if any markup flag is set.
    pub fn has_markup(&self) -> bool {
        self.italic || self.superscript || self.subscript
    }
}

/// A tag-shaped token: `<name>` or `</name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TagToken<'a> {
    name: &'a str,
    closing: bool,
    len: usize,
}

/// Parse a tag token at the start of `s`.
fn parse_tag(s: &str) -> Option<TagToken<'_>> {
    let rest = s.strip_prefix('<')?;
    let (closing, body) = match rest.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, rest),
    };
    let end = body.find('>')?;
    let name = &body[..end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let len = 1 + usize::from(closing) + end + 1;
    Some(TagToken { name, closing, len })
}

/// Remove tag-shaped tokens from literal text.
fn strip_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        match parse_tag(&rest[pos..]) {
            Some(tag) => rest = &rest[pos + tag.len..],
            None => {
                out.push('<');
                rest = &rest[pos + 1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Lazy tokenizer over a cell string.
///
/// Yields plain and tagged runs in source order. Never fails: malformed or
/// nested tags degrade to literal text. An input without tags yields exactly
/// one unflagged run.
#[derive(Debug, Clone)]
pub struct MarkupTokenizer<'a> {
    rest: &'a str,
    debug: bool,
    /// Tagged span found ahead of the pending plain text
    pending: Option<InlineMarkupRun<'a>>,
    started: bool,
}

impl<'a> MarkupTokenizer<'a> {
    /// Tokenize `input`, stripping tag markers from display text.
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            debug: false,
            pending: None,
            started: false,
        }
    }

    /// Keep raw tag markers in run text for inspection.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Try to read a complete `<tag>text</tag>` span at the start of `s`.
    ///
    /// Returns the run and the number of bytes consumed. Spans whose content
    /// contains another tag are rejected: tags do not nest.
    fn tagged_span(&self, s: &'a str) -> Option<(InlineMarkupRun<'a>, usize)> {
        let open = parse_tag(s)?;
        if open.closing {
            return None;
        }
        let body = &s[open.len..];
        let mut search = 0;
        while let Some(offset) = body[search..].find('<') {
            let at = search + offset;
            if let Some(tag) = parse_tag(&body[at..]) {
                if tag.closing && tag.name == open.name {
                    let consumed = open.len + at + tag.len;
                    let text = if self.debug {
                        Cow::Borrowed(&s[..consumed])
                    } else {
                        Cow::Borrowed(&body[..at])
                    };
                    return Some((
                        InlineMarkupRun::tagged(text, MarkupTag::from_name(open.name)),
                        consumed,
                    ));
                }
                // Nested or mismatched tag inside the span.
                return None;
            }
            search = at + 1;
        }
        None
    }

    fn literal(&self, text: &'a str) -> InlineMarkupRun<'a> {
        if self.debug {
            InlineMarkupRun::plain(text)
        } else {
            InlineMarkupRun::plain(strip_tags(text))
        }
    }
}

impl<'a> Iterator for MarkupTokenizer<'a> {
    type Item = InlineMarkupRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(run) = self.pending.take() {
            return Some(run);
        }

        if !self.started {
            self.started = true;
            if self.rest.is_empty() {
                return Some(InlineMarkupRun::plain(""));
            }
        }

        while !self.rest.is_empty() {
            let input = self.rest;
            let mut search = 0;
            let mut span = None;
            while let Some(offset) = input[search..].find('<') {
                let at = search + offset;
                if let Some(found) = self.tagged_span(&input[at..]) {
                    span = Some((at, found));
                    break;
                }
                search = at + 1;
            }

            match span {
                Some((at, (run, consumed))) => {
                    self.rest = &input[at + consumed..];
                    let literal = self.literal(&input[..at]);
                    if literal.text.is_empty() {
                        if run.text.is_empty() {
                            continue;
                        }
                        return Some(run);
                    }
                    if !run.text.is_empty() {
                        self.pending = Some(run);
                    }
                    return Some(literal);
                }
                None => {
                    self.rest = "";
                    let literal = self.literal(input);
                    if literal.text.is_empty() {
                        return None;
                    }
                    return Some(literal);
                }
            }
        }

        None
    }
}

impl std::iter::FusedIterator for MarkupTokenizer<'_> {}

/// Tokenize a string into markup runs.
pub fn tokenize(input: &str) -> MarkupTokenizer<'_> {
    MarkupTokenizer::new(input)
}

/// Display text of a string with all markup removed.
pub fn strip_markup(input: &str) -> String {
    tokenize(input).map(|run| run.text).collect()
}
