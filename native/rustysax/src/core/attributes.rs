//! XML Attribute Parsing
//!
//! Splits a tag body into its name and attribute map.

use super::entities::expand_entities;
use super::scanner::{is_space_char, Scanner};
use std::collections::HashMap;

/// Reserved key under which a processing instruction's raw text is kept
pub const PI_TEXT_KEY: &str = "_text";

/// Attributes of a tag, keyed by lower-cased name.
///
/// A repeated name overwrites the earlier value. Tags without any
/// attribute get `None` instead of an empty map; see [`Attributes::into_option`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: HashMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by name. Names are stored lower-cased.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert a value, lower-casing the name. Returns the value it replaced.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.to_ascii_lowercase(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, value) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw text of a processing instruction, if one was attached
    pub fn pi_text(&self) -> Option<&str> {
        self.get(PI_TEXT_KEY)
    }

    /// `None` when no attribute was parsed
    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Tag name: everything before the first whitespace
pub fn tag_name(body: &str) -> &str {
    body.split(is_space_char).next().unwrap_or_default()
}

/// Split a tag body into its name and attributes.
///
/// Every `name="value"` or `name='value'` pair after the name is
/// collected. Values are entity-expanded when `expand` is set.
pub fn parse_tag(body: &str, expand: bool) -> (&str, Option<Attributes>) {
    let name = tag_name(body);
    let rest = &body[name.len()..];
    (name, parse_attributes(rest, expand).into_option())
}

/// Collect quoted attribute pairs found anywhere in `input`
pub fn parse_attributes(input: &str, expand: bool) -> Attributes {
    let mut attrs = Attributes::new();
    let mut scanner = Scanner::new(input.as_bytes());

    while !scanner.is_eof() {
        let Some((name_start, name_end)) = scanner.read_name() else {
            scanner.advance(1);
            continue;
        };

        scanner.skip_whitespace();
        if scanner.peek() != Some(b'=') {
            continue;
        }
        scanner.advance(1);
        scanner.skip_whitespace();

        if !matches!(scanner.peek(), Some(b'"' | b'\'')) {
            continue;
        }
        // An unclosed quote swallows the rest of the body
        let Some((value_start, value_end)) = scanner.read_quoted() else {
            break;
        };

        let raw = &input[value_start..value_end];
        let value = if expand {
            expand_entities(raw).into_owned()
        } else {
            raw.to_owned()
        };
        attrs.insert(&input[name_start..name_end], value);
    }

    attrs
}

/// Tracks whether a growing tag body holds a quoted value with no closing
/// quote.
///
/// Only quotes introduced by `=` count, mirroring how values are read in
/// [`parse_attributes`]. Each call must pass the previous body with bytes
/// appended. Only the new bytes are searched, so extending a tag many times
/// stays linear.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteTracker {
    /// Where the search for the next `=` resumes
    resume: usize,
    /// Quote byte of a value still open, and where its closer search resumes
    open: Option<(u8, usize)>,
}

impl QuoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while some quoted value in `body` is unterminated
    pub fn is_open(&mut self, body: &str) -> bool {
        let bytes = body.as_bytes();

        if let Some((quote, from)) = self.open {
            match Scanner::at(bytes, from).find_byte(quote) {
                Some(close) => {
                    self.open = None;
                    self.resume = close + 1;
                }
                None => {
                    self.open = Some((quote, bytes.len()));
                    return true;
                }
            }
        }

        let mut scanner = Scanner::at(bytes, self.resume);
        while let Some(eq) = scanner.find_byte(b'=') {
            scanner.set_position(eq + 1);
            scanner.skip_whitespace();
            let quote = match scanner.peek() {
                Some(quote @ (b'"' | b'\'')) => quote,
                Some(_) => continue,
                // Undecided until more of the body arrives
                None => {
                    self.resume = eq;
                    return false;
                }
            };
            if scanner.read_quoted().is_none() {
                self.open = Some((quote, bytes.len()));
                return true;
            }
        }
        self.resume = bytes.len();
        false
    }
}

/// Leading and trailing whitespace removed
#[inline]
pub fn strip_whitespace(text: &str) -> &str {
    text.trim_matches(is_space_char)
}
