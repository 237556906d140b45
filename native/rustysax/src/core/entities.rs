//! XML Entity Expansion
//!
//! Handles expansion of a closed set of references:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references in the 0-255 range: &#65; &#x41;
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// The five predefined XML entities and their replacements
const NAMED_ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&apos;", "'"),
];

/// Highest code point a numeric reference may expand to
const MAX_NUMERIC_REFERENCE: u32 = 0xFF;

/// What a reference at the start of a slice expands to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expansion {
    Literal(&'static str),
    Char(char),
}

/// Expand entity references in text content or attribute values.
///
/// Returns Borrowed if no entities present (zero-copy), returns Owned if
/// anything was expanded. Expansion is a single pass: replacement text is
/// never rescanned, so `&amp;lt;` becomes `&lt;`. Unknown names and
/// numeric references outside 0-255 are copied through untouched.
#[inline]
pub fn expand_entities(input: &str) -> Cow<'_, str> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + offset;
        match expand_reference(&input[amp..]) {
            Some((expansion, consumed)) => {
                result.push_str(&input[copied..amp]);
                match expansion {
                    Expansion::Literal(s) => result.push_str(s),
                    Expansion::Char(c) => result.push(c),
                }
                pos = amp + consumed;
                copied = pos;
            }
            None => pos = amp + 1,
        }
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    result.push_str(&input[copied..]);
    Cow::Owned(result)
}

/// Expand the reference starting at the `&` that begins `s`.
/// Returns the expansion and the number of bytes the reference spans.
fn expand_reference(s: &str) -> Option<(Expansion, usize)> {
    if let Some(&(name, replacement)) = NAMED_ENTITIES.iter().find(|(name, _)| s.starts_with(name)) {
        return Some((Expansion::Literal(replacement), name.len()));
    }

    let (digits, radix, prefix_len) = if let Some(hex) = s.strip_prefix("&#x") {
        (hex, 16, 3)
    } else if let Some(dec) = s.strip_prefix("&#") {
        (dec, 10, 2)
    } else {
        return None;
    };

    let count = digits
        .bytes()
        .take_while(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            _ => b.is_ascii_digit(),
        })
        .count();
    if count == 0 || digits.as_bytes().get(count) != Some(&b';') {
        return None;
    }

    let value = u32::from_str_radix(&digits[..count], radix).ok()?;
    if value > MAX_NUMERIC_REFERENCE {
        return None;
    }
    let byte = u8::try_from(value).ok()?;
    Some((Expansion::Char(char::from(byte)), prefix_len + count + 1))
}
