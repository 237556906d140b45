//! DOCTYPE Declaration Parsing
//!
//! A DOCTYPE is matched against five grammars, tried in a fixed order:
//!
//! ```text
//! (a) <!DOCTYPE root SYSTEM "uri" [subset]>
//! (b) <!DOCTYPE root PUBLIC "id" "uri" [subset]>
//! (c) <!DOCTYPE root [subset]>
//! (d) <!DOCTYPE root SYSTEM "uri">
//! (e) <!DOCTYPE root PUBLIC "id" "uri">
//! ```
//!
//! The internal subset is captured as text; its declarations are not
//! interpreted.

use super::scanner::{is_space, Scanner};
use std::fmt;

/// External identifier kind of a DOCTYPE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    System,
    Public,
}

impl ExternalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalKind::System => "SYSTEM",
            ExternalKind::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed DOCTYPE declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    /// Root element name
    pub root: String,
    /// SYSTEM or PUBLIC, when an external id is present
    pub kind: Option<ExternalKind>,
    /// Public identifier (PUBLIC only)
    pub public_id: Option<String>,
    /// System URI
    pub uri: Option<String>,
    /// Text between the brackets of the internal subset
    pub internal: Option<String>,
}

/// The DOCTYPE grammars, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    SystemWithSubset,
    PublicWithSubset,
    SubsetOnly,
    System,
    Public,
}

const GRAMMARS: [Grammar; 5] = [
    Grammar::SystemWithSubset,
    Grammar::PublicWithSubset,
    Grammar::SubsetOnly,
    Grammar::System,
    Grammar::Public,
];

const DOCTYPE_OPEN: &[u8] = b"<!DOCTYPE";

/// Parse the DOCTYPE whose `<` sits at byte `start`.
///
/// Returns the declaration and the byte offset of its closing `>`, or
/// `None` if no grammar matches.
pub fn parse_doctype(input: &str, start: usize) -> Option<(Doctype, usize)> {
    let bytes = input.as_bytes();
    let mut scanner = Scanner::at(bytes, start);
    if !scanner.starts_with(DOCTYPE_OPEN) {
        return None;
    }
    scanner.advance(DOCTYPE_OPEN.len());
    if scanner.skip_whitespace() == 0 {
        return None;
    }

    let (root_start, root_end) = scanner.read_until(|b| is_space(b) || b == b'[' || b == b'>');
    if root_start == root_end {
        return None;
    }
    let root = &input[root_start..root_end];
    let after_root = scanner.position();

    GRAMMARS.iter().find_map(|grammar| {
        let mut scanner = Scanner::at(bytes, after_root);
        let mut doctype = grammar.apply(&mut scanner, input)?;
        doctype.root = root.to_owned();
        Some((doctype, scanner.position() - 1))
    })
}

impl Grammar {
    /// Match the part after the root name, through the closing `>`
    fn apply(self, scanner: &mut Scanner<'_>, input: &str) -> Option<Doctype> {
        let mut doctype = Doctype::default();

        match self {
            Grammar::SystemWithSubset | Grammar::System => {
                keyword(scanner, b"SYSTEM")?;
                doctype.kind = Some(ExternalKind::System);
                doctype.uri = Some(literal(scanner, input)?);
            }
            Grammar::PublicWithSubset | Grammar::Public => {
                keyword(scanner, b"PUBLIC")?;
                doctype.kind = Some(ExternalKind::Public);
                doctype.public_id = Some(literal(scanner, input)?);
                space1(scanner)?;
                doctype.uri = Some(literal(scanner, input)?);
            }
            Grammar::SubsetOnly => {}
        }

        if self.has_subset() {
            scanner.skip_whitespace();
            let (from, to) = scanner.read_balanced(b'[', b']')?;
            doctype.internal = Some(input[from..to].to_owned());
        }

        scanner.skip_whitespace();
        if scanner.peek() != Some(b'>') {
            return None;
        }
        scanner.advance(1);
        Some(doctype)
    }

    fn has_subset(self) -> bool {
        matches!(
            self,
            Grammar::SystemWithSubset | Grammar::PublicWithSubset | Grammar::SubsetOnly
        )
    }
}

/// Whitespace, the keyword, then whitespace again
fn keyword(scanner: &mut Scanner<'_>, word: &[u8]) -> Option<()> {
    space1(scanner)?;
    if !scanner.starts_with(word) {
        return None;
    }
    scanner.advance(word.len());
    space1(scanner)
}

fn space1(scanner: &mut Scanner<'_>) -> Option<()> {
    (scanner.skip_whitespace() > 0).then_some(())
}

fn literal(scanner: &mut Scanner<'_>, input: &str) -> Option<String> {
    let (from, to) = scanner.read_quoted()?;
    Some(input[from..to].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(input: &str) -> Option<Doctype> {
        parse_doctype(input, 0).map(|(d, end)| {
            assert_eq!(end, input.rfind('>').unwrap());
            d
        })
    }

    #[test]
    fn test_system_with_subset() {
        let d = doctype("<!DOCTYPE note SYSTEM \"note.dtd\" [<!ENTITY w \"x\">]>").unwrap();
        assert_eq!(d.root, "note");
        assert_eq!(d.kind, Some(ExternalKind::System));
        assert_eq!(d.public_id, None);
        assert_eq!(d.uri.as_deref(), Some("note.dtd"));
        assert_eq!(d.internal.as_deref(), Some("<!ENTITY w \"x\">"));
    }

    #[test]
    fn test_public_with_subset() {
        let d = doctype("<!DOCTYPE html PUBLIC '-//W3C//DTD XHTML 1.0//EN' 'x.dtd' [ ]>").unwrap();
        assert_eq!(d.kind, Some(ExternalKind::Public));
        assert_eq!(d.public_id.as_deref(), Some("-//W3C//DTD XHTML 1.0//EN"));
        assert_eq!(d.uri.as_deref(), Some("x.dtd"));
        assert_eq!(d.internal.as_deref(), Some(" "));
    }

    #[test]
    fn test_subset_only() {
        let d = doctype("<!DOCTYPE doc[<!ELEMENT doc (#PCDATA)>]>").unwrap();
        assert_eq!(d.root, "doc");
        assert_eq!(d.kind, None);
        assert_eq!(d.uri, None);
        assert_eq!(d.internal.as_deref(), Some("<!ELEMENT doc (#PCDATA)>"));
    }

    #[test]
    fn test_system_only() {
        let d = doctype("<!DOCTYPE note SYSTEM \"note.dtd\">").unwrap();
        assert_eq!(d.kind, Some(ExternalKind::System));
        assert_eq!(d.uri.as_deref(), Some("note.dtd"));
        assert_eq!(d.internal, None);
    }

    #[test]
    fn test_public_only() {
        let d = doctype("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\"\n  \"http://www.w3.org/TR/html4/strict.dtd\" >").unwrap();
        assert_eq!(d.kind, Some(ExternalKind::Public));
        assert_eq!(d.public_id.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
        assert_eq!(d.uri.as_deref(), Some("http://www.w3.org/TR/html4/strict.dtd"));
    }

    #[test]
    fn test_rejected_forms() {
        assert_eq!(doctype("<!DOCTYPE html>"), None);
        assert_eq!(doctype("<!DOCTYPEhtml [ ]>"), None);
        assert_eq!(doctype("<!DOCTYPE note SYSTEM>"), None);
        assert_eq!(doctype("<!DOCTYPE note SYSTEM \"a'>"), None);
        assert_eq!(doctype("<!DOCTYPE note PUBLIC \"id\">"), None);
        assert_eq!(doctype("<!DOCTYPE note [<!ELEMENT a ANY>"), None);
        assert_eq!(doctype("<!DOCTYPE note SYSTEM \"n.dtd\" junk>"), None);
    }

    #[test]
    fn test_offset_start_and_end() {
        let input = "<r/><!DOCTYPE r SYSTEM 'r.dtd'><r/>";
        let (d, end) = parse_doctype(input, 4).unwrap();
        assert_eq!(d.uri.as_deref(), Some("r.dtd"));
        assert_eq!(end, 30);
    }
}
