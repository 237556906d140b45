//! Byte scanning over the document using memchr
//!
//! Every search stops on an ASCII delimiter, so any offset the scanner
//! reports is also a UTF-8 char boundary of the source `str`.

use memchr::{memchr, memchr2, memchr3, memmem};

/// Cursor over the document bytes
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Create a scanner positioned at `pos`
    #[inline]
    pub fn at(input: &'a [u8], pos: usize) -> Self {
        Scanner { input, pos }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip whitespace, returning how many bytes were skipped
    #[inline]
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Check if the rest of the input is whitespace only
    pub fn only_whitespace_remains(&self) -> bool {
        self.remaining().iter().all(|&b| is_space(b))
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        self.find_byte(b'<')
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Find next occurrence of a byte sequence
    #[inline]
    pub fn find_str(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|i| self.pos + i)
    }

    /// Read a run of name characters, returning its byte range
    pub fn read_name(&mut self) -> Option<(usize, usize)> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        (self.pos > start).then_some((start, self.pos))
    }

    /// Read bytes until one matches `stop` or input ends
    pub fn read_until(&mut self, stop: impl Fn(u8) -> bool) -> (usize, usize) {
        let start = self.pos;
        while self.peek().is_some_and(|b| !stop(b)) {
            self.pos += 1;
        }
        (start, self.pos)
    }

    /// Read a quoted literal at the cursor.
    ///
    /// Returns the byte range between the quotes and leaves the cursor past
    /// the closing quote. The literal must close with the quote it opened
    /// with; on failure the cursor is left where it was.
    pub fn read_quoted(&mut self) -> Option<(usize, usize)> {
        let quote = self.peek().filter(|&q| q == b'"' || q == b'\'')?;
        let start = self.pos + 1;
        let close = memchr(quote, self.input.get(start..)?)? + start;
        self.pos = close + 1;
        Some((start, close))
    }

    /// Read a bracketed run such as `[ ... ]`, allowing nesting.
    ///
    /// Quoted literals and `<!-- -->` comments inside the run are skipped
    /// whole, so brackets inside them do not count. Returns the range
    /// between the outer brackets.
    pub fn read_balanced(&mut self, open: u8, close: u8) -> Option<(usize, usize)> {
        if self.peek() != Some(open) {
            return None;
        }
        let mut scan = Scanner::at(self.input, self.pos + 1);
        let mut depth = 1usize;
        let mut delimiters = NextHit::new(&scan, |s| s.find_any3(open, close, b'"'));
        let mut others = NextHit::new(&scan, |s| s.find_any2(b'\'', b'<'));

        loop {
            let at = delimiters.get(&scan).into_iter().chain(others.get(&scan)).min()?;
            scan.set_position(at);

            match scan.peek()? {
                b if b == open => {
                    depth += 1;
                    scan.advance(1);
                }
                b if b == close => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = (self.pos + 1, at);
                        self.pos = at + 1;
                        return Some(inner);
                    }
                    scan.advance(1);
                }
                b'"' | b'\'' => {
                    scan.read_quoted()?;
                }
                _ if scan.starts_with(b"<!--") => {
                    scan.advance(4);
                    let end = scan.find_str(b"-->")?;
                    scan.set_position(end + 3);
                }
                _ => scan.advance(1),
            }
        }
    }

    #[inline]
    fn find_any2(&self, a: u8, b: u8) -> Option<usize> {
        memchr2(a, b, self.remaining()).map(|i| self.pos + i)
    }

    #[inline]
    fn find_any3(&self, a: u8, b: u8, c: u8) -> Option<usize> {
        memchr3(a, b, c, self.remaining()).map(|i| self.pos + i)
    }
}

/// Offset of the next hit of a forward search.
///
/// The search reruns only once the cursor has moved past the cached hit,
/// so every byte is searched at most once.
struct NextHit<F> {
    search: F,
    at: Option<usize>,
}

impl<F> NextHit<F>
where
    F: Fn(&Scanner<'_>) -> Option<usize>,
{
    fn new(scanner: &Scanner<'_>, search: F) -> Self {
        let at = search(scanner);
        NextHit { search, at }
    }

    fn get(&mut self, scanner: &Scanner<'_>) -> Option<usize> {
        if self.at.is_some_and(|at| at < scanner.pos) {
            self.at = (self.search)(scanner);
        }
        self.at
    }
}

/// Whitespace as the tokenizer sees it: space, tab, LF, CR, VT and FF
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Char form of [`is_space`], for trimming `str`s
#[inline]
pub fn is_space_char(c: char) -> bool {
    u8::try_from(c).is_ok_and(is_space)
}

/// Check if byte may appear in a tag or attribute name
/// ASCII letters and digits, plus '-', ':' and '_'
#[inline]
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let scanner = Scanner::new(b"hello <world>");
        assert_eq!(scanner.find_tag_start(), Some(6));
    }

    #[test]
    fn test_find_str() {
        let mut scanner = Scanner::new(b"<!-- a - b -->");
        scanner.advance(4);
        assert_eq!(scanner.find_str(b"-->"), Some(11));
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new(b"xml:lang-x_1=\"en\"");
        assert_eq!(scanner.read_name(), Some((0, 12)));
        assert_eq!(scanner.peek(), Some(b'='));
        assert_eq!(scanner.read_name(), None);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new(b"  \t\n\x0b\x0c hello");
        assert_eq!(scanner.skip_whitespace(), 7);
        assert_eq!(scanner.position(), 7);
    }

    #[test]
    fn test_read_quoted_requires_matching_quote() {
        let mut scanner = Scanner::new(b"'a\"b' rest");
        assert_eq!(scanner.read_quoted(), Some((1, 4)));
        assert_eq!(scanner.position(), 5);

        let mut unterminated = Scanner::new(b"\"abc'");
        assert_eq!(unterminated.read_quoted(), None);
        assert_eq!(unterminated.position(), 0);
    }

    #[test]
    fn test_read_balanced_nested() {
        let input = b"[a [b] c]>";
        let mut scanner = Scanner::new(input);
        assert_eq!(scanner.read_balanced(b'[', b']'), Some((1, 8)));
        assert_eq!(scanner.peek(), Some(b'>'));
    }

    #[test]
    fn test_read_balanced_skips_literals_and_comments() {
        let input = b"[<!ENTITY x \"]\"> <!-- don't ] --> ]";
        let mut scanner = Scanner::new(input);
        assert_eq!(scanner.read_balanced(b'[', b']'), Some((1, input.len() - 1)));
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_read_balanced_large_run() {
        let mut input = b"[".to_vec();
        for _ in 0..50_000 {
            input.extend_from_slice(b"\"[]\" '[' <!-- ] --> <a>[]");
        }
        input.extend_from_slice(b"]>");

        let mut scanner = Scanner::new(&input);
        assert_eq!(scanner.read_balanced(b'[', b']'), Some((1, input.len() - 2)));
        assert_eq!(scanner.peek(), Some(b'>'));
    }

    #[test]
    fn test_read_balanced_bare_lt() {
        let mut scanner = Scanner::new(b"[a < b <!-->]-->]");
        assert_eq!(scanner.read_balanced(b'[', b']'), Some((1, 16)));
    }

    #[test]
    fn test_read_balanced_unclosed() {
        let mut scanner = Scanner::new(b"[a [b]");
        assert_eq!(scanner.read_balanced(b'[', b']'), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_only_whitespace_remains() {
        let mut scanner = Scanner::new(b"<a/> \n");
        scanner.advance(4);
        assert!(scanner.only_whitespace_remains());
        scanner.set_position(3);
        assert!(!scanner.only_whitespace_remains());
    }
}
