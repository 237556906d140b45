//! XML Tokenizer - single forward pass over a whole document
//!
//! Each round of the loop:
//! - finds the next `<...>` boundary and the text run before it
//! - emits the text (trimmed and entity-expanded per the options)
//! - classifies the tag by its opening characters
//! - hands it to the matcher for that kind, which decides how far the
//!   construct really extends
//!
//! Element tags keep a stack of open names so end tags can be checked.

use super::attributes::{parse_tag, strip_whitespace, QuoteTracker, PI_TEXT_KEY};
use super::dtd::parse_doctype;
use super::entities::expand_entities;
use super::position::{CharIndex, Span};
use super::scanner::{is_space, Scanner};
use crate::error::{ErrorKind, ParseError};
use crate::options::ParserOptions;
use crate::sax::{EventCollector, Handler, SaxEvent};
use std::borrow::Cow;

/// Type of markup behind a tag boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// XML declaration: <?xml ...?>
    Declaration,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// Comment: <!--...-->
    Comment,
    /// DOCTYPE declaration
    Doctype,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Element start or end tag
    Element,
}

impl TagKind {
    /// Classify a tag body (the text after `<` or `</`) by its first characters
    pub fn classify(body: &str) -> Self {
        let body = body.as_bytes();
        if body.starts_with(b"?xml") && body.get(4).is_some_and(|&b| is_space(b)) {
            TagKind::Declaration
        } else if body.starts_with(b"?") {
            TagKind::ProcessingInstruction
        } else if body.starts_with(b"!--") {
            TagKind::Comment
        } else if body.starts_with(b"!DOCTYPE") {
            TagKind::Doctype
        } else if body.starts_with(b"![CDATA[") {
            TagKind::CData
        } else {
            TagKind::Element
        }
    }
}

/// Preliminary match of `<`, optional `/`, body, optional `/`, `>`.
///
/// `gt` is the first `>` after the `<`; matchers for comments, PIs and
/// the like look past it for their own terminator.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    lt: usize,
    closing: bool,
    body_start: usize,
    body_end: usize,
    self_closing: bool,
    gt: usize,
}

fn next_boundary(bytes: &[u8], from: usize) -> Option<Boundary> {
    let mut scanner = Scanner::at(bytes, from);
    let lt = scanner.find_tag_start()?;
    scanner.set_position(lt + 1);
    let gt = scanner.find_byte(b'>')?;

    let closing = lt + 1 < gt && bytes[lt + 1] == b'/';
    let body_start = if closing { lt + 2 } else { lt + 1 };
    let self_closing = gt > body_start && bytes[gt - 1] == b'/';
    let body_end = if self_closing { gt - 1 } else { gt };

    Some(Boundary {
        lt,
        closing,
        body_start,
        body_end,
        self_closing,
        gt,
    })
}

/// Match `open ... close` anchored at `start`.
/// Returns the text in between and the offset of the last byte of `close`.
fn match_delimited<'a>(input: &'a str, start: usize, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let mut scanner = Scanner::at(input.as_bytes(), start);
    if !scanner.starts_with(open.as_bytes()) {
        return None;
    }
    scanner.advance(open.len());
    let body_start = scanner.position();
    let close_at = scanner.find_str(close.as_bytes())?;
    Some((&input[body_start..close_at], close_at + close.len() - 1))
}

/// Streaming XML tokenizer
///
/// Owns the configuration and the open-tag stack. One instance parses one
/// document at a time; the stack is reset when a parse starts.
#[derive(Debug, Default)]
pub struct Tokenizer {
    options: ParserOptions,
    stack: Vec<String>,
}

impl Tokenizer {
    /// Create a tokenizer with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Tokenizer {
            options,
            stack: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Options may be changed between parses
    pub fn options_mut(&mut self) -> &mut ParserOptions {
        &mut self.options
    }

    /// Tags left open by the last parse, outermost first
    pub fn open_tags(&self) -> &[String] {
        &self.stack
    }

    /// Tokenize `input`, reporting each construct to `handler`.
    ///
    /// Violations go to the configured error handler; the parse stops with
    /// `Err` as soon as the handler returns one.
    pub fn parse<H: Handler>(&mut self, input: &str, handler: &mut H) -> Result<(), ParseError> {
        self.stack.clear();
        tracing::debug!(
            len = input.len(),
            strip_whitespace = self.options.strip_whitespace,
            expand_entities = self.options.expand_entities,
            "Parsing document"
        );

        let mut pass = Pass {
            input,
            bytes: input.as_bytes(),
            chars: CharIndex::new(input),
            tokenizer: self,
            handler,
            events: 0,
        };
        let result = pass.run();
        let events = pass.events;

        match &result {
            Ok(()) => tracing::debug!(events, "Document parsed"),
            Err(err) => tracing::debug!(events, error = %err, "Parse aborted"),
        }
        result
    }

    /// Parse and return every event as an owned [`SaxEvent`]
    pub fn parse_to_events(&mut self, input: &str) -> Result<Vec<SaxEvent>, ParseError> {
        let mut collector = EventCollector::new();
        self.parse(input, &mut collector)?;
        Ok(collector.take_events())
    }
}

/// State of one `parse` call
struct Pass<'a, 't, H> {
    input: &'a str,
    bytes: &'a [u8],
    chars: CharIndex<'a>,
    tokenizer: &'t mut Tokenizer,
    handler: &'t mut H,
    events: usize,
}

impl<'a, H: Handler> Pass<'a, '_, H> {
    fn run(&mut self) -> Result<(), ParseError> {
        let mut pos = 0;

        loop {
            let Some(boundary) = next_boundary(self.bytes, pos) else {
                return self.finish(pos);
            };

            self.leading_text(pos, boundary.lt);

            let body = &self.input[boundary.body_start..boundary.body_end];
            let end = match TagKind::classify(body) {
                TagKind::Declaration => self.declaration(&boundary)?,
                TagKind::ProcessingInstruction => self.processing_instruction(&boundary)?,
                TagKind::Comment => self.comment(&boundary)?,
                TagKind::Doctype => self.doctype(&boundary)?,
                TagKind::CData => self.cdata(&boundary)?,
                TagKind::Element => self.element(&boundary)?,
            };
            pos = end + 1;
        }
    }

    /// No boundary left: only whitespace may remain, with every tag closed
    fn finish(&mut self, pos: usize) -> Result<(), ParseError> {
        let position = self.chars.position(pos);
        if !self.tokenizer.stack.is_empty() {
            self.raise(ParseError::new(ErrorKind::IncompleteDocument, position))?;
        } else if !Scanner::at(self.bytes, pos).only_whitespace_remains() {
            self.raise(ParseError::new(ErrorKind::UnparsableText, position))?;
        }
        Ok(())
    }

    /// Hand a violation to the error handler. Fatal kinds end the parse
    /// whatever the handler returns.
    fn raise(&mut self, error: ParseError) -> Result<(), ParseError> {
        let handler = self.tokenizer.options.error_handler();
        if error.kind.is_fatal() {
            handler.handle(error.clone())?;
            return Err(error);
        }
        handler.handle(error)
    }

    /// Whitespace stripping then entity expansion, as configured
    fn normalize<'s>(&self, text: &'s str) -> Cow<'s, str> {
        let options = &self.tokenizer.options;
        let text = if options.strip_whitespace {
            strip_whitespace(text)
        } else {
            text
        };
        if options.expand_entities {
            expand_entities(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    fn leading_text(&mut self, start: usize, end: usize) {
        let input = self.input;
        let text = self.normalize(&input[start..end]);
        if text.is_empty() {
            return;
        }
        let span = self.chars.span(start, end);
        self.handler.text(&text, span);
        self.events += 1;
    }

    /// Span from the `<` at `start` through the byte at `end`
    fn span(&mut self, start: usize, end: usize) -> Span {
        self.chars.span(start, end + 1)
    }

    /// Report a grammar mismatch and skip the preliminary boundary
    fn mismatch(&mut self, kind: ErrorKind, boundary: &Boundary) -> Result<usize, ParseError> {
        let position = self.chars.position(boundary.lt);
        self.raise(ParseError::new(kind, position))?;
        Ok(boundary.gt)
    }

    fn declaration(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let Some((body, end)) = match_delimited(self.input, boundary.lt, "<?", "?>") else {
            return self.mismatch(ErrorKind::Declaration, boundary);
        };
        let span = self.span(boundary.lt, end);
        if span.start != 1 {
            self.raise(ParseError::new(ErrorKind::DeclarationNotAtStart, span.start))?;
        }

        let (name, attributes) = parse_tag(body, self.tokenizer.options.expand_entities);
        let attributes = attributes.unwrap_or_default();
        if !attributes.contains_key("version") {
            self.raise(ParseError::new(ErrorKind::DeclarationAttributes, span.start))?;
        }

        self.handler.decl(name, &attributes, span);
        self.events += 1;
        Ok(end)
    }

    fn processing_instruction(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let Some((body, end)) = match_delimited(self.input, boundary.lt, "<?", "?>") else {
            return self.mismatch(ErrorKind::ProcessingInstruction, boundary);
        };
        let span = self.span(boundary.lt, end);

        let (target, attributes) = parse_tag(body, self.tokenizer.options.expand_entities);
        let raw = &body[target.len()..];
        let attributes = if raw.is_empty() {
            attributes
        } else {
            let mut attributes = attributes.unwrap_or_default();
            attributes.insert(PI_TEXT_KEY, raw);
            Some(attributes)
        };

        self.handler.pi(target, attributes.as_ref(), span);
        self.events += 1;
        Ok(end)
    }

    fn comment(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let Some((body, end)) = match_delimited(self.input, boundary.lt, "<!--", "-->") else {
            return self.mismatch(ErrorKind::Comment, boundary);
        };
        let span = self.span(boundary.lt, end);
        let text = self.normalize(body);
        self.handler.comment(&text, span);
        self.events += 1;
        Ok(end)
    }

    fn cdata(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let Some((body, end)) = match_delimited(self.input, boundary.lt, "<![CDATA[", "]]>") else {
            return self.mismatch(ErrorKind::Cdata, boundary);
        };
        let span = self.span(boundary.lt, end);
        self.handler.cdata(body, span);
        self.events += 1;
        Ok(end)
    }

    fn doctype(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let Some((doctype, end)) = parse_doctype(self.input, boundary.lt) else {
            return self.mismatch(ErrorKind::Doctype, boundary);
        };
        let span = self.span(boundary.lt, end);
        self.handler.doctype(&doctype.root, &doctype, span);
        self.events += 1;
        Ok(end)
    }

    fn element(&mut self, boundary: &Boundary) -> Result<usize, ParseError> {
        let input = self.input;
        let mut gt = boundary.gt;
        let mut body_end = boundary.body_end;
        let mut self_closing = boundary.self_closing;

        // A `>` inside a quoted value ends the preliminary match too early:
        // extend to the next `>` until every quote is closed. `gt` only
        // grows, and running out of input is fatal.
        let mut quotes = QuoteTracker::new();
        while quotes.is_open(&input[boundary.body_start..body_end]) {
            let Some(next) = Scanner::at(self.bytes, gt + 1).find_byte(b'>') else {
                let position = self.chars.position(boundary.lt);
                let error = ParseError::new(ErrorKind::UnterminatedAttribute, position);
                self.raise(error.clone())?;
                return Err(error);
            };
            tracing::trace!(from = gt, to = next, "Extending tag past quoted '>'");
            gt = next;
            self_closing = self.bytes[gt - 1] == b'/';
            body_end = if self_closing { gt - 1 } else { gt };
        }

        let body = &input[boundary.body_start..body_end];
        let (name, attributes) = parse_tag(body, self.tokenizer.options.expand_entities);
        let span = self.span(boundary.lt, gt);

        // `<>`, `</>` and `< a>` name no element
        if name.is_empty() {
            self.raise(ParseError::new(ErrorKind::UnparsableText, span.start))?;
            return Ok(gt);
        }

        if boundary.closing {
            if attributes.is_some() {
                self.raise(ParseError::for_end_tag(ErrorKind::EndTagAttributes, name, span.start))?;
            }
            let open = self.tokenizer.stack.pop();
            if open.as_deref() != Some(name) {
                self.raise(ParseError::for_end_tag(ErrorKind::UnbalancedTag, name, span.start))?;
            }
            self.handler.end_tag(name, span);
            self.events += 1;
        } else {
            self.tokenizer.stack.push(name.to_owned());
            self.handler.start_tag(name, attributes.as_ref(), span);
            self.events += 1;
            if self_closing {
                self.tokenizer.stack.pop();
                self.handler.end_tag(name, span);
                self.events += 1;
            }
        }
        Ok(gt)
    }
}
