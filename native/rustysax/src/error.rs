//! Parse errors and error handlers
//!
//! Every well-formedness violation is handed to the configured
//! [`ErrorHandler`] together with the character position where it was
//! found. The handler decides whether the parse stops.

use thiserror::Error;

/// Kind of well-formedness or grammar violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Non-whitespace text left over that contains no tag
    UnparsableText,
    /// Input ended while tags were still open
    IncompleteDocument,
    /// `<?xml ...?>` could not be matched
    Declaration,
    /// XML declaration found after the first character
    DeclarationNotAtStart,
    /// XML declaration without a `version` attribute
    DeclarationAttributes,
    ProcessingInstruction,
    Comment,
    Cdata,
    Doctype,
    /// End tag carrying attributes
    EndTagAttributes,
    /// End tag that does not close the innermost open tag
    UnbalancedTag,
    /// Quoted attribute value still open at end of input
    UnterminatedAttribute,
}

impl ErrorKind {
    /// Base message for this kind
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::UnparsableText => "Unparsable text",
            ErrorKind::IncompleteDocument => "Incomplete XML document",
            ErrorKind::Declaration => "Error parsing XMLDecl",
            ErrorKind::DeclarationNotAtStart => "XMLDecl not at start of document",
            ErrorKind::DeclarationAttributes => "Invalid XMLDecl attributes",
            ErrorKind::ProcessingInstruction => "Error parsing processing instruction",
            ErrorKind::Comment => "Error parsing comment",
            ErrorKind::Cdata => "Error parsing CDATA",
            ErrorKind::Doctype => "Error parsing DTD",
            ErrorKind::EndTagAttributes => "End tag attributes invalid",
            ErrorKind::UnbalancedTag => "Unbalanced tag",
            ErrorKind::UnterminatedAttribute => "Unterminated attribute value",
        }
    }

    /// Fatal errors end the parse even when the handler returns `Ok`
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::UnterminatedAttribute)
    }
}

/// A violation found while tokenizing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} [char={position}]")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based character position
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        ParseError {
            kind,
            message: kind.message().to_owned(),
            position,
        }
    }

    /// Error naming the offending tag, e.g. `Unbalanced tag (/b)`
    pub fn for_end_tag(kind: ErrorKind, tag: &str, position: usize) -> Self {
        ParseError {
            kind,
            message: format!("{} (/{tag})", kind.message()),
            position,
        }
    }
}

/// Strategy invoked for every violation.
///
/// Returning `Err` aborts the parse with that error. Returning `Ok` lets
/// the tokenizer carry on past the offending construct; the open-tag stack
/// is not repaired after a tag-balance error.
pub trait ErrorHandler {
    fn handle(&mut self, error: ParseError) -> Result<(), ParseError>;
}

/// Default handler: the first violation aborts the parse
#[derive(Debug, Clone, Copy, Default)]
pub struct Abort;

impl ErrorHandler for Abort {
    fn handle(&mut self, error: ParseError) -> Result<(), ParseError> {
        Err(error)
    }
}

/// Logs each violation as a warning and keeps going
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAndContinue;

impl ErrorHandler for LogAndContinue {
    fn handle(&mut self, error: ParseError) -> Result<(), ParseError> {
        tracing::warn!(kind = ?error.kind, position = error.position, "{}", error.message);
        Ok(())
    }
}

impl<F> ErrorHandler for F
where
    F: FnMut(ParseError) -> Result<(), ParseError>,
{
    fn handle(&mut self, error: ParseError) -> Result<(), ParseError> {
        self(error)
    }
}
