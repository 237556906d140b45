//! Parser configuration

use crate::error::{Abort, ErrorHandler};
use std::fmt;

/// Switches read by the tokenizer at the start of every parse
pub struct ParserOptions {
    /// Trim text and comment content, and drop whitespace-only text
    pub strip_whitespace: bool,
    /// Expand entity references in text, comments and attribute values
    pub expand_entities: bool,
    error_handler: Box<dyn ErrorHandler>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    pub fn with_expand_entities(mut self, expand: bool) -> Self {
        self.expand_entities = expand;
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.set_error_handler(handler);
        self
    }

    /// Replace the error handler
    pub fn set_error_handler(&mut self, handler: impl ErrorHandler + 'static) {
        self.error_handler = Box::new(handler);
    }

    pub fn error_handler(&mut self) -> &mut dyn ErrorHandler {
        self.error_handler.as_mut()
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strip_whitespace: true,
            expand_entities: true,
            error_handler: Box::new(Abort),
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("strip_whitespace", &self.strip_whitespace)
            .field("expand_entities", &self.expand_entities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ParseError};

    #[test]
    fn test_defaults() {
        let mut options = ParserOptions::default();
        assert!(options.strip_whitespace);
        assert!(options.expand_entities);

        let err = ParseError::new(ErrorKind::UnbalancedTag, 4);
        assert_eq!(options.error_handler().handle(err.clone()), Err(err));
    }

    #[test]
    fn test_builder() {
        let mut options = ParserOptions::new()
            .with_strip_whitespace(false)
            .with_expand_entities(false)
            .with_error_handler(|_: ParseError| -> Result<(), ParseError> { Ok(()) });
        assert!(!options.strip_whitespace);
        assert!(!options.expand_entities);
        assert!(options
            .error_handler()
            .handle(ParseError::new(ErrorKind::Comment, 1))
            .is_ok());
    }

    #[test]
    fn test_debug_omits_handler() {
        let text = format!("{:?}", ParserOptions::default());
        assert_eq!(text, "ParserOptions { strip_whitespace: true, expand_entities: true, .. }");
    }
}
