//! RustySAX - non-validating streaming XML tokenizer
//!
//! A single forward pass over a whole document delivers start tags, end
//! tags, text, CDATA, comments, processing instructions, the XML
//! declaration and the DOCTYPE to a [`Handler`], each with the 1-based
//! character span it came from. Tag balance is checked against a stack of
//! open names; violations go to the configured [`ErrorHandler`].
//!
//! ```
//! use rustysax::Tokenizer;
//!
//! let events = Tokenizer::new().parse_to_events("<a x='1'>hi</a>").unwrap();
//! assert_eq!(events.len(), 3);
//! assert_eq!(events[1].text(), Some("hi"));
//! ```
//!
//! With the `nif` feature the crate also builds as an Erlang NIF library
//! for `RustySax.Native`.

pub mod core;
pub mod error;
pub mod options;
pub mod sax;

#[cfg(feature = "nif")]
mod term;

pub use crate::core::attributes::{Attributes, PI_TEXT_KEY};
pub use crate::core::dtd::{Doctype, ExternalKind};
pub use crate::core::position::Span;
pub use crate::core::tokenizer::Tokenizer;
pub use error::{Abort, ErrorHandler, ErrorKind, LogAndContinue, ParseError};
pub use options::ParserOptions;
pub use sax::{EventCollector, Handler, SaxEvent};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "nif")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// NIFs
// ============================================================================

#[cfg(feature = "nif")]
mod nif {
    use crate::core::tokenizer::Tokenizer;
    use crate::error::{ErrorKind, ParseError};
    use crate::options::ParserOptions;
    use crate::sax::EventCollector;
    use crate::term::{self, error_to_term, errors_to_term, events_to_term};
    use rustler::{Binary, Encoder, Env, NifResult, Term};
    use std::cell::RefCell;
    use std::rc::Rc;

    const INVALID_UTF8: &str = "Invalid UTF-8 input";

    /// Input as text, or an error at the character where decoding failed
    fn as_text(input: &[u8]) -> Result<&str, ParseError> {
        std::str::from_utf8(input).map_err(|e| {
            let valid = &input[..e.valid_up_to()];
            // The valid prefix is UTF-8 by construction
            let chars = std::str::from_utf8(valid).map_or(0, |s| s.chars().count());
            ParseError {
                kind: ErrorKind::UnparsableText,
                message: INVALID_UTF8.to_owned(),
                position: chars + 1,
            }
        })
    }

    fn options(strip: bool, expand: bool) -> ParserOptions {
        ParserOptions::new()
            .with_strip_whitespace(strip)
            .with_expand_entities(expand)
    }

    /// Parse a document, stopping at the first error.
    ///
    /// Returns `{:ok, events}` or `{:error, {message, position}}`.
    #[rustler::nif(schedule = "DirtyCpu")]
    fn parse_events<'a>(env: Env<'a>, input: Binary<'a>, strip: bool, expand: bool) -> NifResult<Term<'a>> {
        let result = as_text(input.as_slice())
            .and_then(|text| Tokenizer::with_options(options(strip, expand)).parse_to_events(text));

        Ok(match result {
            Ok(events) => (term::ok(), events_to_term(env, events)).encode(env),
            Err(err) => (term::error(), error_to_term(env, &err)).encode(env),
        })
    }

    /// Parse a document, collecting every error instead of stopping.
    ///
    /// Returns `{events, errors}`. An unterminated attribute value still
    /// ends the parse; the events before it are kept.
    #[rustler::nif(schedule = "DirtyCpu")]
    fn parse_events_lenient<'a>(env: Env<'a>, input: Binary<'a>, strip: bool, expand: bool) -> NifResult<Term<'a>> {
        let text = match as_text(input.as_slice()) {
            Ok(text) => text,
            Err(err) => {
                let events = Term::list_new_empty(env);
                return Ok((events, errors_to_term(env, &[err])).encode(env));
            }
        };

        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        let options = options(strip, expand).with_error_handler(move |err: ParseError| -> Result<(), ParseError> {
            sink.borrow_mut().push(err);
            Ok(())
        });

        let mut collector = EventCollector::new();
        // Errors already went to the sink; a fatal one is in there too
        let _ = Tokenizer::with_options(options).parse(text, &mut collector);

        let errors = errors.borrow();
        Ok((events_to_term(env, collector.take_events()), errors_to_term(env, &errors)).encode(env))
    }
}

#[cfg(feature = "nif")]
rustler::init!("Elixir.RustySax.Native");
