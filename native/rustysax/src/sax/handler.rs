//! Handler trait for tokenizer events

use crate::core::attributes::Attributes;
use crate::core::dtd::Doctype;
use crate::core::position::Span;

/// Trait for receiving tokenizer events
///
/// Every method has an empty default body: a sink implements only the
/// events it cares about and the rest are dropped. Spans are 1-based,
/// inclusive character positions in the parsed document.
pub trait Handler {
    /// Called when an element starts
    ///
    /// # Arguments
    /// * `name` - Tag name as written
    /// * `attributes` - Parsed attributes, `None` if the tag has none
    /// * `span` - From `<` through `>`
    fn start_tag(&mut self, _name: &str, _attributes: Option<&Attributes>, _span: Span) {}

    /// Called when an element ends, and right after `start_tag` for a
    /// self-closing tag with the same span
    fn end_tag(&mut self, _name: &str, _span: Span) {}

    /// Called for text between tags, after whitespace and entity handling.
    /// The span covers the raw text run.
    fn text(&mut self, _text: &str, _span: Span) {}

    /// Called for CDATA sections with the content exactly as written
    fn cdata(&mut self, _text: &str, _span: Span) {}

    /// Called for the XML declaration; `name` is always `xml`
    fn decl(&mut self, _name: &str, _attributes: &Attributes, _span: Span) {}

    /// Called for processing instructions
    ///
    /// Text after the target is attached under
    /// [`PI_TEXT_KEY`](crate::core::attributes::PI_TEXT_KEY).
    fn pi(&mut self, _target: &str, _attributes: Option<&Attributes>, _span: Span) {}

    /// Called for comments
    fn comment(&mut self, _text: &str, _span: Span) {}

    /// Called for DOCTYPE declarations
    fn doctype(&mut self, _root: &str, _doctype: &Doctype, _span: Span) {}
}
