//! SAX Event Types
//!
//! Owned form of the events a [`Handler`](super::Handler) receives.

use crate::core::attributes::Attributes;
use crate::core::dtd::Doctype;
use crate::core::position::Span;

/// A recorded tokenizer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaxEvent {
    /// Start of an element
    StartTag {
        name: String,
        attributes: Option<Attributes>,
        span: Span,
    },

    /// End of an element
    EndTag { name: String, span: Span },

    /// Text content
    Text { text: String, span: Span },

    /// CDATA section
    CData { text: String, span: Span },

    /// XML declaration
    Decl {
        name: String,
        attributes: Attributes,
        span: Span,
    },

    /// Processing instruction
    Pi {
        target: String,
        attributes: Option<Attributes>,
        span: Span,
    },

    /// Comment
    Comment { text: String, span: Span },

    /// DOCTYPE declaration
    Doctype { doctype: Doctype, span: Span },
}

impl SaxEvent {
    /// Span of the source text this event came from
    pub fn span(&self) -> Span {
        match self {
            SaxEvent::StartTag { span, .. }
            | SaxEvent::EndTag { span, .. }
            | SaxEvent::Text { span, .. }
            | SaxEvent::CData { span, .. }
            | SaxEvent::Decl { span, .. }
            | SaxEvent::Pi { span, .. }
            | SaxEvent::Comment { span, .. }
            | SaxEvent::Doctype { span, .. } => *span,
        }
    }

    /// Check if this is a start tag event
    #[inline]
    pub fn is_start_tag(&self) -> bool {
        matches!(self, SaxEvent::StartTag { .. })
    }

    /// Check if this is an end tag event
    #[inline]
    pub fn is_end_tag(&self) -> bool {
        matches!(self, SaxEvent::EndTag { .. })
    }

    /// Check if this is a text event
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, SaxEvent::Text { .. })
    }

    /// Get the tag, target or root name, if the event has one
    pub fn name(&self) -> Option<&str> {
        match self {
            SaxEvent::StartTag { name, .. }
            | SaxEvent::EndTag { name, .. }
            | SaxEvent::Decl { name, .. } => Some(name),
            SaxEvent::Pi { target, .. } => Some(target),
            SaxEvent::Doctype { doctype, .. } => Some(&doctype.root),
            _ => None,
        }
    }

    /// Get the text of a text, CDATA or comment event
    pub fn text(&self) -> Option<&str> {
        match self {
            SaxEvent::Text { text, .. }
            | SaxEvent::CData { text, .. }
            | SaxEvent::Comment { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Get the attributes of a start tag, declaration or PI
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            SaxEvent::StartTag { attributes, .. } | SaxEvent::Pi { attributes, .. } => {
                attributes.as_ref()
            }
            SaxEvent::Decl { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}
