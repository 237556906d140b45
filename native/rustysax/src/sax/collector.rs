//! SAX Collector
//!
//! Implements Handler to record events for batch return (tests, NIF).

use super::events::SaxEvent;
use super::handler::Handler;
use crate::core::attributes::Attributes;
use crate::core::dtd::Doctype;
use crate::core::position::Span;

/// Handler that records every event it receives
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<SaxEvent>,
}

impl EventCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(64),
        }
    }

    /// Take the collected events
    pub fn take_events(&mut self) -> Vec<SaxEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[SaxEvent] {
        &self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

impl Handler for EventCollector {
    fn start_tag(&mut self, name: &str, attributes: Option<&Attributes>, span: Span) {
        self.events.push(SaxEvent::StartTag {
            name: name.to_owned(),
            attributes: attributes.cloned(),
            span,
        });
    }

    fn end_tag(&mut self, name: &str, span: Span) {
        self.events.push(SaxEvent::EndTag {
            name: name.to_owned(),
            span,
        });
    }

    fn text(&mut self, text: &str, span: Span) {
        self.events.push(SaxEvent::Text {
            text: text.to_owned(),
            span,
        });
    }

    fn cdata(&mut self, text: &str, span: Span) {
        self.events.push(SaxEvent::CData {
            text: text.to_owned(),
            span,
        });
    }

    fn decl(&mut self, name: &str, attributes: &Attributes, span: Span) {
        self.events.push(SaxEvent::Decl {
            name: name.to_owned(),
            attributes: attributes.clone(),
            span,
        });
    }

    fn pi(&mut self, target: &str, attributes: Option<&Attributes>, span: Span) {
        self.events.push(SaxEvent::Pi {
            target: target.to_owned(),
            attributes: attributes.cloned(),
            span,
        });
    }

    fn comment(&mut self, text: &str, span: Span) {
        self.events.push(SaxEvent::Comment {
            text: text.to_owned(),
            span,
        });
    }

    fn doctype(&mut self, _root: &str, doctype: &Doctype, span: Span) {
        self.events.push(SaxEvent::Doctype {
            doctype: doctype.clone(),
            span,
        });
    }
}
