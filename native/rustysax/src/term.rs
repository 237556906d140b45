//! Elixir Term Conversion Utilities
//!
//! Converts SAX events and parse errors to Elixir terms.

use crate::core::attributes::Attributes;
use crate::core::dtd::{Doctype, ExternalKind};
use crate::core::position::Span;
use crate::error::ParseError;
use crate::sax::SaxEvent;
use rustler::{Encoder, Env, NewBinary, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    start_tag,
    end_tag,
    text,
    cdata,
    decl,
    pi,
    comment,
    dtd,
    system,
    public,
}

/// Convert collected events to an Elixir list
pub fn events_to_term<'a>(env: Env<'a>, events: Vec<SaxEvent>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for event in events.into_iter().rev() {
        list = list.list_prepend(event_to_term(env, &event));
    }
    list
}

/// Convert a single event to an Elixir tuple
pub fn event_to_term<'a>(env: Env<'a>, event: &SaxEvent) -> Term<'a> {
    match event {
        SaxEvent::StartTag {
            name,
            attributes,
            span,
        } => (
            start_tag(),
            str_to_binary(env, name),
            optional_attributes_to_term(env, attributes.as_ref()),
            span_to_term(env, *span),
        )
            .encode(env),
        SaxEvent::EndTag { name, span } => {
            (end_tag(), str_to_binary(env, name), span_to_term(env, *span)).encode(env)
        }
        SaxEvent::Text { text: content, span } => {
            (text(), str_to_binary(env, content), span_to_term(env, *span)).encode(env)
        }
        SaxEvent::CData { text: content, span } => {
            (cdata(), str_to_binary(env, content), span_to_term(env, *span)).encode(env)
        }
        SaxEvent::Comment { text: content, span } => {
            (comment(), str_to_binary(env, content), span_to_term(env, *span)).encode(env)
        }
        SaxEvent::Decl {
            name,
            attributes,
            span,
        } => (
            decl(),
            str_to_binary(env, name),
            attributes_to_term(env, attributes),
            span_to_term(env, *span),
        )
            .encode(env),
        SaxEvent::Pi {
            target,
            attributes,
            span,
        } => (
            pi(),
            str_to_binary(env, target),
            optional_attributes_to_term(env, attributes.as_ref()),
            span_to_term(env, *span),
        )
            .encode(env),
        SaxEvent::Doctype { doctype, span } => (
            dtd(),
            str_to_binary(env, &doctype.root),
            doctype_to_term(env, doctype),
            span_to_term(env, *span),
        )
            .encode(env),
    }
}

/// `{message, position}`
pub fn error_to_term<'a>(env: Env<'a>, err: &ParseError) -> Term<'a> {
    (str_to_binary(env, &err.message), err.position).encode(env)
}

/// Errors as a list of `{message, position}`
pub fn errors_to_term<'a>(env: Env<'a>, errors: &[ParseError]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for err in errors.iter().rev() {
        list = list.list_prepend(error_to_term(env, err));
    }
    list
}

fn span_to_term<'a>(env: Env<'a>, span: Span) -> Term<'a> {
    (span.start, span.end).encode(env)
}

/// Attributes as a list of `{name, value}`, sorted by name so output is stable
fn attributes_to_term<'a>(env: Env<'a>, attributes: &Attributes) -> Term<'a> {
    let mut pairs: Vec<_> = attributes.iter().collect();
    pairs.sort_unstable_by(|a, b| b.0.cmp(a.0));

    let mut list = Term::list_new_empty(env);
    for (name, value) in pairs {
        let tuple = (str_to_binary(env, name), str_to_binary(env, value));
        list = list.list_prepend(tuple.encode(env));
    }
    list
}

fn optional_attributes_to_term<'a>(env: Env<'a>, attributes: Option<&Attributes>) -> Term<'a> {
    match attributes {
        Some(attributes) => attributes_to_term(env, attributes),
        None => rustler::types::atom::nil().encode(env),
    }
}

/// `{kind, public_id, uri, internal}` with `nil` for absent parts
fn doctype_to_term<'a>(env: Env<'a>, doctype: &Doctype) -> Term<'a> {
    let nil = rustler::types::atom::nil().encode(env);
    let kind = match doctype.kind {
        Some(ExternalKind::System) => system().encode(env),
        Some(ExternalKind::Public) => public().encode(env),
        None => nil,
    };
    let part = |value: &Option<String>| value.as_deref().map_or(nil, |s| str_to_binary(env, s));

    (
        kind,
        part(&doctype.public_id),
        part(&doctype.uri),
        part(&doctype.internal),
    )
        .encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
