//! Property-based tests for the tokenizer
//!
//! Generated well-formed trees must come back balanced with ordered spans,
//! and no input may make the tokenizer panic or loop.

use proptest::prelude::*;
use rustysax::{LogAndContinue, ParserOptions, SaxEvent, Tokenizer};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 200,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Generated documents
// =============================================================================

#[derive(Debug, Clone)]
enum Node {
    Element {
        name: String,
        attribute: Option<(String, String)>,
        children: Vec<Node>,
    },
    Text(String),
    Comment(String),
    CData(String),
}

impl Node {
    fn render(&self, out: &mut String) {
        match self {
            Node::Element {
                name,
                attribute,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                if let Some((key, value)) = attribute {
                    out.push_str(&format!(" {key}=\"{value}\""));
                }
                if children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in children {
                    child.render(out);
                }
                out.push_str(&format!("</{name}>"));
            }
            Node::Text(text) => out.push_str(text),
            Node::Comment(text) => out.push_str(&format!("<!--{text}-->")),
            Node::CData(text) => out.push_str(&format!("<![CDATA[{text}]]>")),
        }
    }
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-z .,]{1,10}".prop_map(Node::Text),
        "[a-z <>]{0,10}".prop_map(Node::Comment),
        "[a-z <>&/]{0,10}".prop_map(Node::CData),
        name().prop_map(|name| Node::Element {
            name,
            attribute: None,
            children: Vec::new(),
        }),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            name(),
            proptest::option::of((name(), "[a-z0-9 >/']{0,8}")),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attribute, children)| Node::Element {
                name,
                attribute,
                children,
            })
    })
}

/// A document: one root element with arbitrary content
fn document() -> impl Strategy<Value = String> {
    (name(), prop::collection::vec(node(), 0..5)).prop_map(|(name, children)| {
        let mut out = String::new();
        Node::Element {
            name,
            attribute: None,
            children,
        }
        .render(&mut out);
        out
    })
}

// =============================================================================
// Property: well-formed input comes back balanced
// =============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn generated_documents_are_balanced(input in document()) {
        let mut tokenizer = Tokenizer::new();
        let events = tokenizer.parse_to_events(&input).unwrap();

        let mut stack = Vec::new();
        for event in &events {
            match event {
                SaxEvent::StartTag { name, .. } => stack.push(name.clone()),
                SaxEvent::EndTag { name, .. } => {
                    let popped = stack.pop();
                    prop_assert_eq!(popped.as_ref(), Some(name));
                }
                _ => {}
            }
        }
        prop_assert!(stack.is_empty());
        prop_assert!(tokenizer.open_tags().is_empty());
    }

    #[test]
    fn spans_are_ordered(input in document()) {
        let events = Tokenizer::new().parse_to_events(&input).unwrap();
        let chars = input.chars().count();

        for pair in events.windows(2) {
            let (prev, next) = (pair[0].span(), pair[1].span());
            // A self-closing tag reports the same span twice
            prop_assert!(next.start > prev.end || next == prev, "{:?} then {:?}", prev, next);
        }
        for event in &events {
            let span = event.span();
            prop_assert!(span.start >= 1 && span.end <= chars);
            if event.is_start_tag() || event.is_end_tag() {
                let source = span.slice(&input);
                prop_assert!(source.starts_with('<') && source.ends_with('>'));
            }
        }
    }

    #[test]
    fn quoted_gt_stays_in_attribute_value(key in name(), value in "[a-z>/ ]{0,12}") {
        let input = format!("<r {key}='{value}'/>");
        let events = Tokenizer::new().parse_to_events(&input).unwrap();
        prop_assert_eq!(events.len(), 2);
        let attributes = events[0].attributes().unwrap();
        prop_assert_eq!(attributes.get(&key), Some(value.as_str()));
    }
}

// =============================================================================
// Property: arbitrary input never panics
// =============================================================================

fn lenient() -> Tokenizer {
    Tokenizer::with_options(ParserOptions::new().with_error_handler(LogAndContinue))
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn never_panics_on_any_text(input in "\\PC{0,300}") {
        let _ = lenient().parse_to_events(&input);
        let _ = Tokenizer::new().parse_to_events(&input);
    }

    #[test]
    fn never_panics_on_markup_soup(input in "[<>/?!a-zé\"'= \\[\\]\\-&;#x]{0,300}") {
        let mut tokenizer = lenient();
        if let Ok(events) = tokenizer.parse_to_events(&input) {
            for pair in events.windows(2) {
                prop_assert!(pair[1].span().start >= pair[0].span().start);
            }
        }
    }
}
