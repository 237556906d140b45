//! SAX (Simple API for XML) Module
//!
//! The tokenizer reports what it finds to a [`Handler`]:
//!
//! ```text
//! Tokenizer ---> Handler (your sink)
//!           \--> EventCollector ---> SaxEvent[]
//!                                       |
//!                                       v
//!                                 Elixir Terms (via NIF)
//! ```
//!
//! ## Event Types
//!
//! - `StartTag` / `EndTag` - element tags; a self-closing tag yields both
//! - `Text` - character data between tags
//! - `CData` - CDATA section content, verbatim
//! - `Comment` - comment content
//! - `Decl` - the `<?xml ...?>` declaration
//! - `Pi` - processing instruction target and attributes
//! - `Doctype` - DOCTYPE record
//!
//! Every event carries the 1-based inclusive character span it covers.

pub mod collector;
pub mod events;
pub mod handler;

pub use collector::EventCollector;
pub use events::SaxEvent;
pub use handler::Handler;
