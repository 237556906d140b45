//! Core XML tokenizing primitives
//!
//! - Scanner: memchr-accelerated byte cursor
//! - Position: byte offset to character position mapping
//! - Entities: single-pass entity expansion with Cow (zero-copy when possible)
//! - Attributes: tag name and quoted attribute extraction
//! - DTD: DOCTYPE declaration grammars
//! - Tokenizer: the parse loop driving a [`crate::sax::Handler`]

pub mod attributes;
pub mod dtd;
pub mod entities;
pub mod position;
pub mod scanner;
pub mod tokenizer;
