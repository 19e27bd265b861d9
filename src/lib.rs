// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small S-Expression toolkit:
//! 
//! * `fnsexpr::read` strips comments, tokenizes and builds a tree with
//!   exactly one root; the tokenizer, `fnsexpr::parse::tokenize`, can
//!   be used on its own.
//! 
//! * Trees print back as text that reads back into an equal tree.
//! 
//! * What counts as a boolean or null is not part of the grammar but
//!   of a [Dialect](dialect::Dialect), which also classifies nodes and
//!   extracts their values.
//! 
//! * `fnsexpr::interpret` turns a tree into data by dispatching the head
//!   symbol of each expression to a handler ("functional notation").
//!   Handlers are looked up in layered contexts and may be replaced
//!   per symbol, per category, or as a whole set of defaults.
//! 
//! ```
//! use fnsexpr::dialect::Dialect;
//! use fnsexpr::interpret::Context;
//! use fnsexpr::settings::ParseOptions;
//!
//! let dialect = Dialect::default();
//! let tree = dialect.parse("(a (b 1) \"c\")", ParseOptions::default()).unwrap();
//! let value = dialect.interpret(&tree, &Context::new()).unwrap();
//! assert_eq!(value.to_string(), "{ROOT: [{ATOM: a}, {b: [1]}, \"c\"]}");
//! ```

pub mod chars;
pub mod debug;
pub mod dialect;
pub mod interpret;
pub mod node;
pub mod number;
pub mod origin;
pub mod parse;
pub mod pos;
pub mod read;
pub mod settings;
pub mod strip;
pub mod value;
