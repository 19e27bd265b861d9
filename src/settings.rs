// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for both reading (parsing) and writing (serializing)
//! data.

use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unsupported notation: {0:?}")]
    UnsupportedNotation(String),
    #[error("the {0} keyword list must not be empty")]
    EmptyKeywordSet(&'static str),
    #[error("the {0} must not be empty")]
    EmptyCommentDelimiter(&'static str),
}

/// Which bare tokens stand for booleans and null. These are consulted
/// each time a node is classified, the trees themselves only store
/// the token text.
#[derive(Debug, Clone)]
pub struct Keywords {
    pub truthy: Vec<KString>,
    pub falsy: Vec<KString>,
    pub nully: Vec<KString>,
}

fn kstrings(ss: &[&'static str]) -> Vec<KString> {
    ss.iter().copied().map(KString::from_static).collect()
}

impl Default for Keywords {
    fn default() -> Keywords {
        Keywords {
            truthy: kstrings(&["true", "#t"]),
            falsy: kstrings(&["false", "#f"]),
            nully: kstrings(&["null", "#nil"]),
        }
    }
}

/// Comment syntax.
#[derive(Debug, Clone)]
pub struct Format {
    pub line_comment_prefixes: Vec<KString>,
    pub block_comment_open: KString,
    pub block_comment_close: KString,
}

impl Default for Format {
    fn default() -> Format {
        Format {
            line_comment_prefixes: kstrings(&[";"]),
            block_comment_open: KString::from_static("#|"),
            block_comment_close: KString::from_static("|#"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub keywords: Keywords,
    pub format: Format,
}

impl Settings {
    pub fn check(&self) -> Result<(), ConfigurationError> {
        let k = &self.keywords;
        for (name, list) in [("truthy", &k.truthy),
                             ("falsy", &k.falsy),
                             ("nully", &k.nully)] {
            if list.is_empty() {
                return Err(ConfigurationError::EmptyKeywordSet(name))
            }
        }
        let f = &self.format;
        let delimiters = f.line_comment_prefixes.iter()
            .map(|p| ("line comment prefix", p))
            .chain([("block comment opener", &f.block_comment_open),
                    ("block comment closer", &f.block_comment_close)]);
        for (name, delim) in delimiters {
            if delim.is_empty() {
                return Err(ConfigurationError::EmptyCommentDelimiter(name))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// When false, the input is a sequence of sibling forms which
    /// gets wrapped into one root expression.
    pub included_root_parentheses: bool,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions { included_root_parentheses: true }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SerializeOptions {
    pub including_root_parentheses: bool,
}

impl Default for SerializeOptions {
    fn default() -> SerializeOptions {
        SerializeOptions { including_root_parentheses: true }
    }
}
