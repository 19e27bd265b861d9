// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building a [Node](../node/enum.Node.html) tree from text: strip
//! comments, tokenize, then nest the tokens, checking that there is
//! exactly one root expression.

use crate::pos::Pos;
use crate::origin::Origin;
use crate::parse::{Token, TokenWithPos, tokenize,
                   ParseError, ParseErrorWithPos};
use crate::settings::{Format, ParseOptions};
use crate::strip::strip_comments;
use crate::number::read_number;
use crate::node::Node;
use std::fmt::{Display, Formatter};
use std::path::Path;
use kstring::KString;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub struct ParseErrorWithOrigin {
    err_with_pos: ParseErrorWithPos,
    origin: Origin,
}

impl ParseErrorWithOrigin {
    pub fn error(&self) -> &ParseErrorWithPos {
        &self.err_with_pos
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl Display for ParseErrorWithOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let ParseErrorWithPos { err, pos } = &self.err_with_pos;
        f.write_fmt(format_args!("{} {}", err, self.origin.at(*pos)))
    }
}

#[derive(Error, Debug)]
#[error("{origin}: {err}")]
pub struct IoErrorWithOrigin {
    err: std::io::Error,
    origin: Origin,
}

#[derive(Error, Debug)]
pub enum ReadErrorWithLocation {
    #[error("{0}")]
    Parse(Box<ParseErrorWithOrigin>),
    #[error("{0}")]
    IO(Box<IoErrorWithOrigin>)
}

impl ParseErrorWithPos {
    pub fn with_origin(self, origin: Origin) -> ReadErrorWithLocation {
        ReadErrorWithLocation::Parse(Box::new(
            ParseErrorWithOrigin {
                err_with_pos: self,
                origin
            }))
    }
}


const DEPTH_FUEL: u32 = 500;
// ^ the limit with default settings on Linux is around 1200

fn bare(s: KString) -> Node {
    match read_number(&s) {
        Some(n) => Node::Number(n),
        None => Node::Symbol(s),
    }
}

// Read the item starting with token `t`.
fn read_item(
    t: Token,
    pos: Pos,
    ts: &mut impl Iterator<Item = Result<TokenWithPos, ParseErrorWithPos>>,
    depth_fuel: u32,
) -> Result<Node, ParseErrorWithPos>
{
    match t {
        Token::Open => {
            if depth_fuel == 0 {
                return Err(ParseError::NestingTooDeep.at(pos))
            }
            Ok(Node::Expression(slurp(ts, Some(pos), depth_fuel - 1)?))
        }
        Token::Close => Err(ParseError::UnbalancedParentheses.at(pos)),
        Token::String(s) => Ok(Node::String(s)),
        Token::Bare(s) => Ok(bare(s)),
    }
}

// Read and fill a vector of items up to the close paren matching the
// open paren at `opening`, or to the end of the input if `None`.
fn slurp(
    ts: &mut impl Iterator<Item = Result<TokenWithPos, ParseErrorWithPos>>,
    opening: Option<Pos>,
    depth_fuel: u32,
) -> Result<Vec<Node>, ParseErrorWithPos>
{
    let mut v = Vec::new();
    while let Some(te) = ts.next() {
        let TokenWithPos(t, pos) = te?;
        match t {
            Token::Close => {
                return if opening.is_some() {
                    Ok(v)
                } else {
                    Err(ParseError::UnbalancedParentheses.at(pos))
                }
            }
            t => v.push(read_item(t, pos, ts, depth_fuel)?)
        }
    }
    if let Some(startpos) = opening {
        Err(ParseError::UnbalancedParentheses.at(startpos))
    } else {
        Ok(v)
    }
}

/// Build the tree from a token stream.
pub fn read_tokens(
    ts: impl Iterator<Item = Result<TokenWithPos, ParseErrorWithPos>>,
    options: ParseOptions,
) -> Result<Node, ParseErrorWithPos>
{
    let mut ts = ts;
    if !options.included_root_parentheses {
        return Ok(Node::Expression(slurp(&mut ts, None, DEPTH_FUEL)?))
    }
    let mut root = None;
    while let Some(te) = ts.next() {
        let TokenWithPos(t, pos) = te?;
        if root.is_some() {
            let err = if t == Token::Close {
                ParseError::UnbalancedParentheses
            } else {
                ParseError::MultipleRootExpressions
            };
            return Err(err.at(pos))
        }
        root = Some(read_item(t, pos, &mut ts, DEPTH_FUEL)?);
    }
    root.ok_or_else(|| ParseError::MissingRootExpression.at(Pos::default()))
}

/// Parse `text` into exactly one root node.
pub fn read(
    text: &str,
    format: &Format,
    options: ParseOptions,
) -> Result<Node, ParseErrorWithPos>
{
    let stripped = strip_comments(text, format);
    let node = read_tokens(tokenize(&stripped), options)?;
    trace!(len = text.len(), "read a tree");
    Ok(node)
}

pub fn read_named(
    text: &str,
    name: &str,
    format: &Format,
    options: ParseOptions,
) -> Result<Node, ReadErrorWithLocation>
{
    read(text, format, options)
        .map_err(|e| e.with_origin(Origin::Named(name.to_string())))
}

pub fn read_file(
    path: &Path,
    format: &Format,
    options: ParseOptions,
) -> Result<Node, ReadErrorWithLocation>
{
    let origin = || Origin::File(path.to_path_buf());
    let text = std::fs::read_to_string(path).map_err(|err| {
        ReadErrorWithLocation::IO(Box::new(
            IoErrorWithOrigin { err, origin: origin() }))
    })?;
    read(&text, format, options).map_err(|e| e.with_origin(origin()))
}
