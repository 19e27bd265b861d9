// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating comment-free text to a token stream. The only tokens
//! that denote nesting are `Token::Open` and `Token::Close`; strings
//! and bare tokens are kept in their source spelling, deciding what
//! a bare token means is left to [read](../read/index.html) and
//! [Dialect](../dialect/struct.Dialect.html).

use crate::chars::positioned_chars;
use crate::pos::Pos;
use kstring::KString;
use thiserror::Error;
use genawaiter::rc::Gen;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("malformed string: missing closing '\"' for string starting")]
    MalformedString,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("multiple root expressions, the second one starting")]
    MultipleRootExpressions,
    #[error("missing root expression")]
    MissingRootExpression,
    #[error("nesting too deep")]
    NestingTooDeep,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{err} {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseError {
    pub fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    /// Including the delimiters, escapes undecoded
    String(KString),
    /// Symbols, numbers, keywords
    Bare(KString),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
            Token::String(s) => f.write_str(s),
            Token::Bare(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos(pub Token, pub Pos);

pub fn maybe_open_close(c: char) -> Option<Token> {
    match c {
        '(' => Some(Token::Open),
        ')' => Some(Token::Close),
        _ => None
    }
}

fn is_bare_char(c: char) -> bool {
    !c.is_whitespace()
        && maybe_open_close(c).is_none()
        && c != '"'
}

// Copies the string starting at `startpos` (the opening quote has
// been consumed already) into `out`, verbatim.
fn read_delimited(
    startpos: Pos,
    cs: &mut impl Iterator<Item = (char, Pos)>,
    out: &mut String
) -> Result<(), ParseErrorWithPos>
{
    out.clear();
    out.push('"');
    let mut escaped = false;
    for (c, _pos) in cs {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok(())
        }
    }
    Err(ParseError::MalformedString.at(startpos))
}

// Returns the first character not accepted, if any.
fn read_while(
    c: char,
    cs: &mut impl Iterator<Item = (char, Pos)>,
    accepted: fn(char) -> bool,
    out: &mut String,
) -> Option<(char, Pos)> {
    out.clear();
    out.push(c);
    for (c, pos) in cs {
        if accepted(c) {
            out.push(c);
        } else {
            return Some((c, pos))
        }
    }
    None
}

/// The token stream of `text`, which must not contain comments
/// anymore (see [strip_comments](../strip/fn.strip_comments.html)).
/// Stops after the first error.
pub fn tokenize<'s>(
    text: &'s str,
)
    -> impl Iterator<Item = Result<TokenWithPos, ParseErrorWithPos>> + 's
{
    Gen::new(|co| async move {
        let mut cs = positioned_chars(text);
        let mut tmp = String::new();
        let mut maybe_next_c_pos = None;
        loop {
            let (c, pos) =
                if let Some(cp) = maybe_next_c_pos.take() {
                    cp
                } else if let Some(cp) = cs.next() {
                    cp
                } else {
                    return
                };

            if let Some(t) = maybe_open_close(c) {
                co.yield_(Ok(TokenWithPos(t, pos))).await;
            } else if c.is_whitespace() {
                // insignificant
            } else if c == '"' {
                match read_delimited(pos, &mut cs, &mut tmp) {
                    Err(e) => {
                        co.yield_(Err(e)).await;
                        return;
                    }
                    Ok(()) => {
                        co.yield_(Ok(
                            TokenWithPos(
                                Token::String(KString::from_ref(&tmp)),
                                pos))).await;
                    }
                }
            } else {
                maybe_next_c_pos = read_while(c, &mut cs, is_bare_char, &mut tmp);
                co.yield_(Ok(
                    TokenWithPos(
                        Token::Bare(KString::from_ref(&tmp)),
                        pos))).await;
            }
        }
    }).into_iter()
}
