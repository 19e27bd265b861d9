// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tree built by [read](../read/index.html).

//! Leaves keep the text they were read from, except numbers. Whether
//! a `Symbol` is a boolean, null, or an atom depends on the keywords
//! of the [Dialect](../dialect/struct.Dialect.html) asking, so it is
//! not decided here.

use crate::number::Number;
use crate::settings::SerializeOptions;
use std::fmt::Write;
use kstring::KString;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expression(Vec<Node>),
    Number(Number),
    /// Including the delimiters, escapes undecoded
    String(KString),
    /// Any other bare token
    Symbol(KString),
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Node::Expression(v) => {
                f.write_char('(')?;
                fmt_children(v, f)?;
                f.write_char(')')
            }
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => f.write_str(s),
            Node::Symbol(s) => f.write_str(s),
        }
    }
}

fn fmt_children(v: &[Node], f: &mut std::fmt::Formatter<'_>)
                -> Result<(), std::fmt::Error> {
    for (i, item) in v.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

struct WithoutParens<'t>(&'t [Node]);

impl<'t> std::fmt::Display for WithoutParens<'t> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        fmt_children(self.0, f)
    }
}

macro_rules! positional {
    ($($name:ident $i:expr),*) => {
        $(
            pub fn $name(&self) -> Option<&Node> {
                self.nth($i)
            }
        )*
    }
}

impl Node {
    /// Text that reads back as `self`. Without root parentheses, the
    /// children of a root expression are written as a sequence
    /// (which has to be read back with `included_root_parentheses`
    /// false); leaves are written the same either way.
    pub fn serialize(&self, options: SerializeOptions) -> String {
        match self {
            Node::Expression(v) if !options.including_root_parentheses =>
                WithoutParens(v).to_string(),
            _ => self.to_string()
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Node::Expression(_))
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Expression(v) => Some(v),
            _ => None
        }
    }

    /// The n-th child, counting from 1; `None` if missing or if
    /// `self` is not an expression.
    pub fn nth(&self, n: usize) -> Option<&Node> {
        self.children()?.get(n.checked_sub(1)?)
    }

    positional!(first 1, second 2, third 3, fourth 4, fifth 5,
                sixth 6, seventh 7, eighth 8, ninth 9, tenth 10);

    /// All children but the first. Empty for `()`.
    pub fn rest(&self) -> Option<&[Node]> {
        let v = self.children()?;
        Some(v.get(1..).unwrap_or(&[]))
    }

    /// Structural equality, same as `==`.
    pub fn is_equal(&self, other: &Node) -> bool {
        self == other
    }

    /// An identifier (symbol) node.
    pub fn identifier(id: &str) -> Node {
        Node::Symbol(KString::from_ref(id))
    }

    pub fn number(n: impl Into<Number>) -> Node {
        Node::Number(n.into())
    }

    /// A string node with contents `s`, quoting and escaping as
    /// necessary.
    pub fn string(s: &str) -> Node {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
        Node::String(KString::from_string(out))
    }

    pub fn expression(children: impl IntoIterator<Item = Node>) -> Node {
        Node::Expression(children.into_iter().collect())
    }
}

/// Whether a child looked up via one of the positional accessors is
/// absent.
pub fn is_missing(node: Option<&Node>) -> bool {
    node.is_none()
}
