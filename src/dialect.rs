// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A configured S-expression variant: which bare tokens are
//! booleans or null, and what comments look like. Entry point for
//! parsing, serializing, classifying and interpreting.

use crate::interpret::{self, Context, DispatchError, Entity, State, Category};
use crate::node::Node;
use crate::number::Number;
use crate::parse::ParseErrorWithPos;
use crate::read::{self, ReadErrorWithLocation};
use crate::settings::{Settings, ConfigurationError, ParseOptions, SerializeOptions};
use crate::strip;
use crate::value::Value;
use kstring::KString;
use std::path::Path;

/// What a node is. Every leaf has exactly one of the leaf kinds;
/// they are checked in the order listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Expression,
    Number,
    String,
    Boolean,
    Null,
    Atom,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Expression => "expression",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Atom => "atom",
        }
    }

    /// The handler category leaves of this kind are dispatched to.
    pub fn category(self) -> Option<Category> {
        match self {
            Kind::Expression => None,
            Kind::Number => Some(Category::Number),
            Kind::String => Some(Category::String),
            Kind::Boolean => Some(Category::Boolean),
            Kind::Null => Some(Category::Null),
            Kind::Atom => Some(Category::Atom),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dialect {
    settings: Settings,
}

fn contains(list: &[KString], s: &str) -> bool {
    list.iter().any(|k| k.as_str() == s)
}

/// Decode the contents of a string token (delimiters already
/// removed). Escapes that don't mean anything else stand for the
/// escaped character.
fn decode_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut cs = s.chars();
    while let Some(c) = cs.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let c = match cs.next() {
            Some(c) => c,
            None => {
                out.push('\\');
                break;
            }
        };
        match c {
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'v' => out.push('\x0B'),
            'f' => out.push('\x0C'),
            '0' => out.push('\0'),
            'u' => {
                let digits: String = cs.clone().take(4).collect();
                let code = if digits.len() == 4 {
                    digits.chars().try_fold(0u32, |n, d| Some(n * 16 + d.to_digit(16)?))
                } else {
                    None
                };
                match code.and_then(char::from_u32) {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..4 {
                            cs.next();
                        }
                    }
                    None => out.push('u'),
                }
            }
            _ => out.push(c),
        }
    }
    out
}

impl Dialect {
    pub fn new(settings: Settings) -> Result<Dialect, ConfigurationError> {
        settings.check()?;
        Ok(Dialect { settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn strip_comments(&self, text: &str) -> String {
        strip::strip_comments(text, &self.settings.format)
    }

    pub fn parse(&self, text: &str, options: ParseOptions)
                 -> Result<Node, ParseErrorWithPos> {
        read::read(text, &self.settings.format, options)
    }

    pub fn parse_file(&self, path: &Path, options: ParseOptions)
                      -> Result<Node, ReadErrorWithLocation> {
        read::read_file(path, &self.settings.format, options)
    }

    pub fn serialize(&self, node: &Node, options: SerializeOptions) -> String {
        node.serialize(options)
    }

    /// Interpret `node` with a fresh state, as the root entity.
    pub fn interpret(&self, node: &Node, context: &Context)
                     -> Result<Value, DispatchError> {
        let mut state = State::new();
        self.interpret_with(node, context, &mut state, &Category::Root.into())
    }

    pub fn interpret_with(&self, node: &Node, context: &Context,
                          state: &mut State, entity: &Entity)
                          -> Result<Value, DispatchError> {
        interpret::interpret(self, node, context, state, entity)
    }

    pub fn classify(&self, node: &Node) -> Kind {
        let k = &self.settings.keywords;
        match node {
            Node::Expression(_) => Kind::Expression,
            Node::Number(_) => Kind::Number,
            Node::String(_) => Kind::String,
            Node::Symbol(s) => {
                if contains(&k.truthy, s) || contains(&k.falsy, s) {
                    Kind::Boolean
                } else if contains(&k.nully, s) {
                    Kind::Null
                } else {
                    Kind::Atom
                }
            }
        }
    }

    pub fn is_expression(&self, node: &Node) -> bool {
        node.is_expression()
    }
    pub fn is_number(&self, node: &Node) -> bool {
        self.classify(node) == Kind::Number
    }
    pub fn is_string(&self, node: &Node) -> bool {
        self.classify(node) == Kind::String
    }
    pub fn is_boolean(&self, node: &Node) -> bool {
        self.classify(node) == Kind::Boolean
    }
    pub fn is_null(&self, node: &Node) -> bool {
        self.classify(node) == Kind::Null
    }
    pub fn is_atom(&self, node: &Node) -> bool {
        self.classify(node) == Kind::Atom
    }

    /// Whether `node` is the atom `name`.
    pub fn is_atom_named(&self, node: &Node, name: &str) -> bool {
        match node {
            Node::Symbol(s) => s.as_str() == name && self.is_atom(node),
            _ => false
        }
    }

    /// Whether `node` is a boolean with value `b`.
    pub fn is_boolean_of(&self, node: &Node, b: bool) -> bool {
        self.is_boolean(node) && self.value_of(node) == Value::Bool(b)
    }

    /// Whether `node` is a number equal to `n`.
    pub fn is_number_of(&self, node: &Node, n: impl Into<Number>) -> bool {
        match node {
            Node::Number(m) => *m == n.into(),
            _ => false
        }
    }

    /// Whether `node` is a string with (decoded) contents `s`.
    pub fn is_string_of(&self, node: &Node, s: &str) -> bool {
        self.is_string(node) && self.value_of(node).as_str() == Some(s)
    }

    /// Anything but a falsy keyword is truthy.
    pub fn is_truthy(&self, node: &Node) -> bool {
        match node {
            Node::Symbol(s) => !contains(&self.settings.keywords.falsy, s),
            _ => true
        }
    }

    /// The plain value of a node: strings without delimiters and with
    /// escapes decoded, booleans and null as such, numbers and atoms
    /// as they are. Expressions are returned as a whole.
    pub fn value_of(&self, node: &Node) -> Value {
        match (self.classify(node), node) {
            (Kind::Number, Node::Number(n)) => Value::Number(n.clone()),
            (Kind::String, Node::String(s)) => {
                let s = s.as_str();
                let inner = s.strip_prefix('"').unwrap_or(s);
                let inner = inner.strip_suffix('"').unwrap_or(inner);
                Value::String(KString::from_string(decode_escapes(inner)))
            }
            (Kind::Boolean, Node::Symbol(s)) =>
                Value::Bool(contains(&self.settings.keywords.truthy, s)),
            (Kind::Null, _) => Value::Null,
            (Kind::Atom, Node::Symbol(s)) => Value::Symbol(s.clone()),
            _ => Value::Node(node.clone()),
        }
    }

    /// The boolean node for `v`, spelled as the first truthy or falsy
    /// keyword.
    pub fn boolean(&self, v: bool) -> Node {
        let k = &self.settings.keywords;
        let list = if v { &k.truthy } else { &k.falsy };
        // non-empty, see Settings::check
        Node::Symbol(list.first().cloned().unwrap_or_else(|| KString::from_static("")))
    }

    pub fn null(&self) -> Node {
        let nully = &self.settings.keywords.nully;
        Node::Symbol(nully.first().cloned().unwrap_or_else(|| KString::from_static("")))
    }
}
