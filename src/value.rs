// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data: what [value_of](../dialect/struct.Dialect.html#method.value_of)
//! extracts from leaves, and what handlers produce during
//! [interpretation](../interpret/index.html).

use crate::{number::Number, node::Node, interpret::Entity};
use std::fmt::Write;
use indexmap::IndexMap;
use kstring::KString;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    /// Decoded string contents
    String(KString),
    Symbol(KString),
    List(Vec<Value>),
    Map(IndexMap<Entity, Value>),
    /// Uninterpreted (part of a) tree
    Node(Node),
}

impl Value {
    /// A map with the single entry `entity: value`.
    pub fn entry(entity: impl Into<Entity>, value: Value) -> Value {
        let mut m = IndexMap::new();
        m.insert(entity.into(), value);
        Value::Map(m)
    }

    /// The inverse of `entry`: the value under `entity` if `self` is
    /// a map holding it, otherwise `self` unchanged.
    pub fn unwrap_entry(self, entity: &Entity) -> Value {
        match self {
            Value::Map(mut m) => match m.shift_remove(entity) {
                Some(v) => v,
                None => Value::Map(m),
            },
            v => v
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Entity, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s.as_str()),
            _ => None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Value {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(KString::from_ref(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::List(v)
    }
}

fn fmt_string(f: &mut std::fmt::Formatter<'_>, s: &str)
              -> Result<(), std::fmt::Error> {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// JSON-like, except that symbols and keys are written bare.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => fmt_string(f, s),
            Value::Symbol(s) => f.write_str(s),
            Value::List(v) => {
                f.write_char('[')?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
            Value::Map(m) => {
                f.write_char('{')?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_fmt(format_args!("{}: {}", k, v))?;
                }
                f.write_char('}')
            }
            Value::Node(n) => write!(f, "{}", n),
        }
    }
}
