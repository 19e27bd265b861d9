// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Utilities for debugging trees and dialects

use crate::{dialect::Dialect, node::Node};

impl Dialect {
    /// The same tree with every expression headed by `list` and every
    /// leaf replaced by `(kind token)`, showing how this dialect
    /// classifies it, e.g. `(list (atom a) (number 1) (boolean #t))`.
    pub fn dump(&self, node: &Node) -> Node {
        match node {
            Node::Expression(vals) => {
                let mut vals2 = Vec::with_capacity(vals.len() + 1);
                vals2.push(Node::identifier("list"));
                for v in vals {
                    vals2.push(self.dump(v));
                }
                Node::Expression(vals2)
            }
            leaf => Node::Expression(vec![
                Node::identifier(self.classify(leaf).name()),
                leaf.clone(),
            ]),
        }
    }
}
