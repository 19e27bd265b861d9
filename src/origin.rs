// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where a text came from, for error messages.

use crate::pos::Pos;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    /// Text that does not come from a file, e.g. `stdin`
    Named(String),
}

impl Origin {
    /// For use after an error message and a space: "in" or "from"
    /// the origin, followed by `pos`.
    pub fn at(&self, pos: Pos) -> OriginAt<'_> {
        OriginAt(self, pos)
    }
}

/// For use before a colon and an error message.
impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Origin::File(path) => f.write_fmt(format_args!("{:?}", path)),
            Origin::Named(name) => f.write_fmt(format_args!("({})", name)),
        }
    }
}

pub struct OriginAt<'o>(&'o Origin, Pos);

impl<'o> Display for OriginAt<'o> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let OriginAt(origin, pos) = self;
        match origin {
            Origin::File(_) => f.write_fmt(format_args!("in {}{}", origin, pos)),
            Origin::Named(_) => f.write_fmt(format_args!("from {}{}", origin, pos)),
        }
    }
}
