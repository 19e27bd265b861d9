// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get characters and their positions from an in-memory text.

use crate::pos::Pos;
use genawaiter::rc::Gen;


pub fn positioned_chars<'s>(
    text: &'s str
) -> impl Iterator<Item=(char, Pos)> + 's
{
    Gen::new(|co| async move {
        let mut pos = Pos::default();
        for c in text.chars() {
            co.yield_((c, pos)).await;
            pos = pos.after(c);
        }
    }).into_iter()
}
