// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Removing comments from source text, as a purely lexical pass
//! (parentheses are not looked at). Quoted strings are copied
//! verbatim, so comment syntax inside them survives.

use crate::settings::Format;

/// Length in bytes of the string starting with `"` at the start of
/// `s`, including both delimiters. `None` if it is not closed.
fn string_len(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Some(i + 1)
        }
    }
    None
}

fn ends_token(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '"'
}

/// Length in bytes of the single-quoted part starting with `'` at the
/// start of `s`, including both quotes. It has to be closed within
/// the same bare token, so that whether it protects its contents
/// does not depend on what surrounds the token.
fn quoted_len(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if ends_token(c) {
            return None
        }
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            return Some(i + 1)
        }
    }
    None
}

/// Replaces comments by whitespace that keeps the line and column of
/// everything after them.
pub fn strip_comments(text: &str, format: &Format) -> String {
    let open = format.block_comment_open.as_str();
    let close = format.block_comment_close.as_str();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let skip;
        if c == '"' {
            // An unterminated string is left for the tokenizer to
            // complain about.
            skip = string_len(rest).unwrap_or(rest.len());
            out.push_str(&rest[..skip]);
        } else if c == '\'' && out.chars().next_back().map_or(true, ends_token) {
            skip = quoted_len(rest).unwrap_or(1);
            out.push_str(&rest[..skip]);
        } else if rest.starts_with(open) {
            // Does not nest; unterminated runs to the end of input.
            let body = &rest[open.len()..];
            skip = match body.find(close) {
                Some(i) => open.len() + i + close.len(),
                None => rest.len(),
            };
            let comment = &rest[..skip];
            let last_line = match comment.rfind('\n') {
                Some(i) => {
                    out.extend(comment.chars().filter(|c| *c == '\n'));
                    &comment[i + 1..]
                }
                None => comment,
            };
            out.extend(last_line.chars().map(|_| ' '));
        } else if format.line_comment_prefixes.iter()
            .any(|p| rest.starts_with(p.as_str()))
        {
            // The line end stays, it separates tokens
            skip = rest.find(|c| c == '\n' || c == '\r').unwrap_or(rest.len());
        } else {
            skip = c.len_utf8();
            out.push(c);
        }
        rest = &rest[skip..];
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> String {
        strip_comments(s, &Format::default())
    }

    #[test]
    fn line_comments() {
        assert_eq!(strip("(a b c) ; this is ignored"), "(a b c) ");
        assert_eq!(strip("(a ; one\n b ;; two\r\n c)"), "(a \n b \r\n c)");
    }

    #[test]
    fn comment_syntax_in_strings() {
        let s = "(a \"; not a comment\" b)";
        assert_eq!(strip(s), s);
        let s = "(a \"#| still \\\" text |#\" b)";
        assert_eq!(strip(s), s);
        let s = "(a 'x;y' b)";
        assert_eq!(strip(s), s);
        // the quote has to close within the token
        assert_eq!(strip("(a 'x ; y' b)"), "(a 'x ");
        assert_eq!(strip("(a 'x ; y\n b)"), "(a 'x \n b)");
        // and only opens at its start
        assert_eq!(strip("(a'\n'b ; c')"), "(a'\n'b ");
        assert_eq!(strip("(x'y;z' w)"), "(x'y");
    }

    #[test]
    fn block_comments() {
        assert_eq!(strip("(a #|\n just\n a comment |#\n b)"),
                   format!("(a \n\n{}\n b)", " ".repeat(13)));
        assert_eq!(strip("(a#|x|#b)"), "(a     b)");
        assert_eq!(strip("(a #| unterminated"), format!("(a {}", " ".repeat(15)));
    }

    #[test]
    fn idempotent() {
        for s in ["(a ; x\n \"; y\" #| z |# b)",
                  "##|x|#|",
                  "(a 'b ; c\n d)",
                  "\"unterminated ; string"] {
            let once = strip(s);
            assert_eq!(strip(&once), once);
        }
    }
}
