// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use fnsexpr::dialect::Dialect;
use fnsexpr::interpret::Context;
use fnsexpr::parse::{Token, tokenize, TokenWithPos};
use fnsexpr::read::read_named;
use fnsexpr::settings::{ParseOptions, SerializeOptions};
use clap::Parser as ClapParser;
use std::io::Read;
use std::path::PathBuf;
use anyhow::{Result, bail};


fn indentstr(i: usize) -> Option<&'static str> {
    "                                                                  ".get(0..i)
}

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Stream the tokens instead of building a tree
    #[clap(short, long, value_parser)]
    tokens: bool,
    /// Show the token position (only with --tokens)
    #[clap(long, value_parser)]
    pos: bool,
    /// Print how each node is classified
    #[clap(short, long, value_parser)]
    dump: bool,
    /// Print the result of interpreting with the default handlers
    #[clap(short, long, value_parser)]
    interpret: bool,
    /// The input is a sequence of forms without enclosing parentheses
    #[clap(long, value_parser)]
    bare: bool,
    /// Path to the input file, `-` for stdin
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dialect = Dialect::default();

    let text = if args.input_path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(&args.input_path)?
    };
    let name = args.input_path.to_string_lossy();

    if args.tokens {

        // Read through the token stream and just do some bookkeeping
        // and print the tokens.

        let stripped = dialect.strip_comments(&text);
        let mut count_toplevel = 0;
        let mut count_enter = 0;
        let mut depth: usize = 0;
        for te in tokenize(&stripped) {
            let TokenWithPos(token, pos) = te?;
            let indentlevel;
            match token {
                Token::Open => {
                    count_enter += 1;
                    if depth == 0 {
                        count_toplevel += 1;
                    }
                    indentlevel = depth;
                    depth += 1;
                }
                Token::Close => {
                    if depth == 0 {
                        bail!("unexpected closing character ')' at {name}{pos}")
                    }
                    depth -= 1;
                    indentlevel = depth;
                }
                _ => {
                    indentlevel = depth;
                }
            }
            if let Some(indent) = indentstr(indentlevel) {
                if args.pos {
                    println!("{indent}{pos} {token}");
                } else {
                    println!("{indent}{token}");
                }
            } else {
                bail!("lists nested too deeply at {name}{pos}")
            }
        }
        println!("; count_toplevel = {count_toplevel}, count_enter = {count_enter}");

    } else {

        let node = read_named(
            &text,
            &name,
            &dialect.settings().format,
            ParseOptions { included_root_parentheses: !args.bare })?;
        if args.dump {
            println!("{}", dialect.dump(&node));
        } else if args.interpret {
            println!("{}", dialect.interpret(&node, &Context::new())?);
        } else {
            println!("{}", dialect.serialize(
                &node,
                SerializeOptions { including_root_parentheses: !args.bare }));
        }

    }
    Ok(())
}
