use anyhow::Result;
use fnsexpr::dialect::Dialect;
use fnsexpr::settings::{ParseOptions, SerializeOptions};

const INPUT: &[u8] = include_bytes!("t-input.sexp");
const EXPECTED: &[u8] = include_bytes!("t-expected.sexp");

#[test]
fn t1() -> Result<()> {
    let dialect = Dialect::default();
    let node = dialect.parse(std::str::from_utf8(INPUT)?, ParseOptions::default())?;
    let out = format!("{}\n", dialect.serialize(&node, SerializeOptions::default()));
    assert_eq!(out.as_bytes(), EXPECTED);
    let again = dialect.parse(&out, ParseOptions::default())?;
    assert_eq!(again, node);
    Ok(())
}
