use anyhow::{anyhow, Result};
use fnsexpr::dialect::Dialect;
use fnsexpr::interpret::{Category, Context, DispatchError, Entity, Evaluation,
                         Handlers, Notation, State};
use fnsexpr::settings::ParseOptions;
use fnsexpr::value::Value;
use num::ToPrimitive;
use fnsexpr::number::Number;

fn run(text: &str, context: &Context) -> Result<String> {
    let dialect = Dialect::default();
    let node = dialect.parse(text, ParseOptions::default())?;
    Ok(dialect.interpret(&node, context)?.to_string())
}

fn run_default(text: &str) -> Result<String> {
    run(text, &Context::new())
}

fn integer(v: &Value) -> Option<i64> {
    match v {
        Value::Number(Number::Integer(n)) => n.to_i64(),
        _ => None
    }
}

fn sum() -> Context {
    Context::evaluate(|components, _, _, entity| {
        let mut total = 0;
        for c in components.as_list().unwrap_or(&[]) {
            total += integer(c).ok_or_else(|| DispatchError::failed(
                entity, anyhow!("not an integer: {c}")))?;
        }
        Ok(Value::from(total))
    })
}

#[test]
fn default_handlers() -> Result<()> {
    assert_eq!(run_default("(a b c)")?, "{ROOT: [{ATOM: a}, {ATOM: b}, {ATOM: c}]}");
    assert_eq!(run_default("((a b c))")?, "{ROOT: [{a: [{ATOM: b}, {ATOM: c}]}]}");
    assert_eq!(run_default("(a (b c d) e (f) () (g h))")?,
               "{ROOT: [{ATOM: a}, {b: [{ATOM: c}, {ATOM: d}]}, {ATOM: e}, \
                {f: []}, {}, {g: [{ATOM: h}]}]}");
    assert_eq!(run_default("()")?, "{ROOT: []}");
    assert_eq!(run_default("(1 -2.5 true #f null #nil)")?,
               "{ROOT: [1, -2.5, true, false, null, null]}");
    Ok(())
}

#[test]
fn strings() -> Result<()> {
    assert_eq!(run_default("(\"multi\nline\" \"a \\\"b\\\" c\")")?,
               r#"{ROOT: ["multi\nline", "a \"b\" c"]}"#);
    assert_eq!(run_default("((say \"(not a list)\"))")?,
               r#"{ROOT: [{say: ["(not a list)"]}]}"#);
    Ok(())
}

#[test]
fn entity_keeps_its_spelling() -> Result<()> {
    assert_eq!(run_default("((MixedCase a))")?, "{ROOT: [{MixedCase: [{ATOM: a}]}]}");
    Ok(())
}

#[test]
fn symbol_handlers() -> Result<()> {
    let ctx = Context::new().with_handler("sum", sum());
    assert_eq!(run("((sum 1 2 3) (sum))", &ctx)?, "{ROOT: [6, 0]}");
    // registered and used in different case
    let ctx = Context::new().with_handler("SUM", sum());
    assert_eq!(run("((Sum 4 5))", &ctx)?, "{ROOT: [9]}");
    Ok(())
}

#[test]
fn handler_failure() -> Result<()> {
    let ctx = Context::new().with_handler("sum", sum());
    let dialect = Dialect::default();
    let node = dialect.parse("((sum 1 x))", ParseOptions::default())?;
    let err = dialect.interpret(&node, &ctx).err().ok_or_else(|| anyhow!("no error"))?;
    assert!(matches!(&err, DispatchError::Handler { entity, .. }
                     if *entity == Entity::symbol("sum")));
    assert_eq!(err.to_string(), "handler for 'sum' failed: not an integer: {ATOM: x}");
    Ok(())
}

#[test]
fn function_fallback() -> Result<()> {
    let filters = Context::new()
        .with_handler(Category::Function, Context::evaluate(|_, _, _, entity| {
            Ok(Value::from(format!("filter:{entity}").as_str()))
        }))
        .with_evaluate(|components, _, _, _| Ok(components));
    let ctx = Context::new().with_handler("filters", filters);
    assert_eq!(run("((filters (json (path a)) (zlib)) (other))", &ctx)?,
               r#"{ROOT: [["filter:json", "filter:zlib"], {other: []}]}"#);
    Ok(())
}

#[test]
fn handler_without_evaluate() -> Result<()> {
    // Has its own ATOM handler but nothing to combine with, so the
    // default FUNCTION handler does that.
    let tags = Context::new()
        .with_handler(Category::Atom, Context::evaluate(|c, _, _, _| Ok(c)));
    let ctx = Context::new().with_handler("tags", tags);
    assert_eq!(run("((tags x y) z)", &ctx)?, "{ROOT: [{tags: [x, y]}, {ATOM: z}]}");
    Ok(())
}

#[test]
fn handlers_are_not_inherited() -> Result<()> {
    let shout = Context::evaluate(|c, _, _, _| {
        Ok(Value::from(c.as_str().unwrap_or("").to_uppercase().as_str()))
    });
    let ctx = Context::new().with_handler(Category::Atom, shout);
    assert_eq!(run("(a (f b))", &ctx)?, r#"{ROOT: ["A", {f: [{ATOM: b}]}]}"#);
    Ok(())
}

#[test]
fn defaults_are_inherited() -> Result<()> {
    let tag = Context::evaluate(|c, _, _, entity| {
        Ok(Value::entry("n", c.unwrap_entry(entity)))
    });
    let ctx = Context::new().with_default(Category::Number, tag);
    assert_eq!(run("(1 (f 2 (g 3)) a)", &ctx)?,
               "{ROOT: [{n: 1}, {f: [{n: 2}, {g: [{n: 3}]}]}, {ATOM: a}]}");
    Ok(())
}

#[test]
fn root_evaluate() -> Result<()> {
    let ctx = Context::new().with_evaluate(|c, _, _, _| Ok(c));
    assert_eq!(run("(a 1)", &ctx)?, "[{ATOM: a}, 1]");
    Ok(())
}

#[test]
fn passthrough() -> Result<()> {
    let ctx = Context::new().with_handler("quote", Context::passthrough());
    assert_eq!(run("(a (quote (b c) \"d\" 1))", &ctx)?,
               "{ROOT: [{ATOM: a}, ((b c) \"d\" 1)]}");
    assert_eq!("null".parse::<Notation>()?, Notation::Passthrough);
    assert_eq!("functional".parse::<Notation>()?, Notation::Functional);
    assert!("lisp".parse::<Notation>().is_err());
    Ok(())
}

#[test]
fn category_names_are_symbols() -> Result<()> {
    assert_eq!(run_default("((atom x) ROOT)")?,
               "{ROOT: [{atom: [{ATOM: x}]}, {ATOM: ROOT}]}");
    let ctx = Context::new()
        .with_handler("atom", Context::evaluate(|_, _, _, _| Ok(Value::from("called"))));
    assert_eq!(run("(x (atom))", &ctx)?, r#"{ROOT: [{ATOM: x}, "called"]}"#);
    Ok(())
}

#[test]
fn invalid_notation() -> Result<()> {
    let dialect = Dialect::default();
    for text in ["(((a) b))", "((1 2))", "((\"s\" x))", "((true x))", "((null))"] {
        let node = dialect.parse(text, ParseOptions::default())?;
        let r = dialect.interpret(&node, &Context::new());
        assert!(matches!(r, Err(DispatchError::InvalidFunctionalNotation(_))),
                "{text}: {r:?}");
    }
    Ok(())
}

#[test]
fn not_an_expression() -> Result<()> {
    let dialect = Dialect::default();
    let node = dialect.parse("a", ParseOptions::default())?;
    assert!(matches!(dialect.interpret(&node, &Context::new()),
                     Err(DispatchError::NotAnExpression(_))));
    Ok(())
}

#[test]
fn cant_evaluate() -> Result<()> {
    let dialect = Dialect::default();
    let ctx = Context::new().with_defaults(Handlers::new());
    let node = dialect.parse("(a)", ParseOptions::default())?;
    match dialect.interpret(&node, &ctx) {
        Err(DispatchError::CantEvaluate { entity, components }) => {
            assert_eq!(entity, Entity::from(Category::Atom));
            assert_eq!(components, Value::Symbol("a".into()));
        }
        r => panic!("unexpected {r:?}")
    }
    let node = dialect.parse("()", ParseOptions::default())?;
    assert!(matches!(dialect.interpret(&node, &ctx),
                     Err(DispatchError::CantEvaluate { .. })));
    Ok(())
}

#[test]
fn document_order() -> Result<()> {
    let record = Context::evaluate(|c, _, state, entity| {
        let depth = state.scoped.len() as i64;
        state.globals.with_mut(|g| {
            let log = g.entry("log".into()).or_insert_with(|| Value::List(vec![]));
            if let Value::List(v) = log {
                v.push(Value::from(format!("{entity}@{depth}").as_str()));
            }
        });
        Ok(Value::entry(entity.clone(), c))
    });
    let dialect = Dialect::default();
    let ctx = Context::new().with_default(Category::Function, record);
    let node = dialect.parse("((a (b) (c x)) (d))", ParseOptions::default())?;
    let mut state = State::new();
    dialect.interpret_with(&node, &ctx, &mut state, &Category::Root.into())?;
    assert_eq!(state.globals.get("log").map(|v| v.to_string()),
               Some(r#"["b@2", "c@2", "a@1", "d@1", "ROOT@0"]"#.to_string()));
    Ok(())
}

#[test]
fn suspended_handlers_finish_first() -> Result<()> {
    let later = Context::evaluate_suspending(|c, _, _, _| {
        Evaluation::suspend(move |_| Evaluation::suspend(move |state| {
            state.globals.insert("seen", true.into());
            Evaluation::done(c)
        }))
    });
    let check = Context::evaluate(|_, _, state, _| {
        Ok(state.globals.get("seen").unwrap_or(Value::Null))
    });
    let ctx = Context::new().with_handler("later", later).with_handler("check", check);
    assert_eq!(run("((check) (later) (check))", &ctx)?, "{ROOT: [null, [], true]}");
    Ok(())
}

#[test]
fn scopes_are_per_handler() -> Result<()> {
    let set = Context::evaluate(|_, _, state, _| {
        if let Some(scope) = state.scope() {
            scope.insert("k", Value::from(1));
        }
        Ok(Value::from(state.lookup("k").is_some()))
    });
    let get = Context::evaluate(|_, _, state, _| {
        Ok(Value::from(state.lookup("k").is_some()))
    });
    let ctx = Context::new().with_handler("set", set).with_handler("get", get);
    assert_eq!(run("((set) (get))", &ctx)?, "{ROOT: [true, false]}");
    Ok(())
}

#[test]
fn enclosing_frames_are_shared() -> Result<()> {
    // writes into the frame of the handler it is nested in
    let inner = Context::evaluate(|_, _, state, _| {
        if let Some(parent) = state.scoped.iter().rev().nth(1) {
            parent.insert("child", "inner".into());
        }
        Ok(Value::Null)
    });
    let outer = Context::evaluate(|_, _, state, _| {
        Ok(state.scope().and_then(|s| s.get("child")).unwrap_or(Value::Null))
    }).with_handler("inner", inner);
    let ctx = Context::new().with_handler("outer", outer);
    assert_eq!(run("((outer (inner)) (outer))", &ctx)?, r#"{ROOT: ["inner", null]}"#);
    Ok(())
}

#[test]
fn interpret_with_state() -> Result<()> {
    let dialect = Dialect::default();
    let node = dialect.parse("((greeting))", ParseOptions::default())?;
    let ctx = Context::new().with_handler("greeting", Context::evaluate(|_, _, state, _| {
        Ok(state.globals.get("name").unwrap_or(Value::Null))
    }));
    let mut state = State::new();
    state.globals.insert("name", "world".into());
    let v = dialect.interpret_with(&node, &ctx, &mut state, &Entity::symbol("config"))?;
    assert_eq!(v.to_string(), r#"{config: ["world"]}"#);
    Ok(())
}
