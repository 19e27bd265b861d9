// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Interpreting a tree in "functional" notation: the head symbol of
//! each expression selects a handler, which turns the interpreted
//! rest of the expression into a [Value](../value/enum.Value.html).

//! Handlers are looked up in a [Context](Context), first among its
//! own handlers, then among its defaults, each time first under the
//! symbol (uppercased) and then under a fallback [Category](Category).
//! A handler is itself a context: the rest of the expression is
//! interpreted in it, and its `evaluate` (if any) combines the
//! results. Defaults are passed down to handlers which don't set
//! their own; handlers are not.
//!
//! Everything runs in document order on the caller's thread. A
//! handler may return [Evaluation::Suspended](Evaluation::Suspended)
//! to continue later; the continuation is run to completion before
//! anything else happens, which is what makes it safe for handlers
//! to share the [Globals](Globals) without locking.

use crate::dialect::{Dialect, Kind};
use crate::node::Node;
use crate::settings::ConfigurationError;
use crate::value::Value;
use indexmap::IndexMap;
use kstring::KString;
use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Atom,
    String,
    Number,
    Boolean,
    Null,
    /// Fallback for symbols without a handler of their own
    Function,
    /// The entity of the whole tree
    Root,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Atom => "ATOM",
            Category::String => "STRING",
            Category::Number => "NUMBER",
            Category::Boolean => "BOOLEAN",
            Category::Null => "NULL",
            Category::Function => "FUNCTION",
            Category::Root => "ROOT",
        }
    }
}

/// What something is being evaluated as. Categories are kept apart
/// from symbols, so that a symbol spelled `atom` or `ROOT` is just a
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    Symbol(KString),
    Category(Category),
}

impl Entity {
    pub fn symbol(name: &str) -> Entity {
        Entity::Symbol(KString::from_ref(name))
    }

    /// The key handlers are registered and looked up under: symbols
    /// are case insensitive.
    pub fn key(&self) -> Entity {
        match self {
            Entity::Symbol(s) => Entity::Symbol(KString::from_string(s.to_uppercase())),
            Entity::Category(c) => Entity::Category(*c),
        }
    }
}

impl From<Category> for Entity {
    fn from(c: Category) -> Entity {
        Entity::Category(c)
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Entity {
        Entity::symbol(s)
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Entity::Symbol(s) => f.write_str(s),
            Entity::Category(c) => f.write_str(c.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    /// Dispatch on the head symbol of each expression
    #[default]
    Functional,
    /// Return the children as they are
    Passthrough,
}

impl FromStr for Notation {
    type Err = ConfigurationError;
    fn from_str(s: &str) -> Result<Notation, ConfigurationError> {
        match s {
            "functional" => Ok(Notation::Functional),
            "passthrough" | "null" => Ok(Notation::Passthrough),
            _ => Err(ConfigurationError::UnsupportedNotation(s.to_string()))
        }
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("can't evaluate '{entity}' with arguments {components}")]
    CantEvaluate {
        entity: Entity,
        components: Value,
    },
    #[error("invalid AST for functional notation: {0}")]
    InvalidFunctionalNotation(Node),
    #[error("can only interpret an expression, got: {0}")]
    NotAnExpression(Node),
    #[error("handler for '{entity}' failed: {failure}")]
    Handler {
        entity: Entity,
        failure: anyhow::Error,
    },
}

impl DispatchError {
    /// For handlers that give up.
    pub fn failed(entity: &Entity, failure: anyhow::Error) -> DispatchError {
        DispatchError::Handler { entity: entity.clone(), failure }
    }
}


pub type Scope = IndexMap<KString, Value>;

/// A mapping that stays the same object wherever it is passed: both
/// the globals and the frames in `State::scoped` are shared this way.
#[derive(Debug, Clone, Default)]
pub struct SharedScope(Rc<RefCell<Scope>>);

/// The mapping shared by all frames of one interpretation.
pub type Globals = SharedScope;

impl SharedScope {
    pub fn new() -> SharedScope {
        SharedScope::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: Value) -> Option<Value> {
        self.0.borrow_mut().insert(KString::from_ref(key), value)
    }

    /// Must not be re-entered from within `f`.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut Scope) -> T) -> T {
        f(&mut self.0.borrow_mut())
    }

    pub fn snapshot(&self) -> Scope {
        self.0.borrow().clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    /// One frame per handler being evaluated, innermost last
    pub scoped: Vec<SharedScope>,
    pub globals: Globals,
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    /// The state for the body of a handler: the same frames plus a
    /// new empty one, the same globals. Writes to an enclosing frame
    /// are seen by its handler.
    pub fn extended(&self) -> State {
        let mut scoped = self.scoped.clone();
        scoped.push(SharedScope::new());
        State {
            scoped,
            globals: self.globals.clone(),
        }
    }

    /// The innermost frame.
    pub fn scope(&self) -> Option<&SharedScope> {
        self.scoped.last()
    }

    /// Look `key` up in the frames, innermost first.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.scoped.iter().rev().find_map(|scope| scope.get(key))
    }
}


/// The outcome of a handler: either a result, or a continuation to
/// be run (with the same state) to get one.
pub enum Evaluation {
    Done(Result<Value, DispatchError>),
    Suspended(Box<dyn FnOnce(&mut State) -> Evaluation>),
}

impl Evaluation {
    pub fn done(v: Value) -> Evaluation {
        Evaluation::Done(Ok(v))
    }

    pub fn fail(e: DispatchError) -> Evaluation {
        Evaluation::Done(Err(e))
    }

    pub fn suspend(k: impl FnOnce(&mut State) -> Evaluation + 'static) -> Evaluation {
        Evaluation::Suspended(Box::new(k))
    }
}

impl From<Result<Value, DispatchError>> for Evaluation {
    fn from(r: Result<Value, DispatchError>) -> Evaluation {
        Evaluation::Done(r)
    }
}

impl Debug for Evaluation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Evaluation::Done(r) => f.debug_tuple("Done").field(r).finish(),
            Evaluation::Suspended(_) => f.write_str("Suspended(..)"),
        }
    }
}

// Run continuations until there is a result.
fn settle(ev: Evaluation, state: &mut State) -> Result<Value, DispatchError> {
    let mut ev = ev;
    loop {
        match ev {
            Evaluation::Done(r) => return r,
            Evaluation::Suspended(k) => {
                trace!("resuming a suspended handler");
                ev = k(&mut *state);
            }
        }
    }
}

pub trait Handler {
    /// Turn `components` into the result for `entity`. `context` is
    /// the context the handler was found as (with defaults filled
    /// in).
    fn evaluate(&self, components: Value, context: &Context,
                state: &mut State, entity: &Entity) -> Evaluation;
}

impl<F> Handler for F
    where F: Fn(Value, &Context, &mut State, &Entity) -> Evaluation
{
    fn evaluate(&self, components: Value, context: &Context,
                state: &mut State, entity: &Entity) -> Evaluation {
        self(components, context, state, entity)
    }
}

struct Immediate<F>(F);

impl<F> Handler for Immediate<F>
    where F: Fn(Value, &Context, &mut State, &Entity) -> Result<Value, DispatchError>
{
    fn evaluate(&self, components: Value, context: &Context,
                state: &mut State, entity: &Entity) -> Evaluation {
        Evaluation::Done((self.0)(components, context, state, entity))
    }
}


pub type Handlers = IndexMap<Entity, Context>;

/// Where handlers are looked up; also what a handler is.
#[derive(Clone, Default)]
pub struct Context {
    handlers: Option<Rc<Handlers>>,
    defaults: Option<Rc<Handlers>>,
    notation: Notation,
    evaluate: Option<Rc<dyn Handler>>,
}

fn keys(hs: &Option<Rc<Handlers>>) -> Option<Vec<String>> {
    hs.as_ref().map(|hs| hs.keys().map(|k| k.to_string()).collect())
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("handlers", &keys(&self.handlers))
            .field("defaults", &keys(&self.defaults))
            .field("notation", &self.notation)
            .field("evaluate", &self.evaluate.is_some())
            .finish()
    }
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    /// A handler that produces its result right away.
    pub fn evaluate<F>(f: F) -> Context
        where F: Fn(Value, &Context, &mut State, &Entity)
                    -> Result<Value, DispatchError> + 'static
    {
        Context::from_handler(Immediate(f))
    }

    /// A handler that may suspend, see [Evaluation](Evaluation).
    pub fn evaluate_suspending<F>(f: F) -> Context
        where F: Fn(Value, &Context, &mut State, &Entity) -> Evaluation + 'static
    {
        Context::from_handler(f)
    }

    pub fn from_handler(h: impl Handler + 'static) -> Context {
        Context {
            evaluate: Some(Rc::new(h)),
            ..Context::default()
        }
    }

    /// A handler whose expression is not interpreted.
    pub fn passthrough() -> Context {
        Context::new().with_notation(Notation::Passthrough)
    }

    pub fn with_notation(mut self, notation: Notation) -> Context {
        self.notation = notation;
        self
    }

    pub fn with_evaluate<F>(mut self, f: F) -> Context
        where F: Fn(Value, &Context, &mut State, &Entity)
                    -> Result<Value, DispatchError> + 'static
    {
        self.evaluate = Some(Rc::new(Immediate(f)));
        self
    }

    /// Register `handler` for a symbol or category.
    pub fn with_handler(mut self, entity: impl Into<Entity>, handler: Context)
                        -> Context {
        let hs = self.handlers.get_or_insert_with(Default::default);
        Rc::make_mut(hs).insert(entity.into().key(), handler);
        self
    }

    /// Register a default. The first call starts from a copy of
    /// [default_handlers](default_handlers), unless defaults were
    /// set with `with_defaults`.
    pub fn with_default(mut self, entity: impl Into<Entity>, handler: Context)
                        -> Context {
        let hs = self.defaults.get_or_insert_with(|| Rc::new(default_handlers()));
        Rc::make_mut(hs).insert(entity.into().key(), handler);
        self
    }

    pub fn with_defaults(mut self, defaults: Handlers) -> Context {
        self.defaults = Some(Rc::new(defaults));
        self
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    pub fn has_evaluate(&self) -> bool {
        self.evaluate.is_some()
    }

    pub fn handler(&self, entity: &Entity) -> Option<&Context> {
        self.handlers.as_ref()?.get(&entity.key())
    }

    pub fn default_handler(&self, entity: &Entity) -> Option<&Context> {
        self.defaults.as_ref()?.get(&entity.key())
    }

    /// The handler for `name`: among the handlers, then the defaults,
    /// each under `name` then `fallback`. An empty handler if there
    /// is none. Inherits the defaults unless it has its own.
    pub fn find(&self, name: &Entity, fallback: Category) -> Context {
        let name = name.key();
        let fallback = Entity::Category(fallback);
        let found = [&self.handlers, &self.defaults]
            .into_iter()
            .flatten()
            .flat_map(|hs| [hs.get(&name), hs.get(&fallback)])
            .flatten()
            .next();
        let mut found = found.cloned().unwrap_or_default();
        if found.defaults.is_none() {
            found.defaults = self.defaults.clone();
        }
        found
    }
}

/// The handlers used when a context doesn't bring its own defaults:
/// atoms become `{ATOM: atom}`, the other leaves their plain value,
/// expressions without a handler `{symbol: [results..]}`.
pub fn default_handlers() -> Handlers {
    let mut hs = Handlers::new();
    let wrap = || Context::evaluate(|components, _, _, entity| {
        Ok(Value::entry(entity.clone(), components))
    });
    let unwrap = || Context::evaluate(|components, _, _, entity| {
        Ok(components.unwrap_entry(entity))
    });
    hs.insert(Category::Atom.into(), wrap());
    hs.insert(Category::Function.into(), wrap());
    for c in [Category::String, Category::Number, Category::Boolean, Category::Null] {
        hs.insert(c.into(), unwrap());
    }
    hs
}


fn interpret_leaf(
    dialect: &Dialect,
    leaf: &Node,
    context: &Context,
    state: &mut State,
) -> Result<Value, DispatchError>
{
    let kind = dialect.classify(leaf);
    let category = match kind.category() {
        Some(c) => c,
        None => return Err(DispatchError::InvalidFunctionalNotation(leaf.clone())),
    };
    let entity = Entity::Category(category);
    let components = match (kind, leaf) {
        (Kind::Atom, Node::Symbol(s)) => Value::Symbol(s.clone()),
        _ => Value::entry(category, dialect.value_of(leaf)),
    };
    let handler = context.find(&entity, category);
    match &handler.evaluate {
        Some(h) => settle(h.evaluate(components, &handler, state, &entity), state),
        None => Err(DispatchError::CantEvaluate { entity, components })
    }
}

fn interpret_children(
    dialect: &Dialect,
    expression: &[Node],
    context: &Context,
    state: &mut State,
    entity: &Entity,
) -> Result<Value, DispatchError>
{
    if context.notation == Notation::Passthrough {
        return Ok(Value::Node(Node::Expression(expression.to_vec())))
    }
    let mut components = Vec::with_capacity(expression.len());
    for form in expression {
        let result = match form {
            Node::Expression(v) => match v.split_first() {
                None => Value::Map(IndexMap::new()),
                Some((head, rest)) => match head {
                    Node::Symbol(name) if dialect.classify(head) == Kind::Atom => {
                        let head = Entity::Symbol(name.clone());
                        let handler = context.find(&head, Category::Function);
                        trace!(entity = %head, "interpreting");
                        let mut inner = state.extended();
                        interpret_children(dialect, rest, &handler, &mut inner, &head)?
                    }
                    _ => return Err(DispatchError::InvalidFunctionalNotation(form.clone()))
                }
            },
            leaf => interpret_leaf(dialect, leaf, context, state)?
        };
        components.push(result);
    }
    let components = Value::List(components);
    if let Some(h) = &context.evaluate {
        return settle(h.evaluate(components, context, state, entity), state)
    }
    let handler = context.find(entity, Category::Function);
    match &handler.evaluate {
        Some(h) => settle(h.evaluate(components, &handler, state, entity), state),
        None => Err(DispatchError::CantEvaluate { entity: entity.clone(), components })
    }
}

/// Interpret the children of `node` as `entity`. Contexts without
/// defaults get [default_handlers](default_handlers).
pub fn interpret(
    dialect: &Dialect,
    node: &Node,
    context: &Context,
    state: &mut State,
    entity: &Entity,
) -> Result<Value, DispatchError>
{
    let expression = node.children()
        .ok_or_else(|| DispatchError::NotAnExpression(node.clone()))?;
    let mut context = context.clone();
    if context.defaults.is_none() {
        context.defaults = Some(Rc::new(default_handlers()));
    }
    interpret_children(dialect, expression, &context, state, entity)
}
