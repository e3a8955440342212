// SPDX-License-Identifier: GPL-3.0-or-later

//! Abstract syntax consumed by the stepper.
//!
//! This is the fixed interface produced by the parser (an external
//! collaborator, out of scope for this crate) and consumed by
//! [`crate::stepper::step`]. Names follow spec §6 exactly; nothing here
//! encodes surface syntax, only the already-parsed tree.

/// A program is an ordered list of clauses, consumed from the head.
pub type Program = Vec<Clause>;

/// A name as it appears in source: an identifier string.
pub type Name = String;

/// One statement of the calculus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clause {
    /// `L := R`
    Assignment(LExpr, RExpr),
    /// `sync L`
    Synchronization(LExpr),
    /// `return`
    Return,
}

/// A name expression: either a bare name, or a dependent-name path rooted
/// at another name expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LExpr {
    /// A bare name, resolved by the scope walk (I4).
    Unqualified(Name),
    /// `prefix.suffix`: `suffix` looked up among `prefix`'s dependents.
    Qualified(Box<LExpr>, Name),
}

impl LExpr {
    /// Build an unqualified name expression.
    #[must_use]
    pub fn name(n: impl Into<Name>) -> Self {
        Self::Unqualified(n.into())
    }

    /// Build `self.suffix`.
    #[must_use]
    pub fn qualified(self, suffix: impl Into<Name>) -> Self {
        Self::Qualified(Box::new(self), suffix.into())
    }

    /// The terminal name of this expression (the suffix for qualified
    /// expressions, the name itself otherwise). Useful for error messages.
    #[must_use]
    pub fn terminal_name(&self) -> &str {
        match self {
            Self::Unqualified(n) | Self::Qualified(_, n) => n,
        }
    }
}

/// Right-hand side of an assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RExpr {
    /// A bid: a materialization of some other name into this slot.
    BidExpression(Bid),
    /// A function application `f(x)`.
    Application(Target, Box<Bid>),
    /// A literal: either a primitive value or a capturing abstraction.
    LiteralExpression(Literal),
}

/// `Bid(target, materialization)`: bid for the current value of `target`,
/// materialized via `materialization`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bid {
    /// The name expression being bid for.
    pub target: Target,
    /// How to materialize the bid target's value into the new slot.
    pub materialization: Materialization,
}

impl Bid {
    /// Construct a bid.
    #[must_use]
    pub fn new(target: Target, materialization: Materialization) -> Self {
        Self {
            target,
            materialization,
        }
    }
}

/// Whether a bid target should be synchronized (traced) before use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Emit a `SynchronizationEvent` for this name before consuming it (S1/S2).
    Synchronizing(LExpr),
    /// Consume directly, no trace event.
    NonSynchronizing(LExpr),
}

impl Target {
    /// The underlying name expression, regardless of synchronizing-ness.
    #[must_use]
    pub fn lexpr(&self) -> &LExpr {
        match self {
            Self::Synchronizing(l) | Self::NonSynchronizing(l) => l,
        }
    }
}

/// How a bid's value is transferred into its new slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Materialization {
    /// Move: the source loses its heap cell (S6).
    Move,
    /// Copy: both source and destination end up independently inspectable (S7).
    Copy,
    /// Reference: the destination borrows the source's identity (S4).
    Refr,
}

/// A literal right-hand side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    /// A primitive value literal (S8/S9).
    PrimitiveLiteral(PrimitiveValue),
    /// An abstraction literal with a capture spec (S10).
    CaptureExpression(Vec<(Name, Bid)>, Abstraction),
}

/// A function value: formal parameter, body, and return expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Abstraction {
    /// The formal parameter name.
    pub formal: Name,
    /// The function body, executed before the return expression.
    pub body: Vec<Clause>,
    /// The expression assigned into the caller's target on return.
    pub return_expr: RExpr,
}

impl Abstraction {
    /// Construct an abstraction.
    #[must_use]
    pub fn new(formal: impl Into<Name>, body: Vec<Clause>, return_expr: RExpr) -> Self {
        Self {
            formal: formal.into(),
            body,
            return_expr,
        }
    }
}

/// An opaque token standing for a primitive's value payload.
///
/// The interpreter never inspects a sentinel's contents, only compares it
/// for equality (used by [`crate::value::recompose`] to check stack/heap
/// consistency for large primitives, I3).
pub type Sentinel = String;

/// A primitive value as it appears in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveValue {
    /// Fits entirely on the stack.
    SmallPrimitive(Sentinel),
    /// Stack header plus a heap body.
    LargePrimitive(Sentinel),
}
