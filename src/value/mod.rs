// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime value representation for the materialization calculus.
//!
//! Values here are distinct from [`crate::ast::PrimitiveValue`]: the `ast`
//! types are what a parser hands in; the types in this module are what the
//! store actually holds once a literal has been decomposed across the
//! stack/heap boundary (spec §3, §4.1).


use std::collections::HashMap;
use std::fmt;

use crate::ast::{Abstraction, Name, PrimitiveValue};
use crate::error::Error;

/// An opaque token standing for a primitive's value payload.
///
/// Compared only for equality (used by [`recompose`] to check a large
/// primitive's stack and heap sentinels agree, I3); never inspected.
pub type Sentinel = Box<str>;

/// A value with no further structure: either a primitive or a function.
///
/// Function values have a stack component only (spec §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShallowValue {
    /// Fits entirely on the stack.
    SmallPrimitive(Sentinel),
    /// Stack header plus a heap body.
    LargePrimitive(Sentinel),
    /// An abstraction: formal parameter, body, and return expression.
    Function(Abstraction),
}

impl ShallowValue {
    /// Build a shallow value from a parsed literal, converting its sentinel
    /// representation.
    #[must_use]
    pub fn from_primitive(value: &PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::SmallPrimitive(s) => Self::SmallPrimitive(s.as_str().into()),
            PrimitiveValue::LargePrimitive(s) => Self::LargePrimitive(s.as_str().into()),
        }
    }

    /// Whether this value has a heap component once decomposed.
    #[must_use]
    pub const fn is_large(&self) -> bool {
        matches!(self, Self::LargePrimitive(_))
    }

    /// Whether this value is a function.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

/// A shallow value paired with the deep values of its dependents.
///
/// Built only for diagnostics and deep synchronization tracing
/// ([`crate::inspector::inspect_deep`]); the stepper itself only ever
/// produces and consumes [`ShallowValue`]s (spec §4.6, S12).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepValue {
    /// This identity's own shallow value.
    pub shallow: ShallowValue,
    /// Deep values of every present dependent, keyed by name.
    pub dependents: HashMap<Name, DeepValue>,
}

/// A value as stored in the stack half of memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackValue {
    /// A small primitive's full payload.
    SmallStack(Sentinel),
    /// A large primitive's stack-resident header.
    LargeStack(Sentinel),
    /// A function's only representation; functions have no heap cell.
    FunctionStack(Abstraction),
}

/// A value as stored in the heap half of memory.
///
/// Only large primitives have heap cells (spec §3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapValue {
    /// A large primitive's heap-resident body.
    LargeHeap(Sentinel),
}

/// Decompose a shallow value into its stack and heap representations
/// (spec §4.1).
#[must_use]
pub fn decompose(value: &ShallowValue) -> (Option<StackValue>, Option<HeapValue>) {
    match value {
        ShallowValue::SmallPrimitive(s) => (Some(StackValue::SmallStack(s.clone())), None),
        ShallowValue::LargePrimitive(s) => (
            Some(StackValue::LargeStack(s.clone())),
            Some(HeapValue::LargeHeap(s.clone())),
        ),
        ShallowValue::Function(a) => (Some(StackValue::FunctionStack(a.clone())), None),
    }
}

/// Recompose a shallow value from its stack and heap halves, failing on any
/// inconsistent pairing (spec §4.1, I3).
pub fn recompose(
    stack: Option<StackValue>,
    heap: Option<HeapValue>,
) -> Result<ShallowValue, Error> {
    match (stack, heap) {
        (Some(StackValue::SmallStack(s)), None) => Ok(ShallowValue::SmallPrimitive(s)),
        (Some(StackValue::LargeStack(s)), Some(HeapValue::LargeHeap(h))) if s == h => {
            Ok(ShallowValue::LargePrimitive(s))
        }
        (Some(StackValue::FunctionStack(a)), None) => Ok(ShallowValue::Function(a)),
        (stack, heap) => Err(Error::Recomposition {
            stack: stack.as_ref().map(stack_value_kind),
            heap: heap.as_ref().map(heap_value_kind),
        }),
    }
}

const fn stack_value_kind(v: &StackValue) -> &'static str {
    match v {
        StackValue::SmallStack(_) => "SmallStack",
        StackValue::LargeStack(_) => "LargeStack",
        StackValue::FunctionStack(_) => "FunctionStack",
    }
}

const fn heap_value_kind(v: &HeapValue) -> &'static str {
    match v {
        HeapValue::LargeHeap(_) => "LargeHeap",
    }
}

impl fmt::Display for ShallowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallPrimitive(s) | Self::LargePrimitive(s) => write!(f, "{s}"),
            Self::Function(a) => write!(f, "<function {}>", a.formal),
        }
    }
}
