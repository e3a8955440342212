// SPDX-License-Identifier: GPL-3.0-or-later

//! The clause-rewriting small-step reducer (spec §4.6, rules S1–S13).
//!
//! `step` consumes exactly one clause from the front of a [`Configuration`]
//! and returns a new configuration plus whatever events that reduction
//! produced. Every rule either rewrites the program (desugaring, retries,
//! dependent recursion, application expansion) or writes a [`Delta`] into
//! the store, never both in a way that skips the single auditable
//! `Store::apply` per step (spec §4.2).

#[cfg(test)]
mod stepper_test;

use std::collections::{HashSet, VecDeque};

use crate::address::Address;
use crate::allocator;
use crate::ast::{Bid, Clause, LExpr, Literal, Materialization, RExpr, Target};
use crate::error::{AllocationReason, Error};
use crate::event::{Event, EventTag};
use crate::inspector;
use crate::materialize;
use crate::resolver;
use crate::store::delta::Delta;
use crate::store::environment::{Frame, Shareable};
use crate::store::Store;
use crate::value::ShallowValue;

/// A program-in-progress paired with the store it runs against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Remaining clauses, consumed from the front; rules may prepend.
    pub program: VecDeque<Clause>,
    /// The store as of the last applied step.
    pub store: Store,
}

impl Configuration {
    /// Build a configuration from a clause sequence and a starting store.
    #[must_use]
    pub fn new(program: impl IntoIterator<Item = Clause>, store: Store) -> Self {
        Self {
            program: program.into_iter().collect(),
            store,
        }
    }

    /// Whether the program has been fully consumed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.program.is_empty()
    }
}

/// The result of reducing one clause, before it has been folded into a
/// configuration.
struct Outcome {
    /// Clauses to push onto the front of the program, in order.
    prefix: Vec<Clause>,
    /// The store edit this reduction requires.
    delta: Delta,
    /// A clause event to emit, tagged with the store as of right after
    /// `delta` is applied.
    tag: Option<(Clause, EventTag)>,
    /// A synchronization event to emit (S12); never alongside `tag`.
    sync_event: Option<Event>,
}

impl Outcome {
    fn prefix_only(prefix: Vec<Clause>) -> Self {
        Self {
            prefix,
            delta: Delta::empty(),
            tag: None,
            sync_event: None,
        }
    }
}

/// Reduce the clause at the front of `config.program` by exactly one step.
///
/// Fails if the program is already empty; callers (the drivers) are
/// expected to check [`Configuration::is_done`] first.
pub fn step(mut config: Configuration) -> Result<(Configuration, Vec<Event>), Error> {
    let Some(clause) = config.program.pop_front() else {
        return Err(Error::generic("step called on an empty program"));
    };

    let outcome = reduce(clause, &mut config.store)?;
    config.store.apply(outcome.delta);

    let mut events = Vec::with_capacity(1);
    if let Some((clause, tag)) = outcome.tag {
        events.push(Event::clause(clause, config.store.clone(), tag));
    }
    if let Some(sync_event) = outcome.sync_event {
        events.push(sync_event);
    }

    for prefix_clause in outcome.prefix.into_iter().rev() {
        config.program.push_front(prefix_clause);
    }
    Ok((config, events))
}

fn reduce(clause: Clause, store: &mut Store) -> Result<Outcome, Error> {
    match clause {
        Clause::Return => reduce_return(store),
        Clause::Synchronization(l) => reduce_synchronization(&l, store),
        Clause::Assignment(l, r) => reduce_assignment(l, r, store),
    }
}

/// S13.
fn reduce_return(store: &mut Store) -> Result<Outcome, Error> {
    let frame = store.environment.pop_frame().ok_or(Error::StackReturn)?;
    let mut delta = Delta::empty();
    let mut visited = HashSet::new();
    for share in frame.locals.values().flatten() {
        if let Shareable::Owned(addr) = share {
            allocator::deallocate(*addr, store, &mut visited, &mut delta);
        }
    }
    Ok(Outcome {
        prefix: Vec::new(),
        delta,
        tag: Some((Clause::Return, EventTag::Return)),
        sync_event: None,
    })
}

/// S12.
fn reduce_synchronization(l: &LExpr, store: &Store) -> Result<Outcome, Error> {
    let share = resolver::resolve(l, store)?
        .ok_or_else(|| Error::Allocation(l.clone(), AllocationReason::SourceAbsent))?;
    let value = inspector::inspect(share.address(), store)?;
    Ok(Outcome {
        prefix: Vec::new(),
        delta: Delta::empty(),
        tag: None,
        sync_event: Some(Event::synchronization(l.clone(), value)),
    })
}

/// S1–S11: everything that reduces an `Assignment`.
fn reduce_assignment(l: LExpr, r: RExpr, store: &mut Store) -> Result<Outcome, Error> {
    // S1: desugar a synchronizing bid target before anything else runs.
    if let RExpr::BidExpression(Bid {
        target: Target::Synchronizing(x),
        materialization,
    }) = &r
    {
        let x = x.clone();
        let materialization = *materialization;
        let sync = Clause::Synchronization(x.clone());
        let redo = Clause::Assignment(
            l,
            RExpr::BidExpression(Bid::new(Target::NonSynchronizing(x), materialization)),
        );
        return Ok(Outcome::prefix_only(vec![sync, redo]));
    }

    // S2: desugar a synchronizing application target before anything else runs.
    if let RExpr::Application(Target::Synchronizing(f), bid) = &r {
        let f = f.clone();
        let sync = Clause::Synchronization(f.clone());
        let redo = Clause::Assignment(l, RExpr::Application(Target::NonSynchronizing(f), bid.clone()));
        return Ok(Outcome::prefix_only(vec![sync, redo]));
    }

    match resolver::resolve(&l, store) {
        Err(Error::NameResolution(_)) => {
            // S3: declaration-on-demand, then retry the same assignment.
            let delta = allocator::declare(&l, store)?;
            let original = Clause::Assignment(l.clone(), r.clone());
            Ok(Outcome {
                prefix: vec![original],
                delta,
                tag: Some((Clause::Assignment(l, r), EventTag::Declaration)),
                sync_event: None,
            })
        }
        Err(e) => Err(e),
        Ok(None) => reduce_assignment_absent(l, r, store),
        Ok(Some(share)) => reduce_assignment_present(l, share.address(), r, store),
    }
}

/// `L` resolves to declared-but-unallocated: S4 (`Refr`) or S5 (allocate-then-redo).
fn reduce_assignment_absent(l: LExpr, r: RExpr, store: &mut Store) -> Result<Outcome, Error> {
    if let RExpr::BidExpression(Bid {
        target: Target::NonSynchronizing(source),
        materialization: Materialization::Refr,
    }) = &r
    {
        // S4.
        let share = resolver::resolve(source, store)?
            .ok_or_else(|| Error::Allocation(l.clone(), AllocationReason::SourceAbsent))?;
        let delta = allocator::allocate(&l, Shareable::Borrowed(share.address()), store)?;
        return Ok(Outcome {
            prefix: Vec::new(),
            delta,
            tag: Some((Clause::Assignment(l, r), EventTag::AssignmentByReference)),
            sync_event: None,
        });
    }

    // S5: any non-`Refr` right-hand side allocates a fresh owned identity
    // for `L`, then retries the very same assignment.
    let (delta, _addr) = allocator::allocate_new(&l, store)?;
    let original = Clause::Assignment(l.clone(), r.clone());
    Ok(Outcome {
        prefix: vec![original],
        delta,
        tag: Some((Clause::Assignment(l, r), EventTag::Allocation)),
        sync_event: None,
    })
}

/// `L` resolves to a present identity: S6/S7 (move/copy), S8–S10 (literals),
/// or S11 (application).
fn reduce_assignment_present(
    l: LExpr,
    l_addr: Address,
    r: RExpr,
    store: &mut Store,
) -> Result<Outcome, Error> {
    match r {
        RExpr::BidExpression(Bid {
            target: Target::NonSynchronizing(_),
            materialization: Materialization::Refr,
        }) => Err(Error::Allocation(l, AllocationReason::AlreadyAllocated)),
        RExpr::BidExpression(Bid {
            target: Target::NonSynchronizing(source),
            materialization,
        }) => {
            let r_share = resolver::resolve(&source, store)?
                .ok_or_else(|| Error::Allocation(l.clone(), AllocationReason::SourceAbsent))?;
            let r_addr = r_share.address();
            let (delta, follow_ups) = match materialization {
                Materialization::Move => materialize::materialize_move(&l, l_addr, &source, r_addr, store)?,
                Materialization::Copy => materialize::materialize_copy(&l, l_addr, &source, r_addr, store)?,
                Materialization::Refr => unreachable!("handled by the arm above"),
            };
            Ok(Outcome {
                prefix: follow_ups,
                delta,
                tag: None,
                sync_event: None,
            })
        }
        RExpr::BidExpression(Bid {
            target: Target::Synchronizing(_),
            ..
        }) => unreachable!("S1 desugars synchronizing bid targets first"),
        RExpr::Application(Target::NonSynchronizing(f), bid) => {
            reduce_application(l, l_addr, &f, *bid, store)
        }
        RExpr::Application(Target::Synchronizing(_), _) => {
            unreachable!("S2 desugars synchronizing application targets first")
        }
        RExpr::LiteralExpression(Literal::PrimitiveLiteral(pv)) => {
            let value = ShallowValue::from_primitive(&pv);
            let tag = if value.is_large() {
                EventTag::LargeLiteralAssignment
            } else {
                EventTag::SmallLiteralAssignment
            };
            let delta = materialize::materialize_literal(l_addr, &value, store)?;
            let clause = Clause::Assignment(l.clone(), RExpr::LiteralExpression(Literal::PrimitiveLiteral(pv)));
            Ok(Outcome {
                prefix: Vec::new(),
                delta,
                tag: Some((clause, tag)),
                sync_event: None,
            })
        }
        RExpr::LiteralExpression(Literal::CaptureExpression(capture, abstraction)) => {
            let value = ShallowValue::Function(abstraction.clone());
            let delta = materialize::materialize_literal(l_addr, &value, store)?;
            let prefix = capture
                .iter()
                .map(|(name, bid)| {
                    Clause::Assignment(l.clone().qualified(name.clone()), RExpr::BidExpression(bid.clone()))
                })
                .collect();
            let clause = Clause::Assignment(
                l.clone(),
                RExpr::LiteralExpression(Literal::CaptureExpression(capture, abstraction)),
            );
            Ok(Outcome {
                prefix,
                delta,
                tag: Some((clause, EventTag::AbstractionLiteralAssignment)),
                sync_event: None,
            })
        }
    }
}

/// S11.
fn reduce_application(
    l: LExpr,
    _l_addr: Address,
    f: &LExpr,
    bid: Bid,
    store: &mut Store,
) -> Result<Outcome, Error> {
    let f_share = resolver::resolve(f, store)?
        .ok_or_else(|| Error::Allocation(f.clone(), AllocationReason::SourceAbsent))?;
    let shallow = inspector::inspect(f_share.address(), store)?;
    let ShallowValue::Function(abstraction) = shallow else {
        return Err(Error::generic(format!(
            "application target `{}` did not inspect to a function",
            f.terminal_name()
        )));
    };

    let closure = store
        .ident(f_share.address())
        .ok_or(Error::IdentResolution(f_share.address()))?
        .dependents
        .clone();
    store.environment.push_frame(Frame::with_closure(closure));

    let mut prefix = Vec::with_capacity(abstraction.body.len() + 3);
    prefix.push(Clause::Assignment(
        LExpr::name(abstraction.formal.clone()),
        RExpr::BidExpression(bid.clone()),
    ));
    prefix.extend(abstraction.body.clone());
    prefix.push(Clause::Assignment(l.clone(), abstraction.return_expr.clone()));
    prefix.push(Clause::Return);

    let clause = Clause::Assignment(l, RExpr::Application(Target::NonSynchronizing(f.clone()), Box::new(bid)));
    Ok(Outcome {
        prefix,
        delta: Delta::empty(),
        tag: Some((clause, EventTag::Application)),
        sync_event: None,
    })
}
