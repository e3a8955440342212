// SPDX-License-Identifier: GPL-3.0-or-later

//! Drivers: iterate the stepper to completion or to the next synchronization
//! (spec §4.7).

#[cfg(test)]
mod driver_test;

use crate::ast::{Clause, Program};
use crate::error::Error;
use crate::event::Event;
use crate::stepper::{self, Configuration};
use crate::store::Store;

/// Iterate the stepper until the program is empty, returning the final
/// store and the accumulated event log.
///
/// `max_steps`, if given, bounds how many reductions are attempted; if the
/// budget runs out before the program empties, the run stops and returns
/// whatever store/events have accumulated so far rather than erroring:
/// exhausting a caller-supplied budget is not an interpreter failure (spec
/// §4.7 **[ADDED]**).
pub fn run_to_end(
    program: Program,
    store: Store,
    max_steps: Option<usize>,
) -> Result<(Store, Vec<Event>), Error> {
    let mut config = Configuration::new(program, store);
    let mut events = Vec::new();
    let mut steps = 0;

    while !config.is_done() {
        if max_steps.is_some_and(|budget| steps >= budget) {
            break;
        }
        let (next, step_events) = stepper::step(config)?;
        config = next;
        events.extend(step_events);
        steps += 1;
    }

    Ok((config.store, events))
}

/// Iterate the stepper until either the program is empty, or the next
/// clause is a [`Clause::Synchronization`] (left unconsumed so the caller
/// may inspect the store before resuming).
///
/// Returns the resulting configuration (with the synchronization clause,
/// if any, still at its head) and the accumulated event log.
pub fn run_to_sync(
    program: Program,
    store: Store,
    max_steps: Option<usize>,
) -> Result<(Configuration, Vec<Event>), Error> {
    let mut config = Configuration::new(program, store);
    let mut events = Vec::new();
    let mut steps = 0;

    loop {
        if config.is_done() {
            break;
        }
        if matches!(config.program.front(), Some(Clause::Synchronization(_))) {
            break;
        }
        if max_steps.is_some_and(|budget| steps >= budget) {
            break;
        }
        let (next, step_events) = stepper::step(config)?;
        config = next;
        events.extend(step_events);
        steps += 1;
    }

    Ok((config, events))
}
