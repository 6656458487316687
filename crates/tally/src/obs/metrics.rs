use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for aggregation folds.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub reducers: BTreeMap<String, ReducerCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Evaluator entrypoints
    pub fold_calls: u64,
    pub folds_finished: u64,
    pub folds_rejected: u64,

    // Documents touched
    pub docs_scanned: u64,
    pub docs_matched: u64,

    // Reducer invocations (documents × fields)
    pub reduce_steps: u64,
}

///
/// ReducerCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReducerCounters {
    pub fold_calls: u64,
    pub folds_rejected: u64,
    pub docs_matched: u64,
    pub reduce_steps: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
/// Snapshot of the counters plus per-reducer averages.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
    /// Reducers ordered by fold calls (descending), then by name.
    pub reducer_summaries: Vec<ReducerSummary>,
}

///
/// ReducerSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReducerSummary {
    pub reducer: String,
    pub fold_calls: u64,
    pub folds_rejected: u64,
    pub avg_docs_per_fold: f64,
    pub avg_steps_per_fold: f64,
}

#[expect(clippy::cast_precision_loss)]
fn average(total: u64, calls: u64) -> f64 {
    if calls == 0 {
        0.0
    } else {
        total as f64 / calls as f64
    }
}

/// Build a point-in-time report from the thread-local counters.
pub(crate) fn report() -> EventReport {
    with_state(|state| {
        let mut reducer_summaries: Vec<ReducerSummary> = state
            .reducers
            .iter()
            .map(|(name, c)| ReducerSummary {
                reducer: name.clone(),
                fold_calls: c.fold_calls,
                folds_rejected: c.folds_rejected,
                avg_docs_per_fold: average(c.docs_matched, c.fold_calls),
                avg_steps_per_fold: average(c.reduce_steps, c.fold_calls),
            })
            .collect();

        reducer_summaries.sort_by(|a, b| {
            b.fold_calls
                .cmp(&a.fold_calls)
                .then_with(|| a.reducer.cmp(&b.reducer))
        });

        EventReport {
            counters: state.clone(),
            reducer_summaries,
        }
    })
}
