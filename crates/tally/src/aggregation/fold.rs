//! Module: aggregation::fold
//! Responsibility: local evaluation of an aggregation over a document slice.
//! Does not own: reducer arithmetic (`reducer`) or filtering (`query`).
//! Boundary: seeds a fresh accumulator per run; the `initial` template is
//! never mutated.

use crate::{
    aggregation::{Accumulator, Aggregation},
    error::ReduceError,
    obs::sink::FoldSpan,
    value::Document,
};

///
/// AggregationFold
///
/// One in-progress evaluation. Documents are pushed one at a time and the
/// intermediate accumulator can be inspected between pushes.
///

#[derive(Debug)]
pub struct AggregationFold<'a> {
    aggregation: &'a Aggregation,
    state: Accumulator,
    docs_folded: u64,
    reduce_steps: u64,
}

impl<'a> AggregationFold<'a> {
    fn new(aggregation: &'a Aggregation) -> Self {
        Self {
            aggregation,
            state: aggregation.initial.clone(),
            docs_folded: 0,
            reduce_steps: 0,
        }
    }

    /// Fold one document: the reducer runs once per configured field, in
    /// field order. The query is not consulted here.
    pub fn push(&mut self, doc: &Document) -> Result<(), ReduceError> {
        let Aggregation {
            fields,
            reducer,
            numeric,
            ..
        } = self.aggregation;

        for field in fields {
            reducer.step(&mut self.state, doc, field, *numeric)?;
            self.reduce_steps = self.reduce_steps.saturating_add(1);
        }
        self.docs_folded = self.docs_folded.saturating_add(1);

        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &Accumulator {
        &self.state
    }

    #[must_use]
    pub const fn docs_folded(&self) -> u64 {
        self.docs_folded
    }

    #[must_use]
    pub const fn reduce_steps(&self) -> u64 {
        self.reduce_steps
    }

    #[must_use]
    pub fn finish(self) -> Accumulator {
        self.state
    }
}

impl Aggregation {
    /// Start a step-wise fold seeded from a copy of `initial`.
    #[must_use]
    pub fn fold(&self) -> AggregationFold<'_> {
        AggregationFold::new(self)
    }

    /// Select documents through the query (if any) and fold them all.
    pub fn evaluate(&self, docs: &[Document]) -> Result<Accumulator, ReduceError> {
        let mut span = FoldSpan::new(self.reducer.label(), len_u64(docs.len()));

        let selected: Vec<&Document> = match &self.query {
            Some(query) => query.apply(docs),
            None => docs.iter().collect(),
        };

        let mut fold = self.fold();
        for doc in selected {
            let pushed = fold.push(doc);
            span.set_progress(fold.docs_folded(), fold.reduce_steps());
            pushed?;
        }

        span.finish();

        Ok(fold.finish())
    }
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
