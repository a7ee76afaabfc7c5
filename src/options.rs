//! Per-parse configuration: the memo cache, the trace sink and the partial-node policy.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    io::{self, Write},
};

use crate::{outcome::Outcome, rule::RuleId};

/// Settings threaded through every attempt of one top-level parse.
///
/// Build one per parse; the cache inside it is only valid for the input it
/// was first used with.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Options<'a> {
    tracer: Option<Tracer<'a>>,
    cache: Option<Cache<'a>>,
    partial_at_end: bool,
}

impl<'a> Options<'a> {
    /// No trace, caching on, no partial nodes.
    pub fn new() -> Self {
        Self {
            tracer: None,
            cache: Some(Cache::default()),
            partial_at_end: false,
        }
    }

    /// Trace to stdout, or turn tracing off.
    pub fn trace(mut self, on: bool) -> Self {
        self.tracer = if on {
            Some(Tracer::new(io::stdout()))
        } else {
            None
        };
        self
    }

    /// Trace into any writer.
    pub fn trace_to(mut self, sink: impl Write + 'a) -> Self {
        self.tracer = Some(Tracer::new(sink));
        self
    }

    pub fn cache(mut self, on: bool) -> Self {
        self.cache = if on { Some(Cache::default()) } else { None };
        self
    }

    /// Keep the nodes matched so far on failures caused by running out of input.
    pub fn partial_at_end(mut self, on: bool) -> Self {
        self.partial_at_end = on;
        self
    }

    pub fn wants_partial(&self) -> bool {
        self.partial_at_end
    }

    pub fn tracer(&self) -> Option<&Tracer<'a>> {
        self.tracer.as_ref()
    }

    pub(crate) fn cached(&self, key: (RuleId, usize)) -> Option<Outcome<'a>> {
        self.cache.as_ref().and_then(|c| c.get(key))
    }

    pub(crate) fn remember(&self, key: (RuleId, usize), outcome: &Outcome<'a>) {
        if let Some(cache) = &self.cache {
            cache.insert(key, outcome.clone());
        }
    }

    /// `(hits, misses)` so far, or `None` without a cache.
    pub fn cache_stats(&self) -> Option<(usize, usize)> {
        self.cache.as_ref().map(|c| (c.hits.get(), c.misses.get()))
    }
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoized outcomes keyed by rule identity and byte offset.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct Cache<'a> {
    #[derivative(Debug = "ignore")]
    entries: RefCell<HashMap<(RuleId, usize), Outcome<'a>>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<'a> Cache<'a> {
    fn get(&self, key: (RuleId, usize)) -> Option<Outcome<'a>> {
        let found = self.entries.borrow().get(&key).cloned();
        match &found {
            Some(_) => self.hits.set(self.hits.get() + 1),
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    fn insert(&self, key: (RuleId, usize), outcome: Outcome<'a>) {
        self.entries.borrow_mut().insert(key, outcome);
    }
}

/// Writes the indented trace of rule entries and exits.
///
/// Trace output is best-effort: a sink that errors doesn't stop the parse.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Tracer<'a> {
    #[derivative(Debug = "ignore")]
    sink: RefCell<Box<dyn Write + 'a>>,
    depth: Cell<usize>,
}

impl<'a> Tracer<'a> {
    pub fn new(sink: impl Write + 'a) -> Self {
        Self {
            sink: RefCell::new(Box::new(sink)),
            depth: Cell::new(0),
        }
    }

    /// Write one line at the current indentation.
    pub fn line(&self, args: fmt::Arguments<'_>) {
        let mut sink = self.sink.borrow_mut();
        let indent = self.depth.get() * 2;
        let _ = writeln!(sink, "{:indent$}{}", "", args, indent = indent);
    }

    /// Indent everything written until the guard drops.
    pub fn nest(&self) -> TraceScope<'_, 'a> {
        self.depth.set(self.depth.get() + 1);
        TraceScope { tracer: self }
    }
}

pub struct TraceScope<'t, 'a> {
    tracer: &'t Tracer<'a>,
}

impl Drop for TraceScope<'_, '_> {
    fn drop(&mut self) {
        let depth = self.tracer.depth.get();
        self.tracer.depth.set(depth.saturating_sub(1));
        let _ = self.tracer.sink.borrow_mut().flush();
    }
}
