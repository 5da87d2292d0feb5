//! Short-lived read cache in front of another store.
//!
//! RULE: the cache is dropped before and after every write, so a read
//! after a failed write always goes to the underlying store.

use super::EventStore;
use crate::{error::CheckResult, record::Record};
use std::time::{Duration, Instant};

pub struct CachedStore<S> {
    inner:  S,
    ttl:    Duration,
    cached: Option<(Instant, Vec<Record>)>,
}

impl<S: EventStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self { inner, ttl, cached: None }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_warm(&self) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|(at, _)| at.elapsed() < self.ttl)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        self.invalidate();
        &mut self.inner
    }
}

impl<S: EventStore> EventStore for CachedStore<S> {
    fn read_all(&mut self) -> CheckResult<Vec<Record>> {
        if self.is_warm() {
            if let Some((_, records)) = &self.cached {
                log::debug!("cache hit: {} rows", records.len());
                return Ok(records.clone());
            }
        }
        let records = self.inner.read_all()?;
        self.cached = Some((Instant::now(), records.clone()));
        Ok(records)
    }

    fn read_fresh(&mut self) -> CheckResult<Vec<Record>> {
        self.invalidate();
        self.read_all()
    }

    fn write_all(&mut self, records: &[Record]) -> CheckResult<()> {
        self.invalidate();
        let result = self.inner.write_all(records);
        self.invalidate();
        result
    }
}
