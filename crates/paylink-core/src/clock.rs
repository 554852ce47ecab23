//! Clock and Reference Sources
//!
//! Randomness and wall-clock access behind small traits so reference
//! generation and receipt timestamps stay deterministic under test.

use chrono::{DateTime, Utc};

use crate::model::TxReference;

/// Wall-clock source
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of fresh transaction references
pub trait ReferenceSource: Send + Sync {
    fn new_reference(&self) -> TxReference;
}

/// Random (UUID v4) reference source
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomReferences;

impl ReferenceSource for RandomReferences {
    fn new_reference(&self) -> TxReference {
        TxReference::new()
    }
}

/// Fixed clock for tests
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed reference source for tests
#[derive(Clone, Debug)]
pub struct FixedReferences(pub TxReference);

impl ReferenceSource for FixedReferences {
    fn new_reference(&self) -> TxReference {
        self.0.clone()
    }
}
