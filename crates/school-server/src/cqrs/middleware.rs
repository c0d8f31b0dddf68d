//! Marker traits separating writes from reads
//!
//! Commands change state and are logged at `info`; queries only read.
//! Every request type registered with the mediator implements exactly one
//! of the two.

/// A request that modifies state
pub trait Command {}

/// A request that only reads state
pub trait Query {}
