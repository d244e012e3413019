//! CQRS marker traits
//!
//! Every request type sent through the mediator is tagged as either a
//! [`Command`] (writes state) or a [`Query`] (reads state only).

/// Marker for requests that modify state
pub trait Command {}

/// Marker for read-only requests
pub trait Query {}
