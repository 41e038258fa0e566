//! API middleware.
//!
//! The actor resolver runs in front of every protected route and injects
//! the caller's `Actor` into request extensions.

pub mod actor;
