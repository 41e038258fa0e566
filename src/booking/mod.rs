//! Booking engine: the only component that creates appointments or
//! changes their status.
//!
//! Each operation runs in one immediate transaction: the status change,
//! the slot flip, the timeline append and any treatment record write commit
//! together or not at all.
//!
//! ```text
//! book ──► Booked ──cancel──► Cancelled
//!            │
//!            ├──complete──────► Completed
//!            └──save_treatment─┘
//! ```

pub mod engine;
pub mod error;

pub use engine::*;
pub use error::BookingError;
