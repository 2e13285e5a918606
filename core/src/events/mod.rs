//! Event controller (§4.H): surface movement and bubble bursting.
//!
//! Two independent discrete events, checked every solver step. They are
//! mutually exclusive by construction — each is represented by an enum
//! with at most one active variant per call, never a pair of independent
//! booleans that could both be set.

mod bursting;
mod surface;

pub use bursting::BubbleBurstController;
pub use surface::{SurfaceEvent, SurfaceMovementController};
