//! Time subsystem.
//!
//! Frame timing utilities that do not depend on the runtime:
//! - `FrameClock`: one per window, `tick()` once per presented frame
//! - `FramePacer`: rate-limits work (capture polling) to a target fps
//! - `SafetyTimer`: one-shot deadline used to auto-disable the overlay

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::{FramePacer, SafetyTimer};
