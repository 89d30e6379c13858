//! Halftone engine crate.
//!
//! Owns the platform + GPU runtime pieces behind the halftone effect: device
//! and surface management, the fullscreen halftone pass, frame sources,
//! persisted settings and the winit loop that ties them together.
//!
//! The CPU/GPU layout contract lives in `halftone-types` and is re-exported
//! here as [`types`].

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod capture;
pub mod render;
pub mod settings;

pub use halftone_types as types;
