//! GPU device and surface.
//!
//! `Gpu` is created per window. It picks the surface format and composite
//! alpha mode (premultiplied for the overlay), keeps the swapchain sized to
//! the window, and hands out one `GpuFrame` per redraw.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
