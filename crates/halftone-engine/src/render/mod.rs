//! GPU rendering subsystem.
//!
//! A single fullscreen pass: the captured screen is bound as a texture and
//! the halftone fragment shader writes every pixel of the surface.
//!
//! Convention:
//! - Geometry is the clip-space quad from `halftone-types`.
//! - Binding numbers come from the same crate; the WGSL file must agree.

mod ctx;
mod halftone;
pub mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use halftone::HalftoneRenderer;
