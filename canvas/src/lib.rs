pub mod digest;
pub mod draw;
pub mod surface;

pub use draw::{Color, CpuCanvas, Rect};
pub use surface::{FrameSurface, SurfaceSize};
