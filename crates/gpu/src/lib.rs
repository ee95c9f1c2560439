pub mod context;
pub mod program;
pub mod recording;
pub mod renderer;
pub mod surface;
pub mod vertex;

pub use context::*;
pub use program::*;
pub use renderer::*;
pub use surface::*;
pub use vertex::*;
