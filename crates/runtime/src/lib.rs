pub mod diagnostics;
pub mod frame;
pub mod render_loop;

pub use diagnostics::*;
pub use frame::*;
pub use render_loop::*;
