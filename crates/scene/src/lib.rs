pub mod assets;
pub mod axis;
pub mod config;
pub mod error;
pub mod host;
pub mod rotating;
pub mod setup;
pub mod triangle;

pub use config::*;
pub use error::*;
pub use host::*;
pub use setup::*;
