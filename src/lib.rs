pub mod bmp;
pub mod config;
pub mod error;
pub mod monochromize;

pub use config::{Compat, Config};
pub use error::{MonochromizeError, Result};
pub use monochromize::{transcode, run, Monochromizer, Report};
