pub mod actor;
pub mod audio;
pub mod camera;
pub mod color;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod options;
pub mod renderer;
pub mod sim;
pub mod snapshot;
pub mod window;
pub mod world;

pub use error::{Error, Result};
