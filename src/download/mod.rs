pub mod manifest;
mod pipeline;
pub mod progress;
pub mod utils;

pub use pipeline::{EmitOptions, Pipeline, Summary};
