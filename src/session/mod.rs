pub mod visualization;

pub use visualization::{RenderOpts, RenderStats, Visualization};
