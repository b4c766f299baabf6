mod defaults;
pub mod draft;
pub mod workflow;

pub use draft::*;
pub use workflow::*;
