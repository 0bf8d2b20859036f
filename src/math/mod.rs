mod color;

pub use color::{ColorParseError, Rgba};
