pub mod handlers;
pub mod resolver;

pub use resolver::{parse_hex_color, ImageResolver, PlaceholderSpec, MAX_DIMENSION};
