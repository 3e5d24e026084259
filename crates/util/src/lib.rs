pub mod json;
pub mod path;
pub mod text;

pub use json::{JsonParseError, parse_body_strict};
pub use text::{encode_uri_component, is_truthy, value_to_text};
