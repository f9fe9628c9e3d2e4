pub mod types;

pub mod count_tokens;
pub mod embed_content;
pub mod generate_content;
pub mod stream_content;

pub use types::*;
