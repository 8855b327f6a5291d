//! Line tokenizer for the text configuration language.

pub mod tokenizer;

pub use tokenizer::{Tokenizer, COMMENT_CHAR};
