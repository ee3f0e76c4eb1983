//! Layout parsing module.

mod djvused;
mod options;

pub use djvused::{read_djvused, DjvusedReader, Token, Tokenizer};
pub use options::{ErrorMode, ParseOptions, LARGE_SCALE, MIN_SCALE};
