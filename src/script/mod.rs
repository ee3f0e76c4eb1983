//! pdfsed composition scripts.

mod atom;
mod command;
mod lexer;

pub use atom::{Atom, MAX_ATOM_LEN};
pub use command::{
    read_script, Command, ImageSpec, InfoField, PageSpec, ScriptOptions, ScriptReader, TextSpec,
};
pub use lexer::ScriptLexer;
