//! Interactive interview session

pub mod repl;
