//! Simple read-only analytics over interview history

pub mod rollup;
