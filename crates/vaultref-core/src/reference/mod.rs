//! Reference detection and parsing

mod matcher;

pub use matcher::ReferenceMatcher;
