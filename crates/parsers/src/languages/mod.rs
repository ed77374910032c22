/// Source languages understood by the arrangement pipeline.
///
/// Each language module exposes a `parse_<language>` function producing a
/// [`crate::ParsedUnit`] and a resolver over the lowered tree.
pub mod java;
pub use java::{parse_java, JavaResolver};
