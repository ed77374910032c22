//! Java front end.
//!
//! [`parse_java`] lowers tree-sitter-java output into an [`ir::SyntaxTree`]
//! with the shape the entry builder expects, [`JavaResolver`] answers call,
//! reference and override queries within the same unit.

mod parser;
mod resolver;

pub use parser::parse_java;
pub use resolver::JavaResolver;

#[cfg(test)]
mod tests;
