//! Shared types of the arrangement pipeline.
//!
//! A front end lowers a source unit into a [`SyntaxTree`] (or any other
//! [`SourceTree`]) and offers a [`SymbolResolver`]. The engine walks that
//! tree and produces [`ArrangementEntry`] records linked by
//! [`DependencyEdge`]s. [`TextRange`] and [`Document`] locate both in the
//! source text.

pub mod ast;
pub mod document;
pub mod entry;
pub mod range;
pub mod tree;

pub use ast::{SyntaxNode, SyntaxTree};
pub use document::Document;
pub use entry::{ArrangementEntry, DependencyEdge, DependencyKind, EntryId, EntryType, Modifier};
pub use range::TextRange;
pub use tree::{
    ModifierList, NoResolver, NodeId, NodeKind, SourceTree, SymbolResolver, TokenKind, TypeKind,
    PACKAGE_LOCAL,
};

#[cfg(test)]
mod tests;
