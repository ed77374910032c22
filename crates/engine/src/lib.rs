//! Arrangement entry graph builder.
//!
//! Walks a Java syntax tree and collects the declarations a rearranger may
//! move (classes, fields, initializers, methods) together with the ordering
//! hints between them: initializer order, overrides, intra-unit calls and
//! getter/setter pairs.

use ir::{Document, SourceTree, SymbolResolver, TextRange};
use tracing::debug;

mod body;
pub mod collector;
pub mod export;
mod properties;
pub mod settings;
mod visitor;

pub use body::MethodBodyScanner;
pub use collector::{
    ArrangementCollector, ArrangementParseInfo, DependencyNode, OverriddenMethod,
    OverriddenMethods, PropertyInfo, NO_CONTENT,
};
pub use export::{to_dot, to_mermaid, ArrangementReport, PropertyReport};
pub use properties::{detect_accessor, Accessor};
pub use settings::{ArrangementSettings, GroupingRule};
pub use visitor::EntryGraphBuilder;

/// Runs the builder over `tree` and returns everything it collected.
///
/// Only declarations intersecting `ranges` are reported. Pass a
/// [`Document`] to snap entries to whole lines.
pub fn collect_entries<T, R>(
    tree: &T,
    resolver: &R,
    document: Option<&Document>,
    ranges: &[TextRange],
    settings: &ArrangementSettings,
) -> ArrangementParseInfo
where
    T: SourceTree,
    R: SymbolResolver,
{
    let mut info = ArrangementParseInfo::new();
    let created =
        EntryGraphBuilder::new(tree, resolver, &mut info, document, ranges, settings).build();
    debug!(
        entries = created,
        roots = info.roots().len(),
        ranges = ranges.len(),
        "Collected arrangement entries"
    );
    info
}

#[cfg(test)]
mod tests;
