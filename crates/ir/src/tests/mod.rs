use super::*;
use serde_json::Value as JsonValue;

fn named(tree: &mut SyntaxTree, parent: NodeId, kind: NodeKind, name: &str, span: TextRange) -> NodeId {
    let id = tree.push(parent, kind, "decl", span);
    if let Some(node) = tree.node_mut(id) {
        node.name = Some(name.to_string());
    }
    id
}

#[test]
fn range_parse_and_display() {
    let r: TextRange = "3..17".parse().unwrap();
    assert_eq!(r, TextRange::new(3, 17));
    assert_eq!(r.to_string(), "3..17");
    assert!("9..2".parse::<TextRange>().is_err());
    assert!("12".parse::<TextRange>().is_err());
}

#[test]
fn range_intersection_is_inclusive() {
    let a = TextRange::new(10, 20);
    assert!(a.intersects(&TextRange::new(20, 30)));
    assert!(a.intersects(&TextRange::new(0, 10)));
    assert!(a.intersects(&TextRange::new(12, 13)));
    assert!(!a.intersects(&TextRange::new(21, 30)));
    assert_eq!(a.union(&TextRange::new(5, 12)), TextRange::new(5, 20));
}

#[test]
fn document_lines() {
    let doc = Document::new("first\r\nsecond\nthird");
    assert_eq!(doc.line_count(), 3);
    assert_eq!(doc.line_number(0), 0);
    assert_eq!(doc.line_number(7), 1);
    assert_eq!(doc.line_number(19), 2);
    assert_eq!(doc.line_end_offset(0), 5);
    assert_eq!(doc.line_end_offset(2), 19);
}

#[test]
fn expand_to_line_rejects_shared_lines() {
    let text = "class A {\n    int a; int b;\n    void m() {}\n}\n";
    let doc = Document::new(text);
    let a = text.find("int a;").unwrap();
    let b = text.find("int b;").unwrap();
    assert_eq!(doc.expand_to_line(TextRange::new(a, a + 6)), None);
    assert_eq!(doc.expand_to_line(TextRange::new(b, b + 6)), None);

    let m = text.find("void").unwrap();
    let line_start = text[..m].rfind('\n').unwrap() + 1;
    assert_eq!(
        doc.expand_to_line(TextRange::new(m, m + 11)),
        Some(TextRange::new(line_start, m + 11))
    );
}

#[test]
fn package_local_means_no_access_keyword() {
    let mut list = ModifierList::new(["static"]);
    assert!(list.has_modifier_property(PACKAGE_LOCAL));
    list.add_implicit("public");
    assert!(!list.has_modifier_property(PACKAGE_LOCAL));
    list.add_implicit("public");
    assert_eq!(list.implicit, vec!["public".to_string()]);
}

#[test]
fn qualified_names_follow_nesting() {
    let mut tree = SyntaxTree::new("A.java", TextRange::new(0, 100));
    let root = tree.root();
    if let Some(file) = tree.node_mut(root) {
        file.name = Some("com.acme".into());
    }
    let outer = named(&mut tree, root, NodeKind::Type(TypeKind::Class), "Outer", TextRange::new(0, 100));
    let body = tree.push(outer, NodeKind::ClassBody, "class_body", TextRange::new(10, 100));
    let inner = named(&mut tree, body, NodeKind::Type(TypeKind::Interface), "Inner", TextRange::new(20, 40));
    let method = tree.push(body, NodeKind::Method, "method_declaration", TextRange::new(50, 90));
    let local = named(&mut tree, method, NodeKind::Type(TypeKind::Class), "Local", TextRange::new(60, 80));

    assert_eq!(tree.qualified_name(outer).as_deref(), Some("com.acme.Outer"));
    assert_eq!(tree.qualified_name(inner).as_deref(), Some("com.acme.Outer.Inner"));
    assert_eq!(tree.qualified_name(local), None);
    assert_eq!(tree.enclosing_class(local), Some(outer));
}

#[test]
fn fill_gaps_separates_siblings() {
    let source = "{ a , b }";
    let mut tree = SyntaxTree::new("gap.java", TextRange::new(0, source.len()));
    let root = tree.root();
    let open = tree.push(root, NodeKind::Token(TokenKind::LBrace), "{", TextRange::new(0, 1));
    let a = tree.push(root, NodeKind::Field, "a", TextRange::new(2, 3));
    let b = tree.push(root, NodeKind::Field, "b", TextRange::new(6, 7));
    tree.fill_gaps(source);

    let kids = tree.children(root).to_vec();
    assert_eq!(kids.len(), 5);
    assert_eq!(kids[0], open);
    assert_eq!(tree.kind(kids[1]), NodeKind::Whitespace);
    assert_eq!(kids[2], a);
    assert_eq!(tree.kind(kids[3]), NodeKind::Token(TokenKind::Other));
    assert_eq!(tree.prev_sibling(b), Some(kids[3]));
    assert_eq!(tree.next_sibling(open), Some(kids[1]));
    assert_eq!(tree.last_child(root), Some(b));
}

#[test]
fn sibling_indices_follow_gap_insertion() {
    let source = "{ a, b; }";
    let mut tree = SyntaxTree::new("gap.java", TextRange::new(0, source.len()));
    let root = tree.root();
    let open = tree.push(root, NodeKind::Token(TokenKind::LBrace), "{", TextRange::new(0, 1));
    let a = tree.push(root, NodeKind::Field, "a", TextRange::new(2, 3));
    let comma = tree.push(root, NodeKind::Token(TokenKind::Comma), ",", TextRange::new(3, 4));
    let b = tree.push(root, NodeKind::Field, "b", TextRange::new(5, 7));
    assert_eq!(tree.sibling_index(b), Some(3));
    assert_eq!(tree.sibling_index(root), None);

    tree.fill_gaps(source);
    for (index, &child) in tree.children(root).iter().enumerate() {
        assert_eq!(tree.sibling_index(child), Some(index));
    }
    assert_eq!(tree.next_sibling(a), Some(comma));
    assert_eq!(tree.prev_sibling(a).map(|p| tree.kind(p)), Some(NodeKind::Whitespace));
    assert_eq!(tree.prev_sibling(open), None);
    assert_eq!(tree.next_sibling(tree.last_child(root).unwrap()), None);
}

#[test]
fn entry_serialization() {
    let mut entry = ArrangementEntry::new(
        NodeId(3),
        Some(EntryId(0)),
        TextRange::new(4, 9),
        EntryType::Field,
        Some("x".into()),
        true,
    );
    entry.add_modifier(Modifier::Private);
    entry.add_modifier(Modifier::Static);
    assert!(entry.has_modifier(Modifier::Static));

    let v: JsonValue = serde_json::to_value(&entry).unwrap();
    assert_eq!(v["kind"], "Field");
    assert_eq!(v["parent"], 0);
    assert_eq!(v["modifiers"], serde_json::json!(["Private", "Static"]));
    assert_eq!(EntryType::Constructor.to_string(), "CONSTRUCTOR");
    assert_eq!(Modifier::PackagePrivate.to_string(), "package-private");
}
