//! End-to-end editing scenarios driven through the public command surface.

use blocklist_engine::{
    Block, Cmd, Fragment, ListAttributes, ListKind, Position, Selection, fixture,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn applied(lines: &[&str], cmd: Cmd) -> Vec<String> {
    let mut doc = fixture::parse(lines).unwrap();
    doc.apply(cmd);
    fixture::stringify_with_selection(&doc)
}

#[test]
fn single_bullet_line_becomes_one_item() {
    let doc = fixture::parse(&["* foo"]).unwrap();

    let block = &doc.blocks()[0];
    let list = block.list.as_ref().unwrap();
    assert_eq!(doc.blocks().len(), 1);
    assert_eq!(block.content, "foo");
    assert_eq!((list.item_id.as_str(), list.indent, &list.kind), ("000", 0, &ListKind::Bulleted));
}

#[rstest]
#[case::merge_into_empty_item(&["* ", "* []b"], Cmd::MergeBackward, &["* []b {id:001}"])]
#[case::split_at_end(
    &["* a[]"],
    Cmd::SplitListItem { at: Position::new(0, 1) },
    &["* a {id:000}", "* [] {id:a00}"]
)]
#[case::outdent_top_level(&["* A[]"], Cmd::Outdent, &["A[]"])]
#[case::indent_under_sibling(&["* A", "* B[]"], Cmd::Indent, &["* A {id:000}", "  * B[] {id:001}"])]
#[case::outdent_keeps_children_below(
    &["* a", "  * b[]", "    * c"],
    Cmd::Outdent,
    &["* a {id:000}", "* b[] {id:001}", "  * c {id:002}"]
)]
#[case::merge_forward_pulls_next_item(
    &["* a[]", "* b"],
    Cmd::MergeForward,
    &["* a[]b {id:000}"]
)]
#[case::toggle_numbered(
    &["* a[]", "  * b"],
    Cmd::ToggleList { kind: ListKind::Numbered },
    &["# a[] {id:000}", "  * b {id:001}"]
)]
fn editing_scenarios(#[case] lines: &[&str], #[case] cmd: Cmd, #[case] expected: &[&str]) {
    assert_eq!(applied(lines, cmd), expected);
}

#[test]
fn pasted_nesting_is_clamped_under_the_caret_item() {
    let fragment = Fragment::new(vec![
        Block::list_item("X", ListAttributes::new("x", 0, ListKind::Bulleted)),
        Block::list_item("Y", ListAttributes::new("y", 5, ListKind::Bulleted)),
    ]);
    let mut doc = fixture::parse(&["* a", "  * b[]"]).unwrap();

    doc.apply(Cmd::Paste { fragment });

    let indents: Vec<usize> = doc
        .blocks()
        .iter()
        .map(|block| block.list.as_ref().unwrap().indent)
        .collect();
    assert_eq!(indents, vec![0, 1, 1, 2]);
}

#[test]
fn markdown_paste_keeps_item_structure() {
    let mut doc = fixture::parse(&["* a[]"]).unwrap();

    doc.apply(Cmd::Paste {
        fragment: Fragment::from_markdown("- X\n  - Y\n\n    more\n"),
    });

    insta::assert_debug_snapshot!(fixture::stringify(&doc), @r#"
    [
        "* a {id:000}",
        "* X {id:a00}",
        "  * Y {id:a01}",
        "    more",
    ]
    "#);
}

#[test]
fn editing_session_undoes_in_reverse_order() {
    let mut doc = fixture::parse(&["* A", "* B[]"]).unwrap();
    let original = fixture::stringify(&doc);

    doc.apply(Cmd::Indent);
    let caret = doc.selection().start();
    doc.apply(Cmd::SplitListItem { at: Position::new(caret.block, 1) });
    let edited = fixture::stringify(&doc);
    assert_eq!(edited, vec!["* A {id:000}", "  * B {id:001}", "  * {id:a00}"]);

    doc.undo().unwrap();
    doc.undo().unwrap();
    assert_eq!(fixture::stringify(&doc), original);
    assert!(!doc.can_undo());

    doc.redo().unwrap();
    doc.redo().unwrap();
    assert_eq!(fixture::stringify(&doc), edited);
}

#[test]
fn disabled_commands_leave_the_document_alone() {
    let mut doc = fixture::parse(&["para[]", "* a"]).unwrap();

    for cmd in [Cmd::Indent, Cmd::Outdent, Cmd::MergeBackward] {
        assert!(!doc.is_enabled(&cmd));
        let patch = doc.apply(cmd);
        assert!(patch.changed.is_empty());
        assert_eq!(patch.version, 0);
    }
    assert_eq!(doc.selection(), Selection::caret(Position::new(0, 0)));
}

#[test]
fn external_edit_splitting_an_item_is_repaired() {
    let mut doc = fixture::parse(&["* a", "  a2", "  a3"]).unwrap();

    let patch = doc.apply(Cmd::InsertBlock {
        at: 2,
        block: Block::paragraph("wedge"),
    });

    assert_eq!(patch.changed, vec![3]);
    assert_eq!(
        fixture::stringify(&doc),
        vec!["* a {id:000}", "  a2", "wedge", "* a3 {id:a00}"]
    );
}
