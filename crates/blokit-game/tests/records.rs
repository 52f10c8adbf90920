//! Integration tests for game records: tree editing, navigation over
//! variations, and reading back what was written.

use blokit_core::{Color, ColorMove, Variant};
use blokit_game::{Annotation, GameTree, Navigator, NodeId, Property, TreeError, sgf};

fn cm(color: usize, points: &str) -> ColorMove {
    ColorMove::new(Color::ALL[color], points.parse().unwrap())
}

/// Main line e10 / j5 / f11,g11 with a side variation at the first move.
fn sample_tree() -> (GameTree, [NodeId; 4]) {
    let mut tree = GameTree::new(Variant::Duo);
    let root = tree.root();
    let n1 = tree.add_child(root, cm(0, "e10"), Annotation::Good, "center").unwrap();
    let n2 = tree.add_child(n1, cm(1, "j5"), Annotation::None, "").unwrap();
    let n3 = tree.add_child(n2, cm(0, "f11,g11"), Annotation::None, "").unwrap();
    let side = tree
        .add_child(root, cm(0, "e10,e11"), Annotation::Doubtful, "a domino [first]")
        .unwrap();
    (tree, [n1, n2, n3, side])
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[test]
fn replaying_the_main_line_reaches_the_same_position() {
    let (tree, [_, _, n3, _]) = sample_tree();
    let mut nav = Navigator::new(&tree);
    nav.to_end(&tree).unwrap();
    assert_eq!(nav.current(), n3);
    let end = nav.board(&tree).unwrap();

    nav.to_beginning(&tree).unwrap();
    let mut steps = 0;
    while tree.first_child(nav.current()).unwrap().is_some() {
        nav.forward(&tree).unwrap();
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(nav.board(&tree).unwrap().hash(), end.hash());
    assert_eq!(tree.move_number(nav.current()).unwrap(), 3);
    assert_eq!(tree.moves_left(tree.root()).unwrap(), 3);
}

#[test]
fn promoting_a_variation_changes_the_main_line() {
    let (mut tree, [n1, _, _, side]) = sample_tree();
    assert!(!tree.is_in_main_variation(side).unwrap());

    tree.promote_to_main(side).unwrap();
    assert_eq!(tree.first_child(tree.root()).unwrap(), Some(side));
    assert_eq!(tree.next_sibling(side).unwrap(), Some(n1));

    let mut nav = Navigator::new(&tree);
    assert_eq!(nav.to_end(&tree).unwrap(), side);
    nav.go_to(&tree, n1).unwrap();
    assert_eq!(nav.to_main_variation(&tree).unwrap(), tree.root());
}

#[test]
fn truncating_removes_the_whole_subtree() {
    let (mut tree, [n1, n2, n3, side]) = sample_tree();
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.truncate(n1).unwrap(), tree.root());
    assert_eq!(tree.len(), 2);
    for gone in [n1, n2, n3] {
        assert_eq!(tree.node(gone).err(), Some(TreeError::InvalidNode));
    }
    assert_eq!(tree.children(tree.root()).unwrap(), vec![side]);
    assert_eq!(tree.truncate(tree.root()), Err(TreeError::RootTruncation));
}

#[test]
fn illegal_moves_never_enter_the_tree() {
    let (mut tree, [n1, ..]) = sample_tree();
    let err = tree.add_child(n1, cm(1, "e11"), Annotation::None, "").unwrap_err();
    assert!(matches!(err, TreeError::IllegalMove { .. }), "{err:?}");
    assert_eq!(tree.len(), 5);
}

// ── Records ───────────────────────────────────────────────────────────────────

#[test]
fn written_record_reads_back_identically() {
    let (mut tree, [_, n2, _, _]) = sample_tree();
    tree.game_info_mut().players = vec!["Alice".to_string(), "Bob".to_string()];
    tree.game_info_mut().date = "2024-05-01".to_string();
    tree.push_property(
        n2,
        Property {
            id: "XX".to_string(),
            values: vec!["kept".to_string()],
        },
    )
    .unwrap();

    let text = sgf::write(&tree);
    let read = sgf::read(&text).unwrap();
    assert_eq!(sgf::write(&read), text);

    assert_eq!(read.variant(), Variant::Duo);
    assert_eq!(read.len(), 5);
    assert_eq!(read.game_info().players, ["Alice", "Bob"]);
    assert_eq!(read.game_info().date, "2024-05-01");

    let root = read.root_node();
    let first: Vec<_> = root.children().collect();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].color_move(), Some(&cm(0, "e10")));
    assert_eq!(first[0].annotation(), Annotation::Good);
    assert_eq!(first[0].comment(), "center");
    assert_eq!(first[1].comment(), "a domino [first]");
    assert_eq!(first[1].annotation(), Annotation::Doubtful);

    let reply = first[0].first_child().unwrap();
    assert_eq!(reply.properties()[0].id, "XX");
    assert_eq!(reply.properties()[0].values, ["kept"]);
}

#[test]
fn four_color_records_use_numbered_properties() {
    let mut tree = GameTree::new(Variant::Classic);
    let root = tree.root();
    let a = tree.add_child(root, cm(0, "a20"), Annotation::None, "").unwrap();
    tree.add_child(a, cm(1, "t20"), Annotation::None, "").unwrap();

    let text = sgf::write(&tree);
    assert!(text.contains("GM[Blokus]"), "{text}");
    assert!(text.contains(";1[a20]"), "{text}");
    assert!(text.contains(";2[t20]"), "{text}");

    let read = sgf::read(&text).unwrap();
    assert_eq!(read.variant(), Variant::Classic);
    assert_eq!(read.len(), 3);
}

#[test]
fn record_with_an_illegal_move_is_rejected() {
    let text = "(;GM[Blokus Duo];B[e10];W[e11])";
    assert!(sgf::read(text).is_err());
}

#[test]
fn kept_subtree_reads_back_as_a_setup_position() {
    let (mut tree, [_, n2, n3, side]) = sample_tree();
    let position = tree.board_at(n2).unwrap();
    tree.keep_only_subtree(n2).unwrap();
    assert_eq!(tree.root(), n2);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.node(side).err(), Some(TreeError::InvalidNode));
    assert_eq!(tree.move_number(n3).unwrap(), 1);

    let text = sgf::write(&tree);
    assert!(text.contains("AB[e10]"), "{text}");
    assert!(text.contains("AW[j5]"), "{text}");
    assert!(text.contains("PL[B]"), "{text}");

    let read = sgf::read(&text).unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read.board_at(read.root()).unwrap().hash(), position.hash());
    assert_eq!(sgf::write(&read), text);
}
