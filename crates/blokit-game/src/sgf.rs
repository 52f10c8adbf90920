//! Game records in SGF form.
//!
//! ```text
//! (;GM[Blokus Duo]PB[Alice]PW[Bob]C[Club match]
//! ;B[d10,e9,e10,e11,f10]C[Cross in the middle]TE[1]
//! (;W[i5,j4,j5,j6,k5])
//! (;W[j5]))
//! ```
//!
//! Duo records name the colors `B` and `W`; the four-color variants use
//! `1` to `4`. Move values are comma-separated points with `a1` in the
//! bottom-left corner, and an empty value is a pass. Setup placements use
//! `AB`/`AW` (`A1` to `A4` for four colors) with one value per piece, `AE`
//! removes pieces, and `PL` sets the color to play. Properties the game does
//! not understand are kept on their node and written back unchanged.

use blokit_core::{Board, Color, ColorMove, Move, Variant};
use tracing::{debug, warn};

use crate::annotation::Annotation;
use crate::error::{RecordError, TreeError};
use crate::tree::{GameTree, NodeId, NodeRef, Property, Setup};

/// Property id for moves of `color` in `variant`.
pub fn move_property(variant: Variant, color: Color) -> &'static str {
    match variant {
        Variant::Duo => ["B", "W", "", ""][color.index()],
        Variant::Classic | Variant::ClassicTwo => ["1", "2", "3", "4"][color.index()],
    }
}

/// Property id for setup placements of `color` in `variant`.
pub fn setup_property(variant: Variant, color: Color) -> &'static str {
    match variant {
        Variant::Duo => ["AB", "AW", "", ""][color.index()],
        Variant::Classic | Variant::ClassicTwo => ["A1", "A2", "A3", "A4"][color.index()],
    }
}

/// The color a move property id stands for, if it is one in `variant`.
/// `PL` values use the same names.
fn move_color(variant: Variant, id: &str) -> Option<Color> {
    variant
        .colors()
        .find(|&c| move_property(variant, c) == id)
}

fn setup_color(variant: Variant, id: &str) -> Option<Color> {
    variant
        .colors()
        .find(|&c| setup_property(variant, c) == id)
}

/// Root properties holding player names, by player slot.
fn player_properties(variant: Variant) -> &'static [&'static str] {
    match variant.num_players() {
        2 => &["PB", "PW"],
        _ => &["P1", "P2", "P3", "P4"],
    }
}

// ── Writing ──────────────────────────────────────────────────────────────────

/// Serialize the whole tree.
pub fn write(tree: &GameTree) -> String {
    let mut out = String::new();
    out.push('(');
    write_root(tree, &mut out);
    write_sequence(tree, tree.root_node(), &mut out);
    out.push_str(")\n");
    out
}

fn write_root(tree: &GameTree, out: &mut String) {
    let variant = tree.variant();
    let info = tree.game_info();
    let root = tree.root_node();
    out.push(';');
    write_property(out, "GM", variant.game_id());
    for (id, name) in player_properties(variant).iter().zip(&info.players) {
        if !name.is_empty() {
            write_property(out, id, name);
        }
    }
    for (id, value) in [
        ("DT", &info.date),
        ("EV", &info.event),
        ("RO", &info.round),
        ("RE", &info.result),
    ] {
        if !value.is_empty() {
            write_property(out, id, value);
        }
    }
    write_setup(variant, root, out);
    if !root.comment().is_empty() {
        write_property(out, "C", root.comment());
    }
    write_extra(out, root.properties());
}

/// A step of the writer's walk over variations.
enum Step<'a> {
    /// Open a variation starting with this node.
    Branch(NodeRef<'a>),
    /// Close the innermost open variation.
    Close,
}

/// Write the nodes below `root`: a single child continues the sequence,
/// several children open one parenthesized variation each.
fn write_sequence<'a>(tree: &'a GameTree, root: NodeRef<'a>, out: &mut String) {
    let mut steps = Vec::new();
    let mut next = Some(root);
    loop {
        if let Some(node) = next.take() {
            let children: Vec<NodeRef<'a>> = node.children().collect();
            if let [child] = children.as_slice() {
                out.push('\n');
                write_node(tree, *child, out);
                next = Some(*child);
                continue;
            }
            for child in children.into_iter().rev() {
                steps.push(Step::Close);
                steps.push(Step::Branch(child));
            }
        }
        match steps.pop() {
            None => return,
            Some(Step::Close) => out.push(')'),
            Some(Step::Branch(child)) => {
                out.push_str("\n(");
                write_node(tree, child, out);
                next = Some(child);
            }
        }
    }
}

fn write_node(tree: &GameTree, node: NodeRef<'_>, out: &mut String) {
    let variant = tree.variant();
    out.push(';');
    write_setup(variant, node, out);
    if let Some(mv) = node.color_move() {
        let value = if mv.mv.is_pass() {
            String::new()
        } else {
            mv.mv.to_string()
        };
        write_property(out, move_property(variant, mv.color), &value);
    }
    if !node.comment().is_empty() {
        write_property(out, "C", node.comment());
    }
    if let Some((id, value)) = node.annotation().to_property() {
        write_property(out, id, value);
    }
    write_extra(out, node.properties());
}

/// Placements grouped by color, then removals, then the color to play.
fn write_setup(variant: Variant, node: NodeRef<'_>, out: &mut String) {
    let setup = node.setup();
    for color in variant.colors() {
        let mut pieces = setup.placed.iter().filter(|p| p.color == color).peekable();
        if pieces.peek().is_none() {
            continue;
        }
        out.push_str(setup_property(variant, color));
        for piece in pieces {
            write_value(out, &piece.mv.to_string());
        }
    }
    if !setup.removed.is_empty() {
        out.push_str("AE");
        for mv in &setup.removed {
            write_value(out, &mv.to_string());
        }
    }
    if let Some(color) = node.player() {
        write_property(out, "PL", move_property(variant, color));
    }
}

fn write_extra(out: &mut String, properties: &[Property]) {
    for property in properties {
        out.push_str(&property.id);
        for value in &property.values {
            write_value(out, value);
        }
    }
}

fn write_property(out: &mut String, id: &str, value: &str) {
    out.push_str(id);
    write_value(out, value);
}

fn write_value(out: &mut String, value: &str) {
    out.push('[');
    for c in value.chars() {
        if c == ']' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(']');
}

// ── Reading ──────────────────────────────────────────────────────────────────

/// A node as parsed, before interpretation. Nodes of a game are kept in
/// document order, so a parent always comes before its children and
/// siblings keep their order.
#[derive(Debug)]
struct RawNode {
    properties: Vec<Property>,
    /// Index of the parent within the game; `None` for the root.
    parent: Option<usize>,
}

/// Parse a record and rebuild its tree, replaying and checking every move.
///
/// Only the first game of a collection is read.
pub fn read(text: &str) -> Result<GameTree, RecordError> {
    let mut parser = Parser { text, pos: 0 };
    let games = parser.collection()?;
    if games.len() > 1 {
        warn!(games = games.len(), "record holds several games, reading the first");
    }
    let mut nodes = games.into_iter().next().unwrap_or_default().into_iter();
    let Some(root) = nodes.next() else {
        return Err(parser.error("expected '('"));
    };

    let variant = read_variant(&root.properties)?;
    let mut tree = GameTree::new(variant);
    let root_board = read_root(&mut tree, root.properties)?;

    // Positions along the path to the node being read.
    let mut path: Vec<(usize, NodeId, Board)> = vec![(0, tree.root(), root_board)];
    for (index, raw) in (1..).zip(nodes) {
        while path.len() > 1 && raw.parent != path.last().map(|(i, ..)| *i) {
            path.pop();
        }
        let (parent, board) = match path.last() {
            Some((i, id, board)) if raw.parent == Some(*i) => (*id, board.clone()),
            _ => return Err(parser.error("misplaced node")),
        };
        let (id, after) = read_node(&mut tree, parent, board, raw.properties)?;
        path.push((index, id, after));
    }
    debug!(nodes = tree.len(), %variant, "record read");
    Ok(tree)
}

fn read_variant(properties: &[Property]) -> Result<Variant, RecordError> {
    let value = properties
        .iter()
        .find(|p| p.id == "GM")
        .map(first_value)
        .unwrap_or("");
    Variant::from_game_id(value.trim()).ok_or_else(|| invalid("GM", value))
}

/// Interpret the root properties. Returns the position at the root.
fn read_root(tree: &mut GameTree, properties: Vec<Property>) -> Result<Board, RecordError> {
    let variant = tree.variant();
    let root = tree.root();
    let players = player_properties(variant);
    let mut edits = SetupReader::default();
    for property in properties {
        let id = property.id.as_str();
        if move_color(variant, id).is_some() || Annotation::is_property(id) {
            return Err(invalid(id, first_value(&property)));
        }
        if edits.read(variant, &property)? {
            continue;
        }
        let value = first_value(&property).to_string();
        let info = tree.game_info_mut();
        match id {
            "GM" => {}
            "DT" => info.date = value,
            "EV" => info.event = value,
            "RO" => info.round = value,
            "RE" => info.result = value,
            "C" => tree
                .set_comment(root, value)
                .map_err(|_| invalid("C", first_value(&property)))?,
            _ => match players.iter().position(|&p| p == id) {
                Some(slot) => info.players[slot] = value,
                None => {
                    let (id, value) = (property.id.clone(), value);
                    tree.push_property(root, property)
                        .map_err(|_| invalid(&id, &value))?;
                }
            },
        }
    }

    let board = edits.check(Board::new(variant))?;
    let blame = edits.first_source();
    if !edits.setup.is_empty() {
        tree.set_setup(root, edits.setup)
            .map_err(|_| invalid(&blame.0, &blame.1))?;
    }
    if let Some(color) = edits.to_play {
        tree.set_player(root, color)
            .map_err(|_| invalid("PL", move_property(variant, color)))?;
    }
    Ok(board)
}

/// Interpret one node below the root and attach it to `parent`, whose
/// position is `before`. Returns the node and its position.
fn read_node(
    tree: &mut GameTree,
    parent: NodeId,
    before: Board,
    properties: Vec<Property>,
) -> Result<(NodeId, Board), RecordError> {
    let variant = tree.variant();
    let blame = properties
        .first()
        .map(|p| (p.id.clone(), first_value(p).to_string()))
        .unwrap_or_default();
    let mut mv: Option<(ColorMove, String, String)> = None;
    let mut edits = SetupReader::default();
    let mut comment = String::new();
    let mut annotation = Annotation::None;
    let mut extra = Vec::new();

    for property in properties {
        let id = property.id.as_str();
        let value = first_value(&property);
        if let Some(color) = move_color(variant, id) {
            if mv.is_some() {
                return Err(invalid(id, value));
            }
            let points = match value.trim() {
                "" => Move::pass(),
                text => text.parse().map_err(|_| invalid(id, value))?,
            };
            mv = Some((ColorMove::new(color, points), id.to_string(), value.to_string()));
        } else if edits.read(variant, &property)? {
            continue;
        } else if id == "C" {
            comment = value.to_string();
        } else if Annotation::is_property(id) {
            annotation = Annotation::from_property(id, value).ok_or_else(|| invalid(id, value))?;
        } else {
            extra.push(property);
        }
    }

    // Setup first, so errors name the offending property
    let board = edits.check(before.clone())?;
    if let Some((mv, id, value)) = &mv {
        board.check_move(mv.color, &mv.mv).map_err(|_| invalid(id, value))?;
    }

    let (node, after) = tree
        .attach(parent, before, mv.map(|(mv, ..)| mv), edits.setup, edits.to_play)
        .map_err(|_| invalid(&blame.0, &blame.1))?;
    let reject = |_: TreeError| invalid(&blame.0, &blame.1);
    if !comment.is_empty() {
        tree.set_comment(node, comment).map_err(reject)?;
    }
    if annotation != Annotation::None {
        tree.set_annotation(node, annotation).map_err(reject)?;
    }
    for property in extra {
        tree.push_property(node, property).map_err(reject)?;
    }
    Ok((node, after))
}

/// Setup properties of one node, remembering which property each edit
/// came from.
#[derive(Default)]
struct SetupReader {
    setup: Setup,
    to_play: Option<Color>,
    /// `(id, value)` per removal, then per placement, in setup order.
    removed_from: Vec<(String, String)>,
    placed_from: Vec<(String, String)>,
}

impl SetupReader {
    /// Take `property` if it is a setup property. Returns whether it was.
    fn read(&mut self, variant: Variant, property: &Property) -> Result<bool, RecordError> {
        let id = property.id.as_str();
        let color = setup_color(variant, id);
        if id == "PL" {
            let value = first_value(property);
            let color = move_color(variant, value.trim()).ok_or_else(|| invalid(id, value))?;
            self.to_play = Some(color);
            return Ok(true);
        }
        if id != "AE" && color.is_none() {
            return Ok(false);
        }
        for value in &property.values {
            let mv: Move = value.trim().parse().map_err(|_| invalid(id, value))?;
            let source = (id.to_string(), value.clone());
            match color {
                Some(color) => {
                    self.setup.placed.push(ColorMove::new(color, mv));
                    self.placed_from.push(source);
                }
                None => {
                    self.setup.removed.push(mv);
                    self.removed_from.push(source);
                }
            }
        }
        Ok(true)
    }

    /// Apply the edits to `board` the way the tree will, naming the first
    /// property that does not fit.
    fn check(&self, mut board: Board) -> Result<Board, RecordError> {
        for (mv, (id, value)) in self.setup.removed.iter().zip(&self.removed_from) {
            board = board.remove_setup(mv).map_err(|_| invalid(id, value))?.0;
        }
        for (placed, (id, value)) in self.setup.placed.iter().zip(&self.placed_from) {
            board = board
                .place_setup(placed.color, &placed.mv)
                .map_err(|_| invalid(id, value))?;
        }
        if let Some(color) = self.to_play {
            board = board.with_to_play(color);
        }
        Ok(board)
    }

    fn first_source(&self) -> (String, String) {
        self.removed_from
            .first()
            .or(self.placed_from.first())
            .cloned()
            .unwrap_or_default()
    }
}

fn first_value(property: &Property) -> &str {
    property.values.first().map(String::as_str).unwrap_or("")
}

fn invalid(id: &str, value: &str) -> RecordError {
    RecordError::InvalidProperty {
        id: id.to_string(),
        value: value.to_string(),
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn collection(&mut self) -> Result<Vec<Vec<RawNode>>, RecordError> {
        let mut games = Vec::new();
        while self.peek() == Some('(') {
            games.push(self.game_tree()?);
        }
        match self.peek() {
            None => Ok(games),
            Some(c) => Err(self.error(&format!("unexpected '{c}'"))),
        }
    }

    /// `( node+ game_tree* )`, flattened into document order.
    ///
    /// Open variations are tracked on an explicit stack, so nesting depth
    /// is bounded by memory rather than by the call stack.
    fn game_tree(&mut self) -> Result<Vec<RawNode>, RecordError> {
        let mut nodes: Vec<RawNode> = Vec::new();
        // Last node of each open variation; nested variations hang off it.
        let mut open: Vec<Option<usize>> = Vec::new();
        loop {
            match self.peek() {
                Some('(') => {
                    self.pos += 1;
                    if self.peek() != Some(';') {
                        return Err(self.error("empty game tree"));
                    }
                    let mut last = open.last().copied().flatten();
                    while self.peek() == Some(';') {
                        let properties = self.node()?;
                        nodes.push(RawNode {
                            properties,
                            parent: last,
                        });
                        last = Some(nodes.len() - 1);
                    }
                    open.push(last);
                }
                Some(')') if !open.is_empty() => {
                    self.pos += 1;
                    open.pop();
                    if open.is_empty() {
                        return Ok(nodes);
                    }
                }
                _ => return Err(self.error("expected ')'")),
            }
        }
    }

    fn node(&mut self) -> Result<Vec<Property>, RecordError> {
        self.expect(';')?;
        let mut properties = Vec::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() {
                break;
            }
            let id = self.identifier();
            let mut values = Vec::new();
            while self.peek() == Some('[') {
                values.push(self.value()?);
            }
            if values.is_empty() {
                return Err(self.error(&format!("property {id} has no value")));
            }
            properties.push(Property { id, values });
        }
        Ok(properties)
    }

    fn identifier(&mut self) -> String {
        let rest = &self.text[self.pos..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    /// `[ ... ]` with `\` escaping the next character. An escaped line
    /// break is dropped.
    fn value(&mut self) -> Result<String, RecordError> {
        self.expect('[')?;
        let start = self.pos;
        let mut value = String::new();
        let mut chars = self.text[start..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                ']' => {
                    self.pos = start + i + 1;
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, '\n' | '\r')) => {}
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                _ => value.push(c),
            }
        }
        self.pos = self.text.len();
        Err(self.error("unterminated property value"))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.text[self.pos..].chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<(), RecordError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{expected}'"))),
        }
    }

    fn error(&self, message: &str) -> RecordError {
        RecordError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUO: &str = "(;GM[Blokus Duo]PB[Alice]PW[Bob]\n;B[e10]C[start]\n;W[j5])";

    #[test]
    fn read_simple_duo_game() {
        let tree = read(DUO).unwrap();
        assert_eq!(tree.variant(), Variant::Duo);
        assert_eq!(tree.game_info().players, vec!["Alice", "Bob"]);
        assert_eq!(tree.len(), 3);
        let first = tree.root_node().first_child().unwrap();
        assert_eq!(first.comment(), "start");
        assert_eq!(first.color_move().unwrap().color, Color::ALL[0]);
    }

    #[test]
    fn write_uses_variant_move_ids() {
        let tree = read("(;GM[Blokus];1[a20];2[t20])").unwrap();
        let text = write(&tree);
        assert!(text.starts_with("(;GM[Blokus]"));
        assert!(text.contains(";1[a20]"));
        assert!(text.contains(";2[t20]"));
    }

    #[test]
    fn escapes_round_trip() {
        let mut tree = read(DUO).unwrap();
        let first = tree.first_child(tree.root()).unwrap().unwrap();
        tree.set_comment(first, "a ] and a \\ here").unwrap();
        let text = write(&tree);
        assert!(text.contains(r"C[a \] and a \\ here]"));
        let again = read(&text).unwrap();
        let first = again.first_child(again.root()).unwrap().unwrap();
        assert_eq!(again.comment(first).unwrap(), "a ] and a \\ here");
    }

    #[test]
    fn unknown_properties_are_kept() {
        let text = "(;GM[Blokus Duo]AP[other:1]XX[a][b]\n;B[e10]ZZ[z])";
        let tree = read(text).unwrap();
        let written = write(&tree);
        assert!(written.contains("AP[other:1]"));
        assert!(written.contains("XX[a][b]"));
        assert!(written.contains("ZZ[z]"));
    }

    #[test]
    fn missing_or_unknown_game_is_invalid() {
        assert_eq!(
            read("(;B[e10])").unwrap_err(),
            RecordError::InvalidProperty { id: "GM".into(), value: "".into() }
        );
        assert_eq!(
            read("(;GM[Go])").unwrap_err(),
            RecordError::InvalidProperty { id: "GM".into(), value: "Go".into() }
        );
    }

    #[test]
    fn bad_moves_name_the_property() {
        let err = read("(;GM[Blokus Duo];B[a1])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "B".into(), value: "a1".into() });

        let err = read("(;GM[Blokus Duo];B[zz99])").unwrap_err();
        assert!(matches!(err, RecordError::InvalidProperty { ref id, .. } if id == "B"));

        let err = read("(;GM[Blokus Duo];B[e10,g10])").unwrap_err();
        assert!(matches!(err, RecordError::InvalidProperty { ref id, .. } if id == "B"));

        let err = read("(;GM[Blokus Duo];B[e10]W[j5])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "W".into(), value: "j5".into() });
    }

    #[test]
    fn nodes_without_moves_are_kept() {
        let tree = read("(;GM[Blokus Duo];1[e10]C[not a duo move];B[e10])").unwrap();
        assert_eq!(tree.len(), 3);
        let empty = tree.root_node().first_child().unwrap();
        assert_eq!(empty.color_move(), None);
        assert_eq!(empty.comment(), "not a duo move");
        assert_eq!(empty.properties()[0].id, "1");
        assert!(write(&tree).contains(";C[not a duo move]1[e10]"));
    }

    #[test]
    fn empty_move_value_is_a_pass() {
        let text = "(;GM[Blokus Duo]\n;B[e10]\n;W[]\n;B[f11,g11])\n";
        let tree = read(text).unwrap();
        let pass = tree.root_node().first_child().and_then(|n| n.first_child()).unwrap();
        assert_eq!(pass.color_move(), Some(&ColorMove::new(Color::ALL[1], Move::pass())));
        let last = pass.first_child().unwrap();
        assert_eq!(tree.move_number(last.id()).unwrap(), 2);
        assert_eq!(write(&tree), text);
    }

    #[test]
    fn setup_and_player_round_trip() {
        let text = "(;GM[Blokus Duo]AB[a1,b1][n14]AW[j5]PL[W]C[position]\n;W[k4,l4]\n;AE[n14]\n;B[c2])\n";
        let tree = read(text).unwrap();
        let root = tree.root_node();
        assert_eq!(root.comment(), "position");
        assert_eq!(root.player(), Some(Color::ALL[1]));
        assert_eq!(root.setup().placed.len(), 3);
        assert!(root.properties().is_empty());

        let board = tree.board_at(tree.root()).unwrap();
        assert_eq!(board.to_play(), Color::ALL[1]);
        assert_eq!(board.color_on("n14".parse().unwrap()), Some(Color::ALL[0]));

        let removal = root.first_child().and_then(|n| n.first_child()).unwrap();
        assert_eq!(removal.setup().removed, vec!["n14".parse::<Move>().unwrap()]);
        let last = removal.first_child().unwrap();
        assert_eq!(tree.move_number(last.id()).unwrap(), 1);
        assert_eq!(tree.moves_left(tree.root()).unwrap(), 1);
        assert_eq!(write(&tree), text);
    }

    #[test]
    fn bad_setup_names_the_property() {
        let err = read("(;GM[Blokus Duo]AB[e10]AW[e10])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "AW".into(), value: "e10".into() });

        let err = read("(;GM[Blokus Duo];AE[e10])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "AE".into(), value: "e10".into() });

        let err = read("(;GM[Blokus Duo]PL[3])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "PL".into(), value: "3".into() });

        let err = read("(;GM[Blokus Duo];AB[a1];B[e10])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "B".into(), value: "e10".into() });
    }

    #[test]
    fn root_comment_is_the_comment() {
        let tree = read("(;GM[Blokus Duo]C[hello])").unwrap();
        assert_eq!(tree.comment(tree.root()).unwrap(), "hello");
        assert!(tree.root_node().properties().is_empty());
        assert_eq!(write(&tree), "(;GM[Blokus Duo]C[hello])\n");

        let err = read("(;GM[Blokus Duo]TE[1])").unwrap_err();
        assert!(matches!(err, RecordError::InvalidProperty { ref id, .. } if id == "TE"));
    }

    #[test]
    fn deeply_nested_record_is_a_syntax_error() {
        let err = read(&"(".repeat(200_000)).unwrap_err();
        assert!(matches!(err, RecordError::Syntax { .. }), "{err:?}");

        let text = format!("(;GM[Blokus Duo]{}", "(;C[x]".repeat(100_000));
        assert!(matches!(read(&text), Err(RecordError::Syntax { .. })));
    }

    #[test]
    fn deep_variations_read_and_write() {
        let depth = 20_000;
        let text = format!(
            "(;GM[Blokus Duo]{}{})",
            "(;C[a](;C[b])".repeat(depth),
            ")".repeat(depth)
        );
        let tree = read(&text).unwrap();
        assert_eq!(tree.len(), 2 * depth + 1);
        let written = write(&tree);
        assert_eq!(write(&read(&written).unwrap()), written);
    }

    #[test]
    fn bad_annotation_value_is_invalid() {
        let err = read("(;GM[Blokus Duo];B[e10]TE[7])").unwrap_err();
        assert_eq!(err, RecordError::InvalidProperty { id: "TE".into(), value: "7".into() });
    }

    #[test]
    fn syntax_errors_report_offset() {
        let err = read("(;GM[Blokus Duo];B[e10]").unwrap_err();
        assert!(matches!(err, RecordError::Syntax { offset: 23, .. }), "{err:?}");

        let err = read("(;GM[Blokus Duo]B)").unwrap_err();
        assert!(matches!(err, RecordError::Syntax { .. }));

        let err = read("(;GM[Blokus Duo])x").unwrap_err();
        assert!(matches!(err, RecordError::Syntax { offset: 17, .. }), "{err:?}");

        let err = read("").unwrap_err();
        assert!(matches!(err, RecordError::Syntax { offset: 0, .. }));

        let err = read("()").unwrap_err();
        assert!(matches!(err, RecordError::Syntax { .. }));
    }

    #[test]
    fn variations_keep_order() {
        let text = "(;GM[Blokus Duo];B[e10](;W[j5])(;W[j5,j6])(;W[j4,j5]))";
        let tree = read(text).unwrap();
        let first = tree.first_child(tree.root()).unwrap().unwrap();
        let replies: Vec<String> = tree
            .children(first)
            .unwrap()
            .into_iter()
            .map(|id| tree.get_move(id).unwrap().unwrap().mv.to_string())
            .collect();
        assert_eq!(replies, vec!["j5", "j5,j6", "j4,j5"]);
    }
}
