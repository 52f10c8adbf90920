//! Cursor over a [`GameTree`].
//!
//! The navigator owns only a [`NodeId`]; every operation borrows the tree
//! for the duration of the call. Moves leave the cursor in place at the
//! boundaries (no parent, no child, no further sibling).

use blokit_core::{Board, Color, ColorMove};
use tracing::debug;

use crate::annotation::Annotation;
use crate::error::TreeError;
use crate::tree::{GameTree, NodeId};

/// Current position in a game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: NodeId,
}

impl Navigator {
    /// Start at the root of `tree`.
    pub fn new(tree: &GameTree) -> Navigator {
        Navigator {
            current: tree.root(),
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Position at the current node, with the turn passed over colors that
    /// have no legal move.
    pub fn board(&self, tree: &GameTree) -> Result<Board, TreeError> {
        Ok(skip_blocked(tree.board_at(self.current)?))
    }

    /// Color to move at the current node.
    pub fn to_play(&self, tree: &GameTree) -> Result<Color, TreeError> {
        Ok(self.board(tree)?.to_play())
    }

    /// Whether the current node lies on the main variation.
    pub fn is_in_main_variation(&self, tree: &GameTree) -> Result<bool, TreeError> {
        tree.is_in_main_variation(self.current)
    }

    /// Jump to any live node.
    pub fn go_to(&mut self, tree: &GameTree, node: NodeId) -> Result<NodeId, TreeError> {
        if !tree.contains(node) {
            return Err(TreeError::InvalidNode);
        }
        self.current = node;
        Ok(node)
    }

    /// Step to the parent.
    pub fn backward(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        self.step(tree.parent(self.current)?)
    }

    /// Step to the first child.
    pub fn forward(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        self.step(tree.first_child(self.current)?)
    }

    pub fn to_beginning(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        tree.node(self.current)?;
        self.current = tree.root();
        Ok(self.current)
    }

    /// Follow first children to the end of the current variation.
    pub fn to_end(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        let mut node = tree.node(self.current)?;
        while let Some(child) = node.first_child() {
            node = child;
        }
        self.current = node.id();
        Ok(self.current)
    }

    /// Go up to the nearest ancestor (or self) on the main variation.
    pub fn to_main_variation(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        let path = tree.path_from_root(self.current)?;
        let mut target = tree.root();
        for pair in path.windows(2) {
            if tree.first_child(pair[0])? != Some(pair[1]) {
                break;
            }
            target = pair[1];
        }
        self.current = target;
        Ok(target)
    }

    /// Step to the next sibling. No wrap-around.
    pub fn next_variation(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        self.step(tree.next_sibling(self.current)?)
    }

    /// Step to the previous sibling. No wrap-around.
    pub fn previous_variation(&mut self, tree: &GameTree) -> Result<NodeId, TreeError> {
        self.step(tree.previous_sibling(self.current)?)
    }

    /// Play `mv` from the current node and move onto the result.
    ///
    /// An existing child with the same move is reused, so replaying a
    /// known line does not grow the tree.
    pub fn play(&mut self, tree: &mut GameTree, mv: ColorMove) -> Result<NodeId, TreeError> {
        let node = match tree.find_child_with_move(self.current, &mv)? {
            Some(existing) => existing,
            None => tree.add_child(self.current, mv, Annotation::None, "")?,
        };
        self.current = node;
        Ok(node)
    }

    /// Delete the current node with its subtree and step to its parent.
    pub fn clear_current_move(&mut self, tree: &mut GameTree) -> Result<NodeId, TreeError> {
        let parent = tree.truncate(self.current)?;
        debug!("removed current move and its subtree");
        self.current = parent;
        Ok(parent)
    }

    /// Point at the root of a new or reset tree.
    pub fn reset(&mut self, tree: &GameTree) {
        self.current = tree.root();
    }

    fn step(&mut self, next: Option<NodeId>) -> Result<NodeId, TreeError> {
        if let Some(node) = next {
            self.current = node;
        }
        Ok(self.current)
    }
}

/// Pass the turn over colors without a legal move. Unchanged if nobody can move.
fn skip_blocked(board: Board) -> Board {
    let num_colors = board.variant().num_colors();
    let mut color = board.to_play();
    for _ in 0..num_colors {
        if board.has_legal_move(color) {
            return if color == board.to_play() {
                board
            } else {
                board.with_to_play(color)
            };
        }
        color = color.next(num_colors);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    use blokit_core::Variant;

    fn cm(color: usize, points: &str) -> ColorMove {
        ColorMove::new(Color::ALL[color], points.parse().unwrap())
    }

    #[test]
    fn play_then_walk_back_and_forth() {
        let mut tree = GameTree::new(Variant::Duo);
        let mut nav = Navigator::new(&tree);
        let n1 = nav.play(&mut tree, cm(0, "e10")).unwrap();
        let n2 = nav.play(&mut tree, cm(1, "j5")).unwrap();
        assert_eq!(nav.current(), n2);

        assert_eq!(nav.to_beginning(&tree).unwrap(), tree.root());
        assert_eq!(nav.forward(&tree).unwrap(), n1);
        assert_eq!(nav.forward(&tree).unwrap(), n2);
        assert_eq!(nav.forward(&tree).unwrap(), n2);
        assert_eq!(nav.backward(&tree).unwrap(), n1);
        assert_eq!(nav.to_end(&tree).unwrap(), n2);
    }

    #[test]
    fn backward_at_root_stays() {
        let tree = GameTree::new(Variant::Duo);
        let mut nav = Navigator::new(&tree);
        assert_eq!(nav.backward(&tree).unwrap(), tree.root());
    }

    #[test]
    fn play_reuses_existing_child() {
        let mut tree = GameTree::new(Variant::Duo);
        let mut nav = Navigator::new(&tree);
        let first = nav.play(&mut tree, cm(0, "e10")).unwrap();
        nav.backward(&tree).unwrap();
        let again = nav.play(&mut tree, cm(0, "e10")).unwrap();
        assert_eq!(first, again);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn variations_do_not_wrap() {
        let mut tree = GameTree::new(Variant::Duo);
        let root = tree.root();
        let a = tree.add_child(root, cm(0, "e10"), Annotation::None, "").unwrap();
        let b = tree.add_child(root, cm(0, "e10,e11"), Annotation::None, "").unwrap();
        let mut nav = Navigator::new(&tree);
        nav.go_to(&tree, a).unwrap();
        assert_eq!(nav.previous_variation(&tree).unwrap(), a);
        assert_eq!(nav.next_variation(&tree).unwrap(), b);
        assert_eq!(nav.next_variation(&tree).unwrap(), b);
        assert_eq!(nav.previous_variation(&tree).unwrap(), a);
    }

    #[test]
    fn to_main_variation_finds_branch_point() {
        let mut tree = GameTree::new(Variant::Duo);
        let root = tree.root();
        let a = tree.add_child(root, cm(0, "e10"), Annotation::None, "").unwrap();
        tree.add_child(a, cm(1, "j5"), Annotation::None, "").unwrap();
        let side = tree.add_child(a, cm(1, "j5,j6"), Annotation::None, "").unwrap();
        let deep = tree.add_child(side, cm(0, "f9"), Annotation::None, "").unwrap();
        let mut nav = Navigator::new(&tree);
        nav.go_to(&tree, deep).unwrap();
        assert!(!nav.is_in_main_variation(&tree).unwrap());
        assert_eq!(nav.to_main_variation(&tree).unwrap(), a);

        tree.promote_to_main(side).unwrap();
        nav.go_to(&tree, deep).unwrap();
        assert!(nav.is_in_main_variation(&tree).unwrap());
        assert_eq!(nav.to_main_variation(&tree).unwrap(), deep);
    }

    #[test]
    fn clear_current_move_steps_to_parent() {
        let mut tree = GameTree::new(Variant::Duo);
        let mut nav = Navigator::new(&tree);
        let n1 = nav.play(&mut tree, cm(0, "e10")).unwrap();
        let n2 = nav.play(&mut tree, cm(1, "j5")).unwrap();
        nav.backward(&tree).unwrap();
        assert_eq!(nav.clear_current_move(&mut tree).unwrap(), tree.root());
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(n1));
        assert!(!tree.contains(n2));
        assert_eq!(nav.clear_current_move(&mut tree), Err(TreeError::RootTruncation));
    }

    #[test]
    fn stale_cursor_is_reported() {
        let mut tree = GameTree::new(Variant::Duo);
        let mut nav = Navigator::new(&tree);
        nav.play(&mut tree, cm(0, "e10")).unwrap();
        tree.create_root(Variant::Duo);
        assert_eq!(nav.forward(&tree), Err(TreeError::InvalidNode));
        assert_eq!(nav.go_to(&tree, nav.current()), Err(TreeError::InvalidNode));
        nav.reset(&tree);
        assert_eq!(nav.current(), tree.root());
    }

    #[test]
    fn to_play_follows_last_mover() {
        let mut tree = GameTree::new(Variant::Classic);
        let mut nav = Navigator::new(&tree);
        assert_eq!(nav.to_play(&tree).unwrap(), Color::ALL[0]);
        nav.play(&mut tree, cm(0, "a20")).unwrap();
        assert_eq!(nav.to_play(&tree).unwrap(), Color::ALL[1]);
        nav.play(&mut tree, cm(3, "a1")).unwrap();
        assert_eq!(nav.to_play(&tree).unwrap(), Color::ALL[0]);
    }
}
