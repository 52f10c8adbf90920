//! The game record: an arena of positions linked by moves.
//!
//! Nodes live in slots of a single vector and are addressed by [`NodeId`]
//! handles carrying the tree id, slot index, and slot generation. Removing a
//! node frees its slot and bumps the generation, so a handle that outlived
//! its node is detected and rejected instead of aliasing whatever reuses the
//! slot. Resetting the tree gives it a fresh id, which invalidates every
//! handle issued before.
//!
//! The tree stores moves and setup edits only. Positions are rebuilt on
//! demand by replaying the path from the root with [`GameTree::board_at`].
//! Every node is checked against the position before it when it enters the
//! tree, so every path replays.

use std::sync::atomic::{AtomicU32, Ordering};

use blokit_core::{Board, Color, ColorMove, Move, MoveError, Variant};

use crate::annotation::Annotation;
use crate::error::TreeError;

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(1);

fn next_tree_id() -> u32 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node of a [`GameTree`].
///
/// Cheap to copy and never borrows the tree. Every tree operation checks
/// the handle and fails with [`TreeError::InvalidNode`] if the node was
/// removed or belongs to another (or a reset) tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u32,
    index: u32,
    generation: u32,
}

/// A record property the game does not interpret, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property identifier.
    pub id: String,
    /// Raw (unescaped) values.
    pub values: Vec<String>,
}

/// Pieces put on or taken off the board at a node, outside the turn order.
///
/// Removals apply before placements. Placements ignore the contact rules
/// but never overlap other pieces or reuse a piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Setup {
    /// Pieces placed, with their colors.
    pub placed: Vec<ColorMove>,
    /// Pieces taken off, whatever their color.
    pub removed: Vec<Move>,
}

impl Setup {
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty() && self.removed.is_empty()
    }
}

/// Information about the game as a whole, stored on the root when saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameInfo {
    /// Player names by player slot. Empty strings are unset.
    pub players: Vec<String>,
    /// Date the game was played.
    pub date: String,
    /// Event name.
    pub event: String,
    /// Round within the event.
    pub round: String,
    /// Result, e.g. `B+3`.
    pub result: String,
}

impl GameInfo {
    fn for_variant(variant: Variant) -> GameInfo {
        GameInfo {
            players: vec![String::new(); variant.num_players()],
            ..GameInfo::default()
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    mv: Option<ColorMove>,
    setup: Setup,
    /// Color to play after the setup, before the move.
    to_play: Option<Color>,
    comment: String,
    annotation: Annotation,
    parent: Option<u32>,
    children: Vec<u32>,
    extra: Vec<Property>,
}

impl Node {
    fn new(mv: Option<ColorMove>, parent: Option<u32>) -> Node {
        Node {
            mv,
            setup: Setup::default(),
            to_play: None,
            comment: String::new(),
            annotation: Annotation::None,
            parent,
            children: Vec::new(),
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Read-only view of one node, borrowed from its tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a GameTree,
    index: u32,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.tree.handle(self.index)
    }

    /// The move played at this node; `None` at the root and at nodes that
    /// only edit the position.
    pub fn color_move(&self) -> Option<&'a ColorMove> {
        self.node.mv.as_ref()
    }

    pub fn setup(&self) -> &'a Setup {
        &self.node.setup
    }

    /// Whether pieces are placed or removed at this node.
    pub fn has_setup(&self) -> bool {
        !self.node.setup.is_empty()
    }

    /// Color set to play at this node, if any.
    pub fn player(&self) -> Option<Color> {
        self.node.to_play
    }

    pub fn comment(&self) -> &'a str {
        &self.node.comment
    }

    pub fn annotation(&self) -> Annotation {
        self.node.annotation
    }

    /// Uninterpreted record properties of this node.
    pub fn properties(&self) -> &'a [Property] {
        &self.node.extra
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.map(|i| self.tree.view(i))
    }

    /// Children in order; the first one continues the main variation.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + use<'a> {
        let (tree, node) = (self.tree, self.node);
        node.children.iter().map(move |&i| tree.view(i))
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.node.children.first().map(|&i| self.tree.view(i))
    }

    fn position_among_siblings(&self) -> Option<(&'a [u32], usize)> {
        let parent = self.tree.live(self.node.parent?)?;
        let pos = parent.children.iter().position(|&c| c == self.index)?;
        Some((&parent.children, pos))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.index)
            .field("move", &self.node.mv)
            .field("children", &self.node.children.len())
            .finish()
    }
}

/// A branching game record for one variant.
#[derive(Debug, Clone)]
pub struct GameTree {
    id: u32,
    variant: Variant,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: u32,
    len: usize,
    info: GameInfo,
}

impl GameTree {
    /// Create a tree holding only the root.
    pub fn new(variant: Variant) -> GameTree {
        GameTree {
            id: next_tree_id(),
            variant,
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(None, None)),
            }],
            free: Vec::new(),
            root: 0,
            len: 1,
            info: GameInfo::for_variant(variant),
        }
    }

    /// Discard the whole record and start over with a lone root.
    ///
    /// Every previously issued [`NodeId`] becomes invalid.
    pub fn create_root(&mut self, variant: Variant) -> NodeId {
        *self = GameTree::new(variant);
        self.root()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn root(&self) -> NodeId {
        self.handle(self.root)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn game_info(&self) -> &GameInfo {
        &self.info
    }

    pub fn game_info_mut(&mut self) -> &mut GameInfo {
        &mut self.info
    }

    /// Whether `id` names a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_ok()
    }

    /// View the node named by `id`.
    pub fn node(&self, id: NodeId) -> Result<NodeRef<'_>, TreeError> {
        self.index_of(id).map(|i| self.view(i))
    }

    /// View the root.
    pub fn root_node(&self) -> NodeRef<'_> {
        self.view(self.root)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent().map(|n| n.id()))
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        Ok(self.node(id)?.children().map(|n| n.id()).collect())
    }

    pub fn first_child(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.first_child().map(|n| n.id()))
    }

    /// The sibling after `id`, if any. No wrap-around.
    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let node = self.node(id)?;
        Ok(node
            .position_among_siblings()
            .and_then(|(siblings, pos)| siblings.get(pos + 1))
            .map(|&i| self.handle(i)))
    }

    /// The sibling before `id`, if any. No wrap-around.
    pub fn previous_sibling(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let node = self.node(id)?;
        Ok(node
            .position_among_siblings()
            .and_then(|(siblings, pos)| pos.checked_sub(1).map(|p| siblings[p]))
            .map(|i| self.handle(i)))
    }

    pub fn get_move(&self, id: NodeId) -> Result<Option<&ColorMove>, TreeError> {
        Ok(self.node(id)?.color_move())
    }

    pub fn comment(&self, id: NodeId) -> Result<&str, TreeError> {
        Ok(self.node(id)?.comment())
    }

    pub fn annotation(&self, id: NodeId) -> Result<Annotation, TreeError> {
        Ok(self.node(id)?.annotation())
    }

    pub fn set_comment(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        self.node_at_mut(index).comment = text.into();
        Ok(())
    }

    /// Replace the annotation of a node. The root carries none.
    pub fn set_annotation(&mut self, id: NodeId, annotation: Annotation) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        if index == self.root {
            return Err(TreeError::RootEdit);
        }
        self.node_at_mut(index).annotation = annotation;
        Ok(())
    }

    /// Attach an uninterpreted property to a node.
    pub fn push_property(&mut self, id: NodeId, property: Property) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        self.node_at_mut(index).extra.push(property);
        Ok(())
    }

    /// Append a new last child of `parent` reached by `mv`.
    ///
    /// The move must be legal in the parent's position. A pass is legal
    /// for any color in play.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mv: ColorMove,
        annotation: Annotation,
        comment: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let board = self.board_at(parent)?;
        let (id, _) = self.attach(parent, board, Some(mv), Setup::default(), None)?;
        let index = self.index_of(id)?;
        let node = self.node_at_mut(index);
        node.annotation = annotation;
        node.comment = comment.into();
        Ok(id)
    }

    /// Append a new last child of `parent`, checked against `before`, the
    /// position at `parent`. Returns the child and the position after it.
    ///
    /// Lets a reader building a whole tree carry positions along instead
    /// of replaying from the root for every node.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        before: Board,
        mv: Option<ColorMove>,
        setup: Setup,
        to_play: Option<Color>,
    ) -> Result<(NodeId, Board), TreeError> {
        let parent_index = self.index_of(parent)?;
        let mut node = Node::new(mv, Some(parent_index));
        node.setup = setup;
        node.to_play = to_play;
        let after = advance(before, &node)?;
        let index = self.allocate(node);
        self.node_at_mut(parent_index).children.push(index);
        Ok((self.handle(index), after))
    }

    /// Place `mv` for `color` as a setup edit.
    ///
    /// A node without a move or children is edited in place; otherwise the
    /// edit goes to a new last child, which is returned. Placing a piece
    /// this node removed restores it instead.
    pub fn add_setup(&mut self, id: NodeId, color: Color, mv: Move) -> Result<NodeId, TreeError> {
        self.edit_setup(id, |before, setup| {
            let restores = mv
                .points()
                .first()
                .is_some_and(|&p| before.color_on(p) == Some(color));
            match setup.removed.iter().position(|m| *m == mv) {
                Some(pos) if restores => {
                    setup.removed.remove(pos);
                }
                _ => {
                    let placed = ColorMove::new(color, mv);
                    if !setup.placed.contains(&placed) {
                        setup.placed.push(placed);
                    }
                }
            }
        })
    }

    /// Take `mv` off the board as a setup edit: drops a placement of this
    /// node if there is one, otherwise records a removal. Targets the same
    /// node as [`add_setup`](GameTree::add_setup).
    pub fn remove_setup(&mut self, id: NodeId, color: Color, mv: Move) -> Result<NodeId, TreeError> {
        self.edit_setup(id, |_, setup| {
            let placed = ColorMove::new(color, mv);
            match setup.placed.iter().position(|p| *p == placed) {
                Some(pos) => {
                    setup.placed.remove(pos);
                }
                None if !setup.removed.contains(&placed.mv) => setup.removed.push(placed.mv),
                None => {}
            }
        })
    }

    /// Replace the setup edits. Targets the same node as
    /// [`add_setup`](GameTree::add_setup).
    pub fn set_setup(&mut self, id: NodeId, setup: Setup) -> Result<NodeId, TreeError> {
        self.edit_setup(id, |_, current| *current = setup)
    }

    /// Set the color to play at `id`, ahead of any move there.
    pub fn set_player(&mut self, id: NodeId, color: Color) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        if color.index() >= self.variant.num_colors() {
            return Err(TreeError::InvalidSetup {
                source: MoveError::ColorNotInPlay(color),
            });
        }
        self.node_at_mut(index).to_play = Some(color);
        Ok(())
    }

    pub fn remove_player(&mut self, id: NodeId) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        self.node_at_mut(index).to_play = None;
        Ok(())
    }

    /// Make `id` the root and drop everything outside its subtree.
    ///
    /// If moves or setup edits lead to `id`, its position is stored on it
    /// as setup with the color to play, and its move and annotation are
    /// cleared. The game info and the `AP` and `CA` properties of the old
    /// root are kept. Handles into the subtree stay valid.
    pub fn keep_only_subtree(&mut self, id: NodeId) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        let Some(parent) = self.node_at(index).parent else {
            return Ok(());
        };
        let path = self.path_from_root(id)?;
        let node = self.node_at(index);
        let needs_setup = node.mv.is_some()
            || path[..path.len() - 1].iter().any(|step| {
                let n = self.node_at(step.index);
                n.mv.is_some() || !n.setup.is_empty()
            });

        if needs_setup {
            let to_play = self.board_at(id)?.to_play();
            let mut placed: Vec<ColorMove> = Vec::new();
            for step in &path {
                let n = self.node_at(step.index);
                placed.retain(|p| !n.setup.removed.contains(&p.mv));
                placed.extend(n.setup.placed.iter().cloned());
                placed.extend(n.mv.iter().filter(|m| !m.mv.is_pass()).cloned());
            }
            let node = self.node_at_mut(index);
            node.setup = Setup {
                placed,
                removed: Vec::new(),
            };
            node.to_play = Some(to_play);
            node.mv = None;
        }

        let carried: Vec<Property> = self
            .node_at(self.root)
            .extra
            .iter()
            .filter(|p| p.id == "AP" || p.id == "CA")
            .cloned()
            .collect();
        self.node_at_mut(parent).children.retain(|&c| c != index);
        self.release_subtree(self.root);
        self.root = index;

        let node = self.node_at_mut(index);
        node.parent = None;
        node.annotation = Annotation::None;
        for property in carried.into_iter().rev() {
            if !node.extra.iter().any(|p| p.id == property.id) {
                node.extra.insert(0, property);
            }
        }
        Ok(())
    }

    /// Remove `id` and its whole subtree. Returns the parent.
    ///
    /// The remaining siblings keep their order.
    pub fn truncate(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let index = self.index_of(id)?;
        let Some(parent) = self.node_at(index).parent else {
            return Err(TreeError::RootTruncation);
        };
        self.node_at_mut(parent).children.retain(|&c| c != index);
        self.release_subtree(index);
        Ok(self.handle(parent))
    }

    /// Remove every child subtree of `id`, keeping `id` itself.
    pub fn truncate_children(&mut self, id: NodeId) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        let children = std::mem::take(&mut self.node_at_mut(index).children);
        for child in children {
            self.release_subtree(child);
        }
        Ok(())
    }

    /// Make `id` the first child of its parent. The other siblings keep
    /// their relative order. No-op at the root or if already first.
    pub fn promote_to_main(&mut self, id: NodeId) -> Result<(), TreeError> {
        let index = self.index_of(id)?;
        if let Some(parent) = self.node_at(index).parent {
            let siblings = &mut self.node_at_mut(parent).children;
            if let Some(pos) = siblings.iter().position(|&c| c == index) {
                siblings[..=pos].rotate_right(1);
            }
        }
        Ok(())
    }

    /// Promote `id` and all its ancestors so `id` lies on the main variation.
    pub fn make_main_variation(&mut self, id: NodeId) -> Result<(), TreeError> {
        let mut index = self.index_of(id)?;
        while let Some(parent) = self.node_at(index).parent {
            self.promote_to_main(self.handle(index))?;
            index = parent;
        }
        Ok(())
    }

    /// Whether `id` and all its ancestors are first children.
    pub fn is_in_main_variation(&self, id: NodeId) -> Result<bool, TreeError> {
        let mut node = self.node(id)?;
        while let Some(parent) = node.parent() {
            if parent.node.children.first() != Some(&node.index) {
                return Ok(false);
            }
            node = parent;
        }
        Ok(true)
    }

    /// Number of moves on the path to `id`, `id` included, counted back to
    /// the nearest node with setup edits. Passes do not count.
    pub fn move_number(&self, id: NodeId) -> Result<usize, TreeError> {
        let mut node = self.node(id)?;
        let mut count = 0;
        loop {
            if is_placement(node) {
                count += 1;
            }
            match node.parent() {
                Some(parent) if !node.has_setup() => node = parent,
                _ => return Ok(count),
            }
        }
    }

    /// Number of moves that follow `id` along first children, up to the
    /// next node with setup edits. Passes do not count.
    pub fn moves_left(&self, id: NodeId) -> Result<usize, TreeError> {
        let mut node = self.node(id)?;
        let mut count = 0;
        while let Some(child) = node.first_child() {
            if child.has_setup() {
                break;
            }
            if is_placement(child) {
                count += 1;
            }
            node = child;
        }
        Ok(count)
    }

    /// The main-variation node at which move `move_number` (1-based) is
    /// played, i.e. the parent of the node carrying that move.
    pub fn node_before_move_number(&self, move_number: usize) -> Option<NodeId> {
        let mut node = self.root_node();
        let mut count = 0;
        while let Some(child) = node.first_child() {
            if child.color_move().is_some() {
                count += 1;
                if count == move_number {
                    return Some(node.id());
                }
            }
            node = child;
        }
        None
    }

    /// Whether the main variation has at least one move.
    pub fn has_main_variation_moves(&self) -> bool {
        let mut node = self.root_node();
        while let Some(child) = node.first_child() {
            if child.color_move().is_some() {
                return true;
            }
            node = child;
        }
        false
    }

    /// Handles from the root down to `id`, both included.
    pub fn path_from_root(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut node = self.node(id)?;
        let mut path = vec![node.id()];
        while let Some(parent) = node.parent() {
            path.push(parent.id());
            node = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// The child of `id` reached by `mv`, if one exists.
    pub fn find_child_with_move(
        &self,
        id: NodeId,
        mv: &ColorMove,
    ) -> Result<Option<NodeId>, TreeError> {
        Ok(self
            .node(id)?
            .children()
            .find(|c| c.color_move() == Some(mv))
            .map(|c| c.id()))
    }

    /// Rebuild the position at `id` by replaying setup edits and moves
    /// from the root.
    ///
    /// The color to play is the one after the last mover, or the one set
    /// at a later node; colors without a legal move are not skipped here.
    pub fn board_at(&self, id: NodeId) -> Result<Board, TreeError> {
        let mut board = Board::new(self.variant);
        for step in self.path_from_root(id)? {
            board = advance(board, self.node(step)?.node)?;
        }
        Ok(board)
    }

    /// Position before the node at `index`.
    fn board_before(&self, index: u32) -> Result<Board, TreeError> {
        match self.node_at(index).parent {
            Some(parent) => self.board_at(self.handle(parent)),
            None => Ok(Board::new(self.variant)),
        }
    }

    /// Apply `edit` to the setup of `id` when it has no move and no
    /// children, or else to the empty setup of a new last child. Nothing
    /// changes if the edited setup does not fit the position.
    fn edit_setup<F>(&mut self, id: NodeId, edit: F) -> Result<NodeId, TreeError>
    where
        F: FnOnce(&Board, &mut Setup),
    {
        let index = self.index_of(id)?;
        let node = self.node_at(index);
        let in_place = node.mv.is_none() && node.children.is_empty();
        let mut target = Node::new(None, Some(index));
        let before = if in_place {
            target.setup = node.setup.clone();
            target.to_play = node.to_play;
            self.board_before(index)?
        } else {
            self.board_at(id)?
        };
        edit(&before, &mut target.setup);
        advance(before, &target)?;

        if in_place {
            self.node_at_mut(index).setup = target.setup;
            return Ok(id);
        }
        let child = self.allocate(target);
        self.node_at_mut(index).children.push(child);
        Ok(self.handle(child))
    }

    fn handle(&self, index: u32) -> NodeId {
        NodeId {
            tree: self.id,
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    fn index_of(&self, id: NodeId) -> Result<u32, TreeError> {
        if id.tree != self.id {
            return Err(TreeError::InvalidNode);
        }
        match self.slots.get(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => Ok(id.index),
            _ => Err(TreeError::InvalidNode),
        }
    }

    fn live(&self, index: u32) -> Option<&Node> {
        self.slots.get(index as usize)?.node.as_ref()
    }

    /// View a slot known to be live.
    fn view(&self, index: u32) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            index,
            node: self.node_at(index),
        }
    }

    fn node_at(&self, index: u32) -> &Node {
        match self.live(index) {
            Some(node) => node,
            None => unreachable!("tree links point to live slots"),
        }
    }

    fn node_at_mut(&mut self, index: u32) -> &mut Node {
        match self.slots[index as usize].node.as_mut() {
            Some(node) => node,
            None => unreachable!("tree links point to live slots"),
        }
    }

    fn allocate(&mut self, node: Node) -> u32 {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize].node = Some(node);
            index
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            (self.slots.len() - 1) as u32
        }
    }

    fn release_subtree(&mut self, index: u32) {
        let mut stack = vec![index];
        while let Some(index) = stack.pop() {
            let slot = &mut self.slots[index as usize];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                self.len -= 1;
            }
        }
    }
}

/// Whether the node places a piece (a move other than a pass).
fn is_placement(node: NodeRef<'_>) -> bool {
    node.color_move().is_some_and(|m| !m.mv.is_pass())
}

/// Position after `node`, given the position before it: removals, then
/// placements, then the color to play, then the move.
fn advance(mut board: Board, node: &Node) -> Result<Board, TreeError> {
    let invalid = |source| TreeError::InvalidSetup { source };
    for mv in &node.setup.removed {
        board = board.remove_setup(mv).map_err(invalid)?.0;
    }
    for placed in &node.setup.placed {
        board = board.place_setup(placed.color, &placed.mv).map_err(invalid)?;
    }
    if let Some(color) = node.to_play {
        if color.index() >= board.variant().num_colors() {
            return Err(invalid(MoveError::ColorNotInPlay(color)));
        }
        board = board.with_to_play(color);
    }
    if let Some(mv) = &node.mv {
        board = board.apply(mv).map_err(|source| TreeError::IllegalMove {
            mv: mv.clone(),
            source,
        })?;
    }
    Ok(board)
}
