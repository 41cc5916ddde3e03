//! Tree sort over borrowed lines.
//!
//! Lines are inserted into a binary search tree ordered by the letter-only
//! comparator, then read back with an in-order walk. Nodes live in one
//! growable arena and refer to their children by index, so insertion,
//! traversal and teardown all run iteratively and a skewed tree cannot
//! exhaust the call stack.
//!
//! Ties go left: a line that compares equal to a node already in the tree
//! is placed in that node's left subtree. Mutually equal lines therefore come
//! out in an order that depends on the tree's shape, not on input order.

use crate::compare::Direction;
use crate::error::{OneginError, OneginResult};
use crate::line::Line;
use std::cmp::Ordering;
use std::iter::FusedIterator;

type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct Node<'a> {
    line: Line<'a>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<'a> Node<'a> {
    fn leaf(line: Line<'a>) -> Self {
        Self {
            line,
            left: None,
            right: None,
        }
    }
}

/// Binary search tree of lines keyed by the letter-only comparator.
///
/// A fresh index is empty; the first inserted line becomes the root and every
/// later insertion keeps it built. [`OrderedIndex::teardown`] consumes the
/// index, so nothing can touch it afterwards.
#[derive(Debug)]
pub struct OrderedIndex<'a> {
    nodes: Vec<Node<'a>>,
    root: Option<NodeId>,
    direction: Direction,
}

impl<'a> OrderedIndex<'a> {
    /// Create an empty index comparing in `direction`
    pub fn new(direction: Direction) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            direction,
        }
    }

    /// Build an index from `lines` in input order.
    ///
    /// The first line becomes the root. Fails with `EmptyInput` when there
    /// are no lines and with `AllocationFailure` when node storage cannot
    /// grow; nodes inserted before the failure are kept intact.
    pub fn build<I>(lines: I, direction: Direction) -> OneginResult<Self>
    where
        I: IntoIterator<Item = Line<'a>>,
    {
        let mut lines = lines.into_iter().peekable();
        if lines.peek().is_none() {
            return Err(OneginError::EmptyInput);
        }

        let mut index = Self::new(direction);
        index.reserve(lines.size_hint().0)?;
        for line in lines {
            index.insert(line)?;
        }
        Ok(index)
    }

    fn reserve(&mut self, additional: usize) -> OneginResult<()> {
        self.nodes
            .try_reserve(additional)
            .map_err(|_| OneginError::AllocationFailure {
                nodes: self.nodes.len(),
            })
    }

    /// Insert one line.
    ///
    /// Descends from the root: when the node compares greater than or equal
    /// to `line` the walk goes left, otherwise right, until an empty slot is
    /// found.
    pub fn insert(&mut self, line: Line<'a>) -> OneginResult<()> {
        self.reserve(1)?;
        let id = self.nodes.len();

        let Some(mut current) = self.root else {
            self.nodes.push(Node::leaf(line));
            self.root = Some(id);
            return Ok(());
        };

        loop {
            let goes_left = self.nodes[current].line.compare(&line, self.direction) != Ordering::Less;
            let node = &mut self.nodes[current];
            let slot = if goes_left {
                &mut node.left
            } else {
                &mut node.right
            };

            match *slot {
                Some(next) => current = next,
                None => {
                    *slot = Some(id);
                    break;
                }
            }
        }

        self.nodes.push(Node::leaf(line));
        Ok(())
    }

    /// Number of inserted lines
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The line stored at the root, if any
    pub fn root(&self) -> Option<Line<'a>> {
        self.root.map(|id| self.nodes[id].line)
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }

        deepest
    }

    /// Lines in ascending comparator order.
    ///
    /// Each call starts a new walk, so the sequence can be consumed again.
    pub fn iter(&self) -> InOrder<'_, 'a> {
        InOrder::new(&self.nodes, self.root)
    }

    /// Release every node, children before their parent.
    ///
    /// Nodes share one arena allocation: the walk unlinks each node from its
    /// children in post-order, and the arena itself is freed once when the
    /// consumed index drops at the end of this call. Returns the number of
    /// nodes unlinked, which equals the number inserted.
    pub fn teardown(mut self) -> usize {
        let mut released = 0;
        let mut stack: Vec<(NodeId, bool)> = self.root.take().map(|id| (id, false)).into_iter().collect();

        while let Some((id, children_done)) = stack.pop() {
            if children_done {
                let node = &mut self.nodes[id];
                node.left = None;
                node.right = None;
                released += 1;
                continue;
            }

            let node = &self.nodes[id];
            stack.push((id, true));
            stack.extend(node.right.map(|child| (child, false)));
            stack.extend(node.left.map(|child| (child, false)));
        }

        debug_assert_eq!(released, self.nodes.len());
        released
    }
}

impl<'t, 'a> IntoIterator for &'t OrderedIndex<'a> {
    type Item = Line<'a>;
    type IntoIter = InOrder<'t, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy in-order walk over an [`OrderedIndex`]
#[derive(Debug, Clone)]
pub struct InOrder<'t, 'a> {
    nodes: &'t [Node<'a>],
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'t, 'a> InOrder<'t, 'a> {
    fn new(nodes: &'t [Node<'a>], root: Option<NodeId>) -> Self {
        let mut walk = Self {
            nodes,
            stack: Vec::new(),
            remaining: if root.is_some() { nodes.len() } else { 0 },
        };
        walk.push_left_spine(root);
        walk
    }

    fn push_left_spine(&mut self, mut next: Option<NodeId>) {
        while let Some(id) = next {
            self.stack.push(id);
            next = self.nodes[id].left;
        }
    }
}

impl<'t, 'a> Iterator for InOrder<'t, 'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let Node { line, right, .. } = self.nodes[id];
        self.push_left_spine(right);
        self.remaining -= 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for InOrder<'_, '_> {}

impl FusedIterator for InOrder<'_, '_> {}

/// Sort `lines` with a tree and return them in ascending order
pub fn tree_sort<'a>(lines: &[Line<'a>], direction: Direction) -> OneginResult<Vec<Line<'a>>> {
    let index = OrderedIndex::build(lines.iter().copied(), direction)?;
    let sorted: Vec<Line<'a>> = index.iter().collect();
    index.teardown();
    Ok(sorted)
}
