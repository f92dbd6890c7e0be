//! Arena-based binary search tree keyed by course number.
//!
//! Nodes live in a generational arena and link to their children by index,
//! so ownership is flat: the arena owns every node, the tree owns the arena.
//! No rebalancing is done; the shape depends on insertion order.

use std::cmp::Ordering;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::{debug, instrument, trace};

use crate::domain::entities::Course;

/// Tree node holding one course and the indices of its children.
#[derive(Debug)]
pub struct CourseNode {
    pub course: Course,
    /// Subtree with smaller course numbers
    pub left: Option<Index>,
    /// Subtree with larger course numbers
    pub right: Option<Index>,
}

impl CourseNode {
    fn new(course: Course) -> Self {
        Self {
            course,
            left: None,
            right: None,
        }
    }
}

/// Deepest level drawn by [`CourseTree::to_tree_string`].
pub const MAX_RENDER_DEPTH: usize = 64;

/// Unbalanced binary search tree over `Course::number()`.
#[derive(Debug)]
pub struct CourseTree {
    arena: Arena<CourseNode>,
    root: Option<Index>,
}

impl Default for CourseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&CourseNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every node. Indices handed out before are invalidated.
    #[instrument(level = "trace", skip(self))]
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Insert a course below the node where the search for its number ends.
    ///
    /// Returns `false` and leaves the tree untouched when the number is
    /// already present.
    #[instrument(level = "trace", skip(self), fields(number = %course.number()))]
    pub fn insert(&mut self, course: Course) -> bool {
        let Some(mut current) = self.root else {
            self.root = Some(self.arena.insert(CourseNode::new(course)));
            return true;
        };

        loop {
            let Some(node) = self.arena.get(current) else {
                return false;
            };
            let ordering = course.number().cmp(node.course.number());
            let child = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => {
                    debug!("duplicate course number ignored: {}", course.number());
                    return false;
                }
            };

            if let Some(child) = child {
                current = child;
                continue;
            }

            let new_idx = self.arena.insert(CourseNode::new(course));
            if let Some(parent) = self.arena.get_mut(current) {
                if ordering == Ordering::Less {
                    parent.left = Some(new_idx);
                } else {
                    parent.right = Some(new_idx);
                }
            }
            return true;
        }
    }

    /// Exact-key search; walks one root-to-leaf path.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, number: &str) -> Option<&Course> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = self.arena.get(idx)?;
            current = match number.cmp(node.course.number()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(&node.course),
            };
        }
        None
    }

    /// In-order iterator: courses by ascending number.
    pub fn iter(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                max_depth = max_depth.max(depth);
                for child in [node.left, node.right].into_iter().flatten() {
                    stack.push((child, depth + 1));
                }
            }
        }
        trace!("height: {}", max_depth);
        max_depth
    }

    /// Render the tree shape, marking each child as left `[L]` or right `[R]`.
    ///
    /// Levels below [`MAX_RENDER_DEPTH`] collapse into their subtree root,
    /// labelled with the number of courses not shown.
    pub fn to_tree_string(&self) -> Tree<String> {
        struct Frame {
            tree: Tree<String>,
            depth: usize,
            pending: Vec<(Index, &'static str)>,
        }

        let Some(root_idx) = self.root else {
            return Tree::new("Empty tree".to_string());
        };
        let Some(root) = self.get_node(root_idx) else {
            return Tree::new("Empty tree".to_string());
        };

        let mut stack = vec![Frame {
            tree: Tree::new(root.course.number().to_string()),
            depth: 1,
            pending: self.children(root_idx),
        }];

        // Post-order: a frame is attached to its parent once all its children are
        while let Some(top) = stack.last_mut() {
            match top.pending.pop() {
                Some((child_idx, side)) => {
                    let Some(child) = self.get_node(child_idx) else {
                        continue;
                    };
                    let label = format!("[{}] {}", side, child.course.number());
                    if top.depth + 1 < MAX_RENDER_DEPTH {
                        let depth = top.depth + 1;
                        stack.push(Frame {
                            tree: Tree::new(label),
                            depth,
                            pending: self.children(child_idx),
                        });
                    } else {
                        let hidden = self.subtree_len(child_idx) - 1;
                        let label = if hidden > 0 {
                            format!("{} ... ({} more not shown)", label, hidden)
                        } else {
                            label
                        };
                        top.tree.push(Tree::new(label));
                    }
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.tree.push(done.tree);
                        }
                        None => return done.tree,
                    }
                }
            }
        }
        Tree::new("Empty tree".to_string())
    }

    /// Children of `idx`, right first so that popping yields the left one first.
    fn children(&self, idx: Index) -> Vec<(Index, &'static str)> {
        self.get_node(idx)
            .map(|node| {
                [(node.right, "R"), (node.left, "L")]
                    .into_iter()
                    .filter_map(|(child, side)| child.map(|c| (c, side)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of nodes in the subtree rooted at `idx`.
    fn subtree_len(&self, idx: Index) -> usize {
        let mut count = 0;
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                count += 1;
                stack.extend([node.left, node.right].into_iter().flatten());
            }
        }
        count
    }
}

/// Stack-based in-order traversal; no recursion, so degenerate trees are fine.
pub struct InOrderIterator<'a> {
    tree: &'a CourseTree,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a CourseTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: tree.root(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = &'a Course;

    fn next(&mut self) -> Option<Self::Item> {
        // Descend to the leftmost unvisited node
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.tree.get_node(idx).and_then(|n| n.left);
        }

        let idx = self.stack.pop()?;
        let node = self.tree.get_node(idx)?;
        self.current = node.right;
        Some(&node.course)
    }
}
