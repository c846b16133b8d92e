//! Child -> parent forests stored as an index arena.
//!
//! Nodes live in a `Vec` and are referred to by stable indices; each slot
//! holds an optional parent index. Rerooting is index reassignment along the
//! old root path.
//!
//! # Invariants
//!
//! - A node has at most one parent
//! - There are no cycles: [`Forest::attach`] rejects any edge that would close one

use crate::error::{Result, SettleError};
use log::debug;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// An acyclic child -> parent structure. Nodes without a parent are roots.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    nodes: Vec<T>,
    index: HashMap<T, usize>,
    parents: Vec<Option<usize>>,
}

impl<T> Forest<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Creates an empty forest.
    pub fn new() -> Self {
        Forest {
            nodes: Vec::new(),
            index: HashMap::new(),
            parents: Vec::new(),
        }
    }

    /// Builds a forest from `(child, parent)` edges.
    ///
    /// Fails with [`SettleError::MalformedForest`] if a child is given two
    /// different parents or the edges contain a cycle.
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let mut forest = Forest::new();
        for (child, parent) in edges {
            forest.attach(child, parent)?;
        }
        Ok(forest)
    }

    /// Adds `node` as a root if it is not already present.
    pub fn add_node(&mut self, node: T) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.clone(), idx);
        self.nodes.push(node);
        self.parents.push(None);
        idx
    }

    /// Makes `parent` the parent of `child`, adding either node if missing.
    pub fn attach(&mut self, child: T, parent: T) -> Result<()> {
        if child == parent {
            return Err(SettleError::MalformedForest(format!(
                "{:?} cannot be its own parent",
                child
            )));
        }

        let child_idx = self.add_node(child);
        let parent_idx = self.add_node(parent);

        match self.parents[child_idx] {
            Some(existing) if existing == parent_idx => return Ok(()),
            Some(existing) => {
                return Err(SettleError::MalformedForest(format!(
                    "{:?} already has parent {:?}",
                    self.nodes[child_idx], self.nodes[existing]
                )));
            }
            None => {}
        }

        let mut cursor = Some(parent_idx);
        while let Some(idx) = cursor {
            if idx == child_idx {
                return Err(SettleError::MalformedForest(format!(
                    "edge {:?} -> {:?} closes a cycle",
                    self.nodes[child_idx], self.nodes[parent_idx]
                )));
            }
            cursor = self.parents[idx];
        }

        self.parents[child_idx] = Some(parent_idx);
        Ok(())
    }

    /// Returns `true` if `node` is in the forest, as a root or a child.
    pub fn contains(&self, node: &T) -> bool {
        self.index.contains_key(node)
    }

    /// Parent of `node`; `None` for roots and unknown nodes.
    pub fn parent(&self, node: &T) -> Option<&T> {
        let idx = *self.index.get(node)?;
        self.parents[idx].map(|p| &self.nodes[p])
    }

    /// Number of nodes, roots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter()
    }

    /// `(child, parent)` edges in child insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&T, &T)> {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(idx, parent)| parent.map(|p| (&self.nodes[idx], &self.nodes[p])))
    }

    /// Nodes without a parent, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &T> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(idx, _)| &self.nodes[idx])
    }

    /// Edges as a `child -> parent` map.
    pub fn to_map(&self) -> HashMap<T, T> {
        self.edges()
            .map(|(child, parent)| (child.clone(), parent.clone()))
            .collect()
    }

    /// Makes `node` the root of its tree by flipping every edge on the path
    /// to the old root. A root or unknown node is left as is.
    pub fn reroot(&mut self, node: &T) -> Result<()> {
        let Some(&start) = self.index.get(node) else {
            return Ok(());
        };

        let mut current = start;
        let mut next = self.parents[start].take();
        let mut steps = 0;
        while let Some(parent) = next {
            steps += 1;
            if steps > self.nodes.len() {
                return Err(SettleError::MalformedForest(format!(
                    "rerooting at {:?} does not reach a root",
                    node
                )));
            }
            next = self.parents[parent].replace(current);
            current = parent;
        }

        debug!("Rerooted at {:?} after flipping {} edges", node, steps);
        Ok(())
    }

    pub(crate) fn node_at(&self, idx: usize) -> &T {
        &self.nodes[idx]
    }

    pub(crate) fn parent_index(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }
}

impl<T> Default for Forest<T>
where
    T: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A numbered, directed connection between two parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<T> {
    /// Lower ids are followed first.
    pub id: u64,
    pub from: T,
    pub to: T,
}

/// Connects `nodes` into a single tree rooted at the smallest node.
///
/// Starting from that node, the lowest-numbered link leaving the reached set
/// is followed each time a new node is reached, and the node it reaches gets
/// the link's `from` as parent. Links to nodes outside `nodes` are ignored.
///
/// Fails with [`SettleError::Disconnected`] if some node cannot be reached.
pub fn spanning_forest<T, N, L>(nodes: N, links: L) -> Result<Forest<T>>
where
    T: Ord + Hash + Clone + Debug,
    N: IntoIterator<Item = T>,
    L: IntoIterator<Item = Link<T>>,
{
    let mut rest: HashSet<T> = nodes.into_iter().collect();
    let mut forest = Forest::new();
    let Some(first) = rest.iter().min().cloned() else {
        return Ok(forest);
    };
    rest.remove(&first);

    let links: Vec<Link<T>> = links.into_iter().collect();
    let mut outgoing: HashMap<&T, Vec<usize>> = HashMap::new();
    for (idx, link) in links.iter().enumerate() {
        outgoing.entry(&link.from).or_default().push(idx);
    }

    let mut queue = BinaryHeap::new();
    for &idx in outgoing.get(&first).into_iter().flatten() {
        queue.push(Reverse((links[idx].id, idx)));
    }
    forest.add_node(first);

    while let Some(Reverse((_, idx))) = queue.pop() {
        let link = &links[idx];
        if !rest.remove(&link.to) {
            continue;
        }
        forest.attach(link.to.clone(), link.from.clone())?;
        for &next in outgoing.get(&link.to).into_iter().flatten() {
            queue.push(Reverse((links[next].id, next)));
        }
    }

    if !rest.is_empty() {
        return Err(SettleError::Disconnected { count: rest.len() });
    }
    Ok(forest)
}
