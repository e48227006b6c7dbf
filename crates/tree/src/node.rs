//! An arena-backed tree of named nodes with scope-chained variable lookup.
//!
//! The same structure serves two roles: it carries the data bound to a
//! template before rendering, and it is the shape of the scope chain the
//! expression engine resolves variables against. Nodes own their children by
//! arena index; parent links are weak back-references used for lookup only,
//! so detaching and re-parenting can never produce a dangling owner.

use std::collections::HashMap;

use thiserror::Error;

use crate::value::Value;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot remove the root node of a tree")]
    RemoveRoot,
}

/// Arena slot handle for a node. Only valid for the [`Tree`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    /// Logical id. Unique per tree for normally created nodes; copies made
    /// with [`Tree::copy`] deliberately share the id of their source.
    id: u64,
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    variables: HashMap<String, Value>,
}

/// A tree of named nodes, each holding a set of variables.
///
/// Variables set on a node are visible to all of its descendants through
/// [`Tree::get`], which walks the parent chain until a value is found.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    next_id: u64,
}

impl Tree {
    /// Create a tree consisting of a single root node.
    pub fn new(root_name: &str) -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            next_id: 0,
        };
        tree.alloc(root_name, None);
        tree
    }

    fn alloc(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let node = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            id: self.next_id,
            name: name.to_string(),
            parent,
            children: Vec::new(),
            variables: HashMap::new(),
        });
        node
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocate a new node. With a parent given, the node is appended to that
    /// parent's children and linked back to it.
    pub fn create(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let node = self.alloc(name, parent);
        if let Some(parent) = parent {
            self.data_mut(parent).children.push(node);
        }
        node
    }

    /// Append a new child node and return its id.
    pub fn add(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.create(name, Some(parent))
    }

    /// Append a new child node and return a chainable handle to it.
    pub fn add_mut(&mut self, parent: NodeId, name: &str) -> NodeMut<'_> {
        let node = self.add(parent, name);
        NodeMut { tree: self, id: node }
    }

    /// Append an existing node to `parent`'s children.
    ///
    /// With `link_parent` set, the node is first detached from its previous
    /// parent and its back-reference is updated; without it, only the child
    /// list changes and the node keeps whatever parent link it had.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, link_parent: bool) {
        if link_parent {
            if let Some(old_parent) = self.data(child).parent {
                self.remove_child(old_parent, child);
            }
            self.data_mut(child).parent = Some(parent);
        }
        self.data_mut(parent).children.push(child);
    }

    /// Remove the first child of `parent` with the same logical id as `child`.
    /// No-op when there is no match.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let child_id = self.data(child).id;
        let position = self
            .data(parent)
            .children
            .iter()
            .position(|&c| self.data(c).id == child_id);
        if let Some(position) = position {
            self.data_mut(parent).children.remove(position);
        }
    }

    /// Detach `node` from its parent. The node's direct children are orphaned:
    /// their parent references are cleared, not re-pointed at the grandparent.
    pub fn remove(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        let Some(parent) = self.data(node).parent else {
            return Err(TreeError::RemoveRoot);
        };
        self.remove_child(parent, node);
        self.data_mut(node).parent = None;

        let children = self.data(node).children.clone();
        for child in children {
            self.data_mut(child).parent = None;
        }
        Ok(node)
    }

    /// Set a single variable on a node.
    pub fn set(&mut self, node: NodeId, name: &str, value: impl Into<Value>) {
        self.data_mut(node)
            .variables
            .insert(name.to_string(), value.into());
    }

    /// Set several variables on a node at once.
    pub fn set_many<K, V, I>(&mut self, node: NodeId, variables: I)
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (name, value) in variables {
            self.data_mut(node)
                .variables
                .insert(name.into(), value.into());
        }
    }

    /// Scope-chained variable lookup: the node's own variables first, then
    /// each ancestor's in turn. A stored [`Value::Null`] counts as unset.
    pub fn get(&self, node: NodeId, name: &str) -> Option<&Value> {
        let mut current = Some(node);
        while let Some(scope) = current {
            if let Some(value) = self.data(scope).variables.get(name) {
                if !value.is_null() {
                    return Some(value);
                }
            }
            current = self.data(scope).parent;
        }
        None
    }

    /// The variables set directly on this node, ignoring ancestors.
    pub fn variables(&self, node: NodeId) -> &HashMap<String, Value> {
        &self.data(node).variables
    }

    /// All direct children named `name`, in insertion order.
    pub fn find(&self, node: NodeId, name: &str) -> Vec<NodeId> {
        self.data(node)
            .children
            .iter()
            .copied()
            .filter(|&child| self.data(child).name == name)
            .collect()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.data(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.data(node).name
    }

    /// The node's logical id. Copies share the id of their source node.
    pub fn node_id(&self, node: NodeId) -> u64 {
        self.data(node).id
    }

    /// Whether two handles refer to the same logical node, i.e. the same node
    /// or a copy of it.
    pub fn is_same(&self, a: NodeId, b: NodeId) -> bool {
        self.data(a).id == self.data(b).id
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        self.data(node).parent.is_none()
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.data(node).children.is_empty()
    }

    /// Copy a node, keeping its logical id, name and variables.
    ///
    /// A shallow copy shares its children with the source: the same child
    /// slots appear under both, and their parent links still point at the
    /// source. A deep copy clones the children recursively and links the
    /// clones to the copy.
    pub fn copy(&mut self, node: NodeId, deep: bool) -> NodeId {
        let source = self.data(node).clone();
        let copy = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            id: source.id,
            name: source.name.clone(),
            parent: source.parent,
            children: Vec::new(),
            variables: source.variables.clone(),
        });

        if deep {
            for child in source.children {
                let child_copy = self.copy(child, true);
                self.data_mut(child_copy).parent = Some(copy);
                self.data_mut(copy).children.push(child_copy);
            }
        } else {
            self.data_mut(copy).children = source.children;
        }
        copy
    }

    pub fn node_mut(&mut self, node: NodeId) -> NodeMut<'_> {
        NodeMut { tree: self, id: node }
    }
}

/// A mutable handle to one node, used for call chaining when populating a
/// data tree: `tree.add_mut(root, "ad").set("ad_content", "...")`.
pub struct NodeMut<'t> {
    tree: &'t mut Tree,
    id: NodeId,
}

impl<'t> NodeMut<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn set(self, name: &str, value: impl Into<Value>) -> Self {
        self.tree.set(self.id, name, value);
        self
    }

    pub fn set_many<K, V, I>(self, variables: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.tree.set_many(self.id, variables);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.tree.get(self.id, name)
    }

    /// Append a child and descend into it.
    pub fn add(self, name: &str) -> NodeMut<'t> {
        let child = self.tree.add(self.id, name);
        NodeMut {
            tree: self.tree,
            id: child,
        }
    }
}
