//! Append-only node/link store.
//!
//! Nodes and links live in two `Vec`s in creation order. Index 0 is the root.
//! Parents are referenced by [`NodeId`] rather than owned, and a parent is
//! always created before its child, so every id stored in a node or link is
//! already valid when it is stored and stays valid forever (nothing is ever
//! removed).

use super::geometry::visual_radius;

/// Index of a node in its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	/// The root, always the first node.
	pub const ROOT: NodeId = NodeId(0);

	/// Position in the node list.
	pub fn index(self) -> usize {
		self.0
	}
}

/// A circle in the growing tree.
#[derive(Clone, Debug)]
pub struct Node {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Drives the visual radius via [`visual_radius`].
	pub size_value: f64,
	/// Back-reference into the owning graph. `None` only for the root.
	pub parent: Option<NodeId>,
	/// Relevance accumulator bumped whenever a descendant is attached.
	pub weight: f64,
}

impl Node {
	/// Drawn radius derived from `size_value`.
	pub fn radius(&self) -> f64 {
		visual_radius(self.size_value)
	}

	/// Whether this node has no parent.
	pub fn is_root(&self) -> bool {
		self.parent.is_none()
	}
}

/// An edge from an existing node to the node grown out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// The existing node.
	pub source: NodeId,
	/// The node grown from it.
	pub target: NodeId,
}

/// The tree: nodes in creation order plus the links between them.
#[derive(Clone, Debug)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
}

impl Graph {
	/// Create a graph holding only a size-zero root at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			nodes: vec![Node {
				x,
				y,
				size_value: 0.0,
				parent: None,
				weight: 1.0,
			}],
			links: Vec::new(),
		}
	}

	/// Id of the root node.
	pub fn root_id(&self) -> NodeId {
		NodeId::ROOT
	}

	/// The root node.
	pub fn root(&self) -> &Node {
		&self.nodes[0]
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false: the root cannot be removed.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// All nodes in creation order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All nodes, mutably, for the layout.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// All links in creation order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// The node behind `id`.
	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	/// The node behind `id`, mutably.
	pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Ids of every node in creation order.
	pub fn ids(&self) -> impl ExactSizeIterator<Item = NodeId> + use<> {
		(0..self.nodes.len()).map(NodeId)
	}

	/// Append a child of `parent` placed at the parent's position plus
	/// `offset`, then the link from parent to child.
	///
	/// The node is pushed before the link so a reader never sees a link
	/// whose target is missing.
	pub fn attach(&mut self, parent: NodeId, offset: (f64, f64), size_value: f64) -> NodeId {
		let (px, py) = {
			let p = self.node(parent);
			(p.x, p.y)
		};
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			x: px + offset.0,
			y: py + offset.1,
			size_value,
			parent: Some(parent),
			weight: 1.0,
		});
		self.links.push(Link {
			source: parent,
			target: id,
		});
		id
	}

	/// Walk from `id`'s parent up to the root.
	pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
		Ancestors {
			graph: self,
			next: self.node(id).parent,
		}
	}

	/// Add `increment` to the weight of every ancestor of `id`.
	/// Returns how many ancestors were touched.
	pub fn inflate_ancestors(&mut self, id: NodeId, increment: f64) -> usize {
		let chain: Vec<NodeId> = self.ancestors(id).collect();
		for &ancestor in &chain {
			self.nodes[ancestor.0].weight += increment;
		}
		chain.len()
	}

	/// Distance in links from `id` to the root.
	pub fn depth(&self, id: NodeId) -> usize {
		self.ancestors(id).count()
	}
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
	graph: &'a Graph,
	next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		let parent = self.graph.node(current).parent;
		// Parents always precede their children, which rules out cycles.
		debug_assert!(parent.is_none_or(|p| p < current));
		self.next = parent;
		Some(current)
	}
}
