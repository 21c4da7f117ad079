//! Error types for document tree operations.

use thiserror::Error;

use crate::NodeId;

/// Errors raised by tree mutation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// The id does not name a live node (never created or already discarded).
	#[error("unknown node {0}")]
	UnknownNode(NodeId),
	/// The operation expected `child` to be a child of `parent`.
	#[error("node {child} is not a child of {parent}")]
	NotAChild {
		/// Expected parent.
		parent: NodeId,
		/// Offending node.
		child: NodeId,
	},
	/// Inserting the node would make it its own ancestor, or the target cannot hold children.
	#[error("cannot insert {child} under {parent}")]
	HierarchyRequest {
		/// Target parent.
		parent: NodeId,
		/// Node being inserted.
		child: NodeId,
	},
	/// The operation requires an element node.
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),
	/// The operation requires a text node.
	#[error("node {0} is not a text node")]
	NotText(NodeId),
	/// Markup could not be written out.
	#[error("serialization failed: {0}")]
	Serialize(String),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DomError>;
