//! Error types for tawy_layout

use thiserror::Error;

use crate::document::NodeId;

/// Errors raised by document operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The node id does not refer to a live node
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Appending would make a node its own ancestor
    #[error("cannot append {child:?} under {parent:?}: it would contain itself")]
    HierarchyCycle { parent: NodeId, child: NodeId },

    /// No element with the requested id is attached to the document
    #[error("container not found: #{0}")]
    ContainerNotFound(String),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
