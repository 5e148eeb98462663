//! Drag payloads and their validated form.
//!
//! The drag-and-drop layer reports a [`DragResult`] whose droppable ids are
//! plain strings. [`Gesture::from_drag`] turns it into a typed [`Gesture`] or
//! rejects it before anything reaches the engine.

use crate::{
    domain::ListId,
    error::{Result, TaskifyError},
};
use serde::{Deserialize, Serialize};

/// What was dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    List,
    Card,
}

/// A drop zone and a position inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DragLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// Raw outcome of a drag as reported by the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragResult {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub source: DragLocation,
    /// `None` when the item was dropped outside any drop zone
    #[serde(default)]
    pub destination: Option<DragLocation>,
}

/// A validated move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    List {
        source_index: usize,
        destination_index: usize,
    },
    Card {
        source_list_id: ListId,
        destination_list_id: ListId,
        source_index: usize,
        destination_index: usize,
    },
}

impl Gesture {
    /// Validates a drag result.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the item was dropped
    /// outside a drop zone or back where it started.
    pub fn from_drag(result: &DragResult) -> Result<Option<Self>> {
        let Some(destination) = &result.destination else {
            return Ok(None);
        };
        let source = &result.source;

        if source.droppable_id == destination.droppable_id && source.index == destination.index {
            return Ok(None);
        }

        let gesture = match result.kind {
            DragKind::List => Self::List {
                source_index: source.index,
                destination_index: destination.index,
            },
            DragKind::Card => Self::Card {
                source_list_id: parse_list_id(&source.droppable_id)?,
                destination_list_id: parse_list_id(&destination.droppable_id)?,
                source_index: source.index,
                destination_index: destination.index,
            },
        };
        Ok(Some(gesture))
    }
}

fn parse_list_id(droppable_id: &str) -> Result<ListId> {
    droppable_id.parse().map_err(|_| {
        TaskifyError::InvalidGesture(format!("'{}' is not a list id", droppable_id))
    })
}
