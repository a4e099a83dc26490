use std::collections::HashMap;

use tracing::warn;

use crate::input::FootprintRecord;
use crate::math::{Point2, TOLERANCE};

/// The outline and height of one building, assembled from its vertex rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingGroup {
    /// Building identifier.
    pub id: String,
    /// Outline vertices in row order, not necessarily closed.
    pub vertices: Vec<Point2>,
    /// Height in metres, if any row supplied one.
    pub height: Option<f64>,
}

impl BuildingGroup {
    /// Creates an empty group for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertices: Vec::new(),
            height: None,
        }
    }

    /// Creates a group from explicit vertices and height.
    #[must_use]
    pub fn with_outline(id: impl Into<String>, vertices: Vec<Point2>, height: Option<f64>) -> Self {
        Self {
            id: id.into(),
            vertices,
            height,
        }
    }
}

/// Groups footprint rows by building id.
///
/// Groups come out in the order their id was first seen; vertices keep row
/// order. When rows of one id disagree on the height, the last one wins.
#[must_use]
pub fn group_footprints(records: impl IntoIterator<Item = FootprintRecord>) -> Vec<BuildingGroup> {
    let mut groups: Vec<BuildingGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.id.clone()).or_insert_with(|| {
            groups.push(BuildingGroup::new(record.id.clone()));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.vertices.push(Point2::new(record.x, record.y));

        if let Some(h) = record.h {
            if let Some(previous) = group.height {
                if (previous - h).abs() > TOLERANCE {
                    warn!(id = %group.id, previous, height = h, "conflicting heights, keeping the last");
                }
            }
            group.height = Some(h);
        }
    }

    groups
}
