use thiserror::Error;
use tracing::{debug, warn};

use crate::math::polygon_2d::{close_ring, is_simple_ring, ring_boundary, signed_area_2d};
use crate::math::{lift, Point2, Vector3, TOLERANCE};
use crate::operations::creation::{MakeFace, MakeWire};
use crate::operations::shaping::Extrude;
use crate::tessellation::{TessellateSolid, TriangleMesh};
use crate::topology::{SolidId, TopologyStore};

use super::BuildingGroup;

/// Why a footprint outline could not be turned into a face.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FaceFailure {
    #[error("only {count} distinct vertices")]
    TooFewDistinctVertices { count: usize },

    #[error("outline encloses no area")]
    ZeroArea,

    #[error("outline intersects itself")]
    SelfIntersecting,

    #[error("{0}")]
    Kernel(String),
}

/// Why a building group produced no solid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("no height recorded")]
    MissingHeight,

    #[error("{count} vertices, need at least 3")]
    TooFewVertices { count: usize },

    #[error("height {height} cannot be extruded")]
    DegenerateHeight { height: f64 },

    #[error("face construction failed: {0}")]
    FaceConstruction(FaceFailure),

    #[error("extrusion failed: {0}")]
    Extrusion(String),
}

/// A building that was extruded successfully.
#[derive(Debug, Clone)]
pub struct BuiltSolid {
    /// Source building id.
    pub id: String,
    /// Solid name, `building_<id>`.
    pub name: String,
    /// Handle of the solid in the topology store.
    pub solid: SolidId,
    /// Triangulated boundary of the solid, ready for a scene backend.
    pub mesh: TriangleMesh,
}

/// Result of extruding one building group.
#[derive(Debug, Clone)]
pub enum ExtrusionOutcome {
    Built(BuiltSolid),
    Skipped { id: String, reason: SkipReason },
}

impl ExtrusionOutcome {
    /// Returns the built solid, if any.
    #[must_use]
    pub fn built(&self) -> Option<&BuiltSolid> {
        match self {
            Self::Built(solid) => Some(solid),
            Self::Skipped { .. } => None,
        }
    }

    /// Returns the skip reason, if the group was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Built(_) => None,
            Self::Skipped { reason, .. } => Some(reason),
        }
    }
}

/// Turns building groups into closed prisms.
///
/// Every group yields exactly one outcome. Groups that cannot be built are
/// reported as [`ExtrusionOutcome::Skipped`] and never surface as errors.
#[derive(Debug, Clone)]
pub struct FootprintExtruder {
    name_prefix: String,
}

impl Default for FootprintExtruder {
    fn default() -> Self {
        Self {
            name_prefix: "building_".into(),
        }
    }
}

impl FootprintExtruder {
    /// Creates an extruder naming solids `building_<id>`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extrudes every group, in order.
    pub fn extrude_all(&self, groups: &[BuildingGroup], store: &mut TopologyStore) -> Vec<ExtrusionOutcome> {
        groups.iter().map(|group| self.extrude(group, store)).collect()
    }

    /// Extrudes one group into a solid, or explains why it was skipped.
    ///
    /// Groups rejected by the height, vertex or outline checks write nothing
    /// to `store`. A kernel failure after the face is built can leave that
    /// face, and possibly an untessellated solid, in the store, so
    /// [`TopologyStore::solid_count`] is an upper bound on the built solids.
    pub fn extrude(&self, group: &BuildingGroup, store: &mut TopologyStore) -> ExtrusionOutcome {
        match self.build(group, store) {
            Ok(built) => ExtrusionOutcome::Built(built),
            Err(reason) => {
                debug!(id = %group.id, %reason, "skipping footprint");
                ExtrusionOutcome::Skipped {
                    id: group.id.clone(),
                    reason,
                }
            }
        }
    }

    fn build(&self, group: &BuildingGroup, store: &mut TopologyStore) -> Result<BuiltSolid, SkipReason> {
        let height = group.height.ok_or(SkipReason::MissingHeight)?;
        if group.vertices.len() < 3 {
            return Err(SkipReason::TooFewVertices {
                count: group.vertices.len(),
            });
        }
        if !height.is_finite() || height.abs() < TOLERANCE {
            return Err(SkipReason::DegenerateHeight { height });
        }
        if height < 0.0 {
            warn!(id = %group.id, height, "negative height, extruding downward");
        }

        let mut ring = group.vertices.clone();
        close_ring(&mut ring);
        let boundary = check_outline(&ring).map_err(SkipReason::FaceConstruction)?;

        let points = boundary.iter().map(|p| lift(p, 0.0)).collect();
        let face = MakeWire::new(points, true)
            .execute(store)
            .and_then(|wire| MakeFace::new(wire).execute(store))
            .map_err(|e| SkipReason::FaceConstruction(FaceFailure::Kernel(e.to_string())))?;

        let name = format!("{}{}", self.name_prefix, group.id);
        let solid = Extrude::new(face, Vector3::new(0.0, 0.0, height))
            .with_name(name.clone())
            .execute(store)
            .map_err(|e| SkipReason::Extrusion(e.to_string()))?;
        let mesh = TessellateSolid::new(solid)
            .execute(store)
            .map_err(|e| SkipReason::Extrusion(e.to_string()))?;

        Ok(BuiltSolid {
            id: group.id.clone(),
            name,
            solid,
            mesh,
        })
    }
}

/// Checks that a closed ring can be filled, returning its distinct boundary.
///
/// Runs before anything is written to the store, so outlines rejected here
/// leave the store untouched.
fn check_outline(ring: &[Point2]) -> Result<Vec<Point2>, FaceFailure> {
    let boundary = ring_boundary(ring);
    if boundary.len() < 3 {
        return Err(FaceFailure::TooFewDistinctVertices {
            count: boundary.len(),
        });
    }
    if signed_area_2d(&boundary).abs() < TOLERANCE {
        return Err(FaceFailure::ZeroArea);
    }
    if !is_simple_ring(&boundary) {
        return Err(FaceFailure::SelfIntersecting);
    }
    Ok(boundary)
}
