//! Footprint-to-solid extrusion.
//!
//! Rows are grouped into [`BuildingGroup`]s, then each group is closed,
//! filled and extruded into a named prism. Groups that cannot be built are
//! skipped with a [`SkipReason`] instead of failing the run.

mod extrude;
mod group;

pub use extrude::{BuiltSolid, ExtrusionOutcome, FaceFailure, FootprintExtruder, SkipReason};
pub use group::{group_footprints, BuildingGroup};
