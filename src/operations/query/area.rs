use crate::error::Result;
use crate::tessellation::TessellateSolid;
use crate::topology::{SolidId, TopologyStore};

/// Computes the ground-plane footprint of a solid.
///
/// Projects every downward-facing triangle onto `z = 0` and sums the
/// projected areas. For an extruded building this is the area of its base.
pub struct FootprintArea {
    solid: SolidId,
}

impl FootprintArea {
    /// Creates a new `FootprintArea` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the projected base area.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be tessellated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let mesh = TessellateSolid::new(self.solid).execute(store)?;

        let mut footprint = 0.0;
        for i in 0..mesh.triangle_count() {
            let [v0, v1, v2] = mesh.triangle(i);
            let projected = (v1 - v0).cross(&(v2 - v0)).z * 0.5;
            if projected < 0.0 {
                footprint -= projected;
            }
        }

        Ok(footprint)
    }
}
