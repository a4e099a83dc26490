use crate::error::Result;
use crate::tessellation::TessellateSolid;
use crate::topology::{SolidId, TopologyStore};

/// Computes the volume of a solid.
///
/// Uses tessellation and the signed tetrahedron method: for each triangle,
/// `(1/6) * v0 · (v1 × v2)` summed over all triangles. Extruded solids
/// carry consistent outward winding, so no per-triangle sign correction is
/// needed.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be tessellated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let mesh = TessellateSolid::new(self.solid).execute(store)?;

        let mut signed_volume = 0.0;
        for i in 0..mesh.triangle_count() {
            let [v0, v1, v2] = mesh.triangle(i);
            signed_volume += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }

        Ok(signed_volume.abs() / 6.0)
    }
}
