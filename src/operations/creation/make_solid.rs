use crate::error::{Result, TopologyError};
use crate::topology::{ShellId, SolidData, SolidId, TopologyStore};

/// Creates a named solid from a closed shell.
pub struct MakeSolid {
    outer_shell: ShellId,
    name: String,
}

impl MakeSolid {
    /// Creates a new `MakeSolid` operation.
    #[must_use]
    pub fn new(outer_shell: ShellId, name: impl Into<String>) -> Self {
        Self {
            outer_shell,
            name: name.into(),
        }
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell does not exist or is not closed.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if !store.shell(self.outer_shell)?.is_closed {
            return Err(
                TopologyError::InvalidTopology("solid shell must be closed".into()).into(),
            );
        }
        Ok(store.add_solid(SolidData {
            name: self.name.clone(),
            outer_shell: self.outer_shell,
        }))
    }
}
