use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a topological solid.
///
/// A massing solid is a single closed shell with no voids.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// Human-readable name, e.g. `building_A1`.
    pub name: String,
    /// The outer shell of the solid.
    pub outer_shell: ShellId,
}
