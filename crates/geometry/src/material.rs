// internal modules
use crate::ids::MaterialId;

// external crates
use serde::{Deserialize, Serialize};

/// Reference to a material defined elsewhere
///
/// Compositions and densities belong to the materials subsystem. The geometry
/// only needs something to hand back from a point query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Material identifier
    pub id: MaterialId,
    /// Human readable name, e.g. "uo2"
    pub name: String,
}

impl Material {
    /// Create a new material reference
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: MaterialId(id),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Material {} ({})", self.id, self.name)
    }
}
