//! Identifier newtypes for geometry entities
//!
//! Entities refer to each other by id rather than by ownership, so a single
//! universe may fill any number of cells and lattice slots.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [Surface](crate::Surface)
    SurfaceId
);

entity_id!(
    /// Identifier of a [Cell](crate::Cell)
    CellId
);

entity_id!(
    /// Identifier of a [Universe](crate::Universe)
    UniverseId
);

entity_id!(
    /// Identifier of a [Lattice](crate::Lattice)
    LatticeId
);

entity_id!(
    /// Identifier of a [Material](crate::Material), the terminal fill
    MaterialId
);
