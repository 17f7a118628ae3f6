//! Multigroup cross section collapse and criticality eigenvalue solver
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod collapse;
mod eigen;
mod error;
mod groups;
mod tally;

#[doc(inline)]
pub use groups::EnergyGroups;

#[doc(inline)]
pub use tally::{Reaction, TallyKey, TallyRecord, TallySet};

#[doc(inline)]
pub use collapse::{collapse, normalise_chi, CrossSections};

#[doc(inline)]
pub use eigen::{balance_operator, criticality, fission_operator, solve, Mode, Spectrum};

#[doc(inline)]
pub use error::{Error, Result};
