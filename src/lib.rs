//! `pinlat` is a toolkit for pin cell and lattice geometry queries and
//! multigroup criticality post-processing
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use pinlat_utils as utils;

#[cfg(feature = "geometry")]
#[cfg_attr(docsrs, doc(cfg(feature = "geometry")))]
#[doc(inline)]
pub use pinlat_geometry as geometry;

#[cfg(feature = "mgxs")]
#[cfg_attr(docsrs, doc(cfg(feature = "mgxs")))]
#[doc(inline)]
pub use pinlat_mgxs as mgxs;
