#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use parallax_algo as algo;

#[doc(inline)]
pub use parallax_config as config;

#[doc(inline)]
pub use parallax_core as core;

#[doc(inline)]
pub use parallax_geometry as geometry;

#[doc(inline)]
pub use parallax_tracking as tracking;
