#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// The capability interface shared by every algorithm implementation.
pub mod algorithm;

/// The loop-closure algorithm family.
pub mod close_loops;

/// Error types shared across algorithm families.
pub mod error;

/// The essential-matrix estimation algorithm family.
pub mod estimate_essential_matrix;

/// Name-based lookup of algorithm factories.
pub mod registry;

pub use algorithm::{Algorithm, AlgorithmDescriptor};
pub use close_loops::{CloseLoops, CLOSE_LOOPS_FAMILY};
pub use error::{AlgorithmError, CloseLoopsError, EstimationError, RegistryError};
pub use estimate_essential_matrix::{
    EstimateEssentialMatrix, ESTIMATE_ESSENTIAL_MATRIX_FAMILY,
};
pub use registry::{AlgorithmFactory, AlgorithmRegistry};
