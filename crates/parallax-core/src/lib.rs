#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// RANSAC essential-matrix estimator over the five-point solver.
pub mod five_point_estimator;

/// Sequential composition of loop-closure methods.
pub mod multi_method;

/// Endpoint-proximity loop closure.
pub mod proximity;

use parallax_algo::{AlgorithmRegistry, RegistryError};

pub use five_point_estimator::FivePointEstimator;
pub use multi_method::MultiMethodCloser;
pub use proximity::ProximityCloser;

/// Register this crate's algorithm implementations.
pub fn register_algorithms(registry: &AlgorithmRegistry) -> Result<(), RegistryError> {
    registry.register_essential_estimator("five_point", |_registry| {
        Box::new(FivePointEstimator::default())
    })?;
    registry.register_close_loops("multi_method", |registry| {
        Box::new(MultiMethodCloser::new(registry.clone()))
    })?;
    registry.register_close_loops("proximity", |_registry| {
        Box::new(ProximityCloser::default())
    })?;
    Ok(())
}

/// A fresh registry holding every default implementation.
pub fn default_registry() -> Result<AlgorithmRegistry, RegistryError> {
    let registry = AlgorithmRegistry::new();
    register_algorithms(&registry)?;
    Ok(registry)
}
