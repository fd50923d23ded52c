use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::algorithm::AlgorithmDescriptor;
use crate::close_loops::{CloseLoops, CLOSE_LOOPS_FAMILY};
use crate::error::RegistryError;
use crate::estimate_essential_matrix::{
    EstimateEssentialMatrix, ESTIMATE_ESSENTIAL_MATRIX_FAMILY,
};

/// Constructor for a loop-closure implementation. The registry handle lets
/// composed implementations resolve their own sub-algorithms.
pub type CloseLoopsFactory = fn(&AlgorithmRegistry) -> Box<dyn CloseLoops>;

/// Constructor for an essential-matrix estimator implementation.
pub type EssentialEstimatorFactory = fn(&AlgorithmRegistry) -> Box<dyn EstimateEssentialMatrix>;

/// A factory constructing one algorithm family's trait object.
pub enum AlgorithmFactory {
    /// Builds a [`CloseLoops`] implementation.
    CloseLoops(CloseLoopsFactory),
    /// Builds an [`EstimateEssentialMatrix`] implementation.
    EstimateEssentialMatrix(EssentialEstimatorFactory),
}

/// Maps `(family, implementation)` names to algorithm factories.
///
/// The registry is a cheap handle over shared state: clones observe the same
/// entries, so a handle can be stored by composed algorithms and passed to
/// factories. A failed registration or lookup never disturbs existing
/// entries.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    entries: Arc<RwLock<HashMap<AlgorithmDescriptor, AlgorithmFactory>>>,
}

impl AlgorithmRegistry {
    /// A handle to a fresh, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loop-closure implementation under `impl_name`.
    pub fn register_close_loops(
        &self,
        impl_name: &str,
        factory: CloseLoopsFactory,
    ) -> Result<(), RegistryError> {
        self.register_entry(
            AlgorithmDescriptor::new(CLOSE_LOOPS_FAMILY, impl_name),
            AlgorithmFactory::CloseLoops(factory),
        )
    }

    /// Register an essential-matrix estimator under `impl_name`.
    pub fn register_essential_estimator(
        &self,
        impl_name: &str,
        factory: EssentialEstimatorFactory,
    ) -> Result<(), RegistryError> {
        self.register_entry(
            AlgorithmDescriptor::new(ESTIMATE_ESSENTIAL_MATRIX_FAMILY, impl_name),
            AlgorithmFactory::EstimateEssentialMatrix(factory),
        )
    }

    /// Instantiate the loop-closure implementation named `impl_name`.
    pub fn create_close_loops(
        &self,
        impl_name: &str,
    ) -> Result<Box<dyn CloseLoops>, RegistryError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&AlgorithmDescriptor::new(CLOSE_LOOPS_FAMILY, impl_name)) {
            Some(AlgorithmFactory::CloseLoops(factory)) => Ok(factory(self)),
            _ => Err(RegistryError::NoSuchAlgorithm {
                family: CLOSE_LOOPS_FAMILY.to_string(),
                impl_name: impl_name.to_string(),
            }),
        }
    }

    /// Instantiate the essential-matrix estimator named `impl_name`.
    pub fn create_essential_estimator(
        &self,
        impl_name: &str,
    ) -> Result<Box<dyn EstimateEssentialMatrix>, RegistryError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&AlgorithmDescriptor::new(
            ESTIMATE_ESSENTIAL_MATRIX_FAMILY,
            impl_name,
        )) {
            Some(AlgorithmFactory::EstimateEssentialMatrix(factory)) => Ok(factory(self)),
            _ => Err(RegistryError::NoSuchAlgorithm {
                family: ESTIMATE_ESSENTIAL_MATRIX_FAMILY.to_string(),
                impl_name: impl_name.to_string(),
            }),
        }
    }

    /// Whether a factory is registered under `(family, impl_name)`.
    pub fn has_algorithm(&self, family: &str, impl_name: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&AlgorithmDescriptor::new(family, impl_name))
    }

    /// All registered descriptors, sorted for deterministic enumeration.
    pub fn descriptors(&self) -> Vec<AlgorithmDescriptor> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<_> = entries.keys().cloned().collect();
        out.sort();
        out
    }

    /// The implementation names registered for one family, sorted.
    pub fn implementations(&self, family: &str) -> Vec<String> {
        self.descriptors()
            .into_iter()
            .filter(|d| d.family == family)
            .map(|d| d.impl_name)
            .collect()
    }

    fn register_entry(
        &self,
        descriptor: AlgorithmDescriptor,
        factory: AlgorithmFactory,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&descriptor) {
            return Err(RegistryError::DuplicateAlgorithm {
                family: descriptor.family,
                impl_name: descriptor.impl_name,
            });
        }
        debug!("registered algorithm {descriptor}");
        entries.insert(descriptor, factory);
        Ok(())
    }
}
