use parallax_config::ConfigError;

/// Errors raised while configuring an algorithm instance.
#[derive(thiserror::Error, Debug)]
pub enum AlgorithmError {
    /// A configuration value was missing or of the wrong type.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A named sub-algorithm could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The configuration block is inconsistent for this implementation.
    #[error("invalid configuration for {algorithm}: {reason}")]
    InvalidConfiguration {
        /// Family and implementation name of the rejecting algorithm.
        algorithm: String,
        /// What the block failed to satisfy.
        reason: String,
    },
}

/// Errors raised by registry lookups and registrations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory is registered under the requested key.
    #[error("no such algorithm: {family}:{impl_name}")]
    NoSuchAlgorithm {
        /// Requested family name.
        family: String,
        /// Requested implementation name.
        impl_name: String,
    },

    /// A factory is already registered under the key.
    #[error("algorithm already registered: {family}:{impl_name}")]
    DuplicateAlgorithm {
        /// Colliding family name.
        family: String,
        /// Colliding implementation name.
        impl_name: String,
    },
}

/// Errors raised by essential-matrix estimation.
#[derive(thiserror::Error, Debug)]
pub enum EstimationError {
    /// The two correspondence sets differ in length.
    #[error("correspondence sets differ in length: {len1} vs {len2}")]
    MismatchedLengths {
        /// Length of the view-1 set.
        len1: usize,
        /// Length of the view-2 set.
        len2: usize,
    },

    /// Fewer correspondences than the minimal solver consumes.
    #[error("need at least {required} correspondences, got {actual}")]
    InsufficientCorrespondences {
        /// Minimal-sample size of the solver.
        required: usize,
        /// Correspondences supplied.
        actual: usize,
    },

    /// The inlier threshold is not a positive distance.
    #[error("inlier scale must be positive, got {value}")]
    NonPositiveInlierScale {
        /// The rejected threshold.
        value: f64,
    },

    /// The consensus search ran out of trials without a satisfying model.
    #[error("estimation failed: consensus search found no satisfying model")]
    EstimationFailed,
}

/// Errors raised by loop-closure stitching.
#[derive(thiserror::Error, Debug)]
pub enum CloseLoopsError {
    /// A composed sub-algorithm failed.
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}
