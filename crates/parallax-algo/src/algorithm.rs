use std::fmt;

use parallax_config::ConfigBlock;

use crate::error::AlgorithmError;

/// Identifies a concrete algorithm variant: the family names the problem it
/// solves, the implementation names the variant solving it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlgorithmDescriptor {
    /// Name shared by all implementations solving the same problem.
    pub family: String,
    /// Name of this variant, unique within the family.
    pub impl_name: String,
}

impl AlgorithmDescriptor {
    /// Build a descriptor from family and implementation names.
    pub fn new(family: &str, impl_name: &str) -> Self {
        Self {
            family: family.to_string(),
            impl_name: impl_name.to_string(),
        }
    }
}

impl fmt::Display for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.impl_name)
    }
}

/// The capability interface every algorithm implementation satisfies.
///
/// An algorithm is an ordinary value owning its parameters. Configuration
/// flows through [`ConfigBlock`]s: [`Algorithm::get_configuration`] reports
/// the full tunable surface with current values, and
/// [`Algorithm::set_configuration`] merges a block back in — recognized keys
/// are applied, missing keys keep their current values, and unrecognized keys
/// are ignored, so a partial block is always acceptable.
pub trait Algorithm {
    /// Family name, e.g. `"close_loops"`.
    fn family_name(&self) -> &'static str;

    /// Implementation name, unique within the family.
    fn impl_name(&self) -> &'static str;

    /// One-line documentation of what this implementation does.
    fn description(&self) -> &'static str;

    /// A block seeded with the instance's current parameter values and their
    /// descriptions, covering every key a default instance would report.
    fn get_configuration(&self) -> ConfigBlock;

    /// Merge recognized keys of `config` into this instance's parameters.
    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), AlgorithmError>;

    /// Whether `config`'s content is sufficient and consistent for this
    /// implementation. Judges the block alone, never the instance's state.
    fn check_configuration(&self, config: &ConfigBlock) -> bool;

    /// This instance's registry key.
    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::new(self.family_name(), self.impl_name())
    }
}
