use log::warn;

use parallax_algo::{
    Algorithm, AlgorithmError, AlgorithmRegistry, CloseLoops, CloseLoopsError, CLOSE_LOOPS_FAMILY,
};
use parallax_config::ConfigBlock;
use parallax_tracking::{FrameId, ImageFrame, TrackSet};

/// Sequential composition of loop-closure methods.
///
/// Holds an ordered list of sub-methods, each an independently configured
/// `close_loops` implementation resolved from the registry. Stitching applies
/// them in list order, feeding each method's output track set to the next;
/// with no methods configured, stitching is the identity.
#[derive(Clone)]
pub struct MultiMethodCloser {
    registry: AlgorithmRegistry,
    count: u32,
    methods: Vec<Box<dyn CloseLoops>>,
}

impl MultiMethodCloser {
    /// A closer with no configured methods, resolving sub-methods from
    /// `registry`.
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self {
            registry,
            count: 0,
            methods: Vec::new(),
        }
    }

    /// The configured sub-methods, in application order.
    pub fn methods(&self) -> &[Box<dyn CloseLoops>] {
        &self.methods
    }

    fn method_block_name(index: usize) -> String {
        format!("method{}", index + 1)
    }
}

impl Algorithm for MultiMethodCloser {
    fn family_name(&self) -> &'static str {
        CLOSE_LOOPS_FAMILY
    }

    fn impl_name(&self) -> &'static str {
        "multi_method"
    }

    fn description(&self) -> &'static str {
        "Applies a configured sequence of loop closure methods, threading \
         each method's output track set into the next"
    }

    fn get_configuration(&self) -> ConfigBlock {
        let mut config = ConfigBlock::new();
        config.set_value(
            "count",
            self.count,
            "Number of loop closure methods to apply in sequence",
        );
        for (i, method) in self.methods.iter().enumerate() {
            let mut sub = ConfigBlock::new();
            sub.set_value(
                "type",
                method.impl_name(),
                "Implementation name of this loop closure method",
            );
            sub.add_subblock(method.impl_name(), &method.get_configuration());
            config.add_subblock(&Self::method_block_name(i), &sub);
        }
        config
    }

    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), AlgorithmError> {
        let count: u32 = config.get_value_or("count", self.count);

        // Build the complete replacement list before touching the held one,
        // so a failing sub-method leaves the previous list fully intact.
        let mut methods: Vec<Box<dyn CloseLoops>> = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let sub = config.subblock(&Self::method_block_name(i));
            let impl_name: String = sub.get_value("type")?;
            let mut method = self.registry.create_close_loops(&impl_name)?;
            method.set_configuration(&sub.subblock(&impl_name))?;
            methods.push(method);
        }

        self.methods = methods;
        self.count = count;
        Ok(())
    }

    fn check_configuration(&self, config: &ConfigBlock) -> bool {
        let count: u32 = config.get_value_or("count", 0);
        for i in 0..count as usize {
            let block_name = Self::method_block_name(i);
            let sub = config.subblock(&block_name);
            let Ok(impl_name) = sub.get_value::<String>("type") else {
                warn!("{block_name} does not name a loop closure implementation");
                return false;
            };
            let Ok(method) = self.registry.create_close_loops(&impl_name) else {
                warn!("{block_name} names unknown loop closure implementation '{impl_name}'");
                return false;
            };
            if !method.check_configuration(&sub.subblock(&impl_name)) {
                warn!("{block_name} ('{impl_name}') rejected its configuration");
                return false;
            }
        }
        true
    }
}

impl CloseLoops for MultiMethodCloser {
    fn stitch(
        &self,
        frame: FrameId,
        tracks: TrackSet,
        image: &ImageFrame,
        mask: Option<&ImageFrame>,
    ) -> Result<TrackSet, CloseLoopsError> {
        let mut tracks = tracks;
        for method in &self.methods {
            tracks = method.stitch(frame, tracks, image, mask)?;
        }
        Ok(tracks)
    }

    fn clone_boxed(&self) -> Box<dyn CloseLoops> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register_algorithms;
    use parallax_config::ConfigError;

    fn registry() -> AlgorithmRegistry {
        let registry = AlgorithmRegistry::new();
        register_algorithms(&registry).unwrap();
        registry
    }

    fn two_method_config() -> ConfigBlock {
        let mut config = ConfigBlock::new();
        config.set_value("count", 2u32, "");
        config.set_value("method1.type", "proximity", "");
        config.set_value("method1.proximity.max_frame_gap", 3u32, "");
        config.set_value("method2.type", "proximity", "");
        config.set_value("method2.proximity.match_radius", 9.0f64, "");
        config
    }

    #[test]
    fn configures_nested_methods() {
        let mut closer = MultiMethodCloser::new(registry());
        closer.set_configuration(&two_method_config()).unwrap();
        assert_eq!(closer.methods().len(), 2);

        let reported = closer.get_configuration();
        assert_eq!(reported.get_value::<u32>("count").unwrap(), 2);
        assert_eq!(
            reported.get_value::<String>("method1.type").unwrap(),
            "proximity"
        );
        assert_eq!(
            reported
                .get_value::<u32>("method1.proximity.max_frame_gap")
                .unwrap(),
            3
        );
        assert_eq!(
            reported
                .get_value::<f64>("method2.proximity.match_radius")
                .unwrap(),
            9.0
        );
    }

    #[test]
    fn unknown_sub_method_fails_at_configuration_time() {
        let mut closer = MultiMethodCloser::new(registry());
        let mut config = ConfigBlock::new();
        config.set_value("count", 1u32, "");
        config.set_value("method1.type", "no_such_closer", "");
        let err = closer.set_configuration(&config).unwrap_err();
        assert!(matches!(err, AlgorithmError::Registry(_)));
    }

    #[test]
    fn missing_type_key_is_a_config_error() {
        let mut closer = MultiMethodCloser::new(registry());
        let mut config = ConfigBlock::new();
        config.set_value("count", 1u32, "");
        let err = closer.set_configuration(&config).unwrap_err();
        assert!(matches!(
            err,
            AlgorithmError::Config(ConfigError::NoSuchValue { .. })
        ));
    }

    #[test]
    fn failed_reconfiguration_keeps_previous_methods() {
        let mut closer = MultiMethodCloser::new(registry());
        closer.set_configuration(&two_method_config()).unwrap();

        let mut bad = ConfigBlock::new();
        bad.set_value("count", 1u32, "");
        bad.set_value("method1.type", "no_such_closer", "");
        assert!(closer.set_configuration(&bad).is_err());

        // The previously configured list is still intact.
        assert_eq!(closer.methods().len(), 2);
        assert_eq!(
            closer.get_configuration().get_value::<u32>("count").unwrap(),
            2
        );
    }

    #[test]
    fn check_configuration_identifies_bad_blocks() {
        let closer = MultiMethodCloser::new(registry());
        assert!(closer.check_configuration(&two_method_config()));

        let mut unknown = ConfigBlock::new();
        unknown.set_value("count", 1u32, "");
        unknown.set_value("method1.type", "no_such_closer", "");
        assert!(!closer.check_configuration(&unknown));

        let mut untyped = ConfigBlock::new();
        untyped.set_value("count", 1u32, "");
        assert!(!closer.check_configuration(&untyped));

        // Content of the block only: the instance's own state is irrelevant.
        assert!(closer.check_configuration(&ConfigBlock::new()));
    }
}
