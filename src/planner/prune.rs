//! Prune planning for features that were switched off.

use crate::config::ClusterSpec;

use super::catalog::BuilderInstance;
use super::features::FeatureFlags;
use super::rules::{self, PRUNE_RULES};

/// Computes builder instances whose resources must be deleted.
///
/// Only the UI and admin tools are covered. Certificates and mesh
/// resources are left in place when their feature is disabled.
#[derive(Debug)]
pub struct PrunePlanner {
    /// Features evaluated from the specification.
    flags: FeatureFlags,
}

impl PrunePlanner {
    /// Creates a prune planner for `spec`.
    #[must_use]
    pub fn new(spec: &ClusterSpec) -> Self {
        Self::with_flags(FeatureFlags::from_spec(spec))
    }

    /// Creates a prune planner from already evaluated flags.
    #[must_use]
    pub const fn with_flags(flags: FeatureFlags) -> Self {
        Self { flags }
    }

    /// Returns the ordered prune set.
    #[must_use]
    pub fn plan(&self) -> Vec<BuilderInstance> {
        let mut instances = Vec::new();
        rules::apply_global(PRUNE_RULES, &self.flags, &mut instances);
        instances
    }
}
