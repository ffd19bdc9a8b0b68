//! Plan result types.
//!
//! A [`PlanResult`] holds the two ordered outputs of a planning pass: what
//! to upsert and what to delete.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use super::catalog::{BuilderInstance, FeatureArea};

/// The complete output of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    /// Instances to create or update, in dependency order.
    pub to_create: Vec<BuilderInstance>,
    /// Instances to delete if they exist.
    pub to_prune: Vec<BuilderInstance>,
}

impl PlanResult {
    /// Creates a plan from its two sequences.
    #[must_use]
    pub const fn new(to_create: Vec<BuilderInstance>, to_prune: Vec<BuilderInstance>) -> Self {
        Self {
            to_create,
            to_prune,
        }
    }

    /// Returns the number of instances to create.
    #[must_use]
    pub const fn create_count(&self) -> usize {
        self.to_create.len()
    }

    /// Returns the number of instances to prune.
    #[must_use]
    pub const fn prune_count(&self) -> usize {
        self.to_prune.len()
    }

    /// Returns true if `instance` is in the creation set.
    #[must_use]
    pub fn creates(&self, instance: &BuilderInstance) -> bool {
        self.to_create.contains(instance)
    }

    /// Returns true if `instance` is in the prune set.
    #[must_use]
    pub fn prunes(&self, instance: &BuilderInstance) -> bool {
        self.to_prune.contains(instance)
    }

    /// Returns instances present in both sequences.
    #[must_use]
    pub fn overlap(&self) -> Vec<BuilderInstance> {
        self.to_create
            .iter()
            .filter(|i| self.prunes(i))
            .copied()
            .collect()
    }

    /// Counts creation instances per feature area.
    #[must_use]
    pub fn create_count_by_feature(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for instance in &self.to_create {
            *counts.entry(instance.kind.feature().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the creation instances owned by `feature`.
    #[must_use]
    pub fn created_for(&self, feature: FeatureArea) -> Vec<&BuilderInstance> {
        self.to_create
            .iter()
            .filter(|i| i.kind.feature() == feature)
            .collect()
    }

    /// Computes a SHA-256 fingerprint over both ordered sequences.
    ///
    /// Equal plans, including order, always share a fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update(b"create");
        for instance in &self.to_create {
            hasher.update(instance.to_string().as_bytes());
            hasher.update([0u8]);
        }

        hasher.update(b"prune");
        for instance in &self.to_prune {
            hasher.update(instance.to_string().as_bytes());
            hasher.update([0u8]);
        }

        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for PlanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Resource Plan ({} to create, {} to prune):", self.create_count(), self.prune_count())?;
        for (i, instance) in self.to_create.iter().enumerate() {
            writeln!(f, "  {i}. create {instance}")?;
        }
        for (i, instance) in self.to_prune.iter().enumerate() {
            writeln!(f, "  {i}. prune {instance}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::catalog::BuilderKind;

    fn sample() -> PlanResult {
        PlanResult::new(
            vec![
                BuilderInstance::global(BuilderKind::ConfigMap),
                BuilderInstance::global(BuilderKind::UiDeployment),
            ],
            vec![BuilderInstance::global(BuilderKind::AdminToolsDeployment)],
        )
    }

    #[test]
    fn test_counts_and_membership() {
        let plan = sample();
        assert_eq!(plan.create_count(), 2);
        assert_eq!(plan.prune_count(), 1);
        assert!(plan.creates(&BuilderInstance::global(BuilderKind::ConfigMap)));
        assert!(plan.prunes(&BuilderInstance::global(BuilderKind::AdminToolsDeployment)));
        assert!(plan.overlap().is_empty());
        assert_eq!(plan.created_for(FeatureArea::Ui).len(), 1);
        assert_eq!(plan.create_count_by_feature().get("core"), Some(&1));
    }

    #[test]
    fn test_overlap_detected() {
        let mut plan = sample();
        plan.to_prune.push(BuilderInstance::global(BuilderKind::UiDeployment));
        assert_eq!(
            plan.overlap(),
            vec![BuilderInstance::global(BuilderKind::UiDeployment)]
        );
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let plan = sample();
        assert_eq!(plan.fingerprint(), sample().fingerprint());

        let mut reordered = sample();
        reordered.to_create.reverse();
        assert_ne!(plan.fingerprint(), reordered.fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_sequences() {
        let created = PlanResult::new(vec![BuilderInstance::global(BuilderKind::UiIngress)], vec![]);
        let pruned = PlanResult::new(vec![], vec![BuilderInstance::global(BuilderKind::UiIngress)]);
        assert_ne!(created.fingerprint(), pruned.fingerprint());
    }
}
