//! Identity diff between two planning passes.
//!
//! Compares which builder instances appear in two [`PlanResult`]s, for
//! instance before and after a specification edit. Resource bodies are
//! never compared.

use serde::Serialize;

use super::catalog::BuilderInstance;
use super::plan::PlanResult;

/// Type of change for one builder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffType {
    /// Newly in the creation set.
    Added,
    /// No longer in the creation set.
    Removed,
    /// Newly in the prune set.
    NowPruned,
    /// No longer in the prune set.
    NoLongerPruned,
}

/// Change for a single builder instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceDiff {
    /// Affected instance.
    pub instance: BuilderInstance,
    /// Type of change.
    pub diff_type: DiffType,
}

/// Differences between a previous and a next plan.
#[derive(Debug, Default, Serialize)]
pub struct PlanDiff {
    /// All changes, creation set changes first.
    pub diffs: Vec<InstanceDiff>,
}

impl PlanDiff {
    /// Computes the identity diff from `previous` to `next`.
    #[must_use]
    pub fn between(previous: &PlanResult, next: &PlanResult) -> Self {
        let mut diffs = Vec::new();

        Self::collect(&next.to_create, &previous.to_create, DiffType::Added, &mut diffs);
        Self::collect(&previous.to_create, &next.to_create, DiffType::Removed, &mut diffs);
        Self::collect(&next.to_prune, &previous.to_prune, DiffType::NowPruned, &mut diffs);
        Self::collect(&previous.to_prune, &next.to_prune, DiffType::NoLongerPruned, &mut diffs);

        Self { diffs }
    }

    /// Pushes every instance of `from` missing in `other`.
    fn collect(
        from: &[BuilderInstance],
        other: &[BuilderInstance],
        diff_type: DiffType,
        diffs: &mut Vec<InstanceDiff>,
    ) {
        for instance in from.iter().filter(|i| !other.contains(i)) {
            diffs.push(InstanceDiff {
                instance: *instance,
                diff_type,
            });
        }
    }

    /// Returns true if the two plans enumerate the same identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Returns the number of changes of `diff_type`.
    #[must_use]
    pub fn count(&self, diff_type: DiffType) -> usize {
        self.diffs.iter().filter(|d| d.diff_type == diff_type).count()
    }
}

impl std::fmt::Display for DiffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::NowPruned => "now pruned",
            Self::NoLongerPruned => "no longer pruned",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for InstanceDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.instance, self.diff_type)
    }
}
