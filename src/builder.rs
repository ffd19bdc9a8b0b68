//! Seam between the planner and the resource builder layer.
//!
//! The planner only decides *which* builders apply. Rendering a resource
//! body is delegated to a [`ResourceBuilder`] registered per
//! [`BuilderKind`] in a [`BuilderRegistry`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ClusterSpec;
use crate::error::{PlanError, Result};
use crate::planner::{BuilderInstance, BuilderKind, PlanResult};

/// Renders the body of one kind of resource.
pub trait ResourceBuilder: Send + Sync {
    /// Renders the resource identified by `instance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be produced from `spec`.
    fn render(&self, spec: &ClusterSpec, instance: &BuilderInstance) -> Result<serde_json::Value>;
}

/// A rendered resource ready to hand to a reconciler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResource {
    /// Identity of the resource.
    pub instance: BuilderInstance,
    /// Cluster API kind.
    pub api_kind: &'static str,
    /// Object name.
    pub name: String,
    /// Object namespace.
    pub namespace: String,
    /// Rendered body.
    pub body: serde_json::Value,
}

/// Maps builder kinds to the builders rendering them.
#[derive(Default)]
pub struct BuilderRegistry {
    /// Registered builders.
    builders: BTreeMap<BuilderKind, Box<dyn ResourceBuilder>>,
}

impl BuilderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `builder` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: BuilderKind, builder: Box<dyn ResourceBuilder>) {
        self.builders.insert(kind, builder);
    }

    /// Returns true if a builder handles `kind`.
    #[must_use]
    pub fn handles(&self, kind: BuilderKind) -> bool {
        self.builders.contains_key(&kind)
    }

    /// Returns the kinds used by `plan` that have no builder, in catalog order.
    #[must_use]
    pub fn missing_kinds(&self, plan: &PlanResult) -> Vec<BuilderKind> {
        let mut missing: Vec<BuilderKind> = plan
            .to_create
            .iter()
            .chain(&plan.to_prune)
            .map(|i| i.kind)
            .filter(|k| !self.handles(*k))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// Renders every instance of the creation set, in plan order.
    ///
    /// # Errors
    ///
    /// Returns an error if a kind has no builder or a builder fails. No
    /// partial output is returned.
    pub fn render_all(&self, spec: &ClusterSpec, plan: &PlanResult) -> Result<Vec<RenderedResource>> {
        plan.to_create
            .iter()
            .map(|instance| self.render(spec, instance))
            .collect()
    }

    /// Renders a single instance.
    fn render(&self, spec: &ClusterSpec, instance: &BuilderInstance) -> Result<RenderedResource> {
        let builder = self.builders.get(&instance.kind).ok_or_else(|| PlanError::MissingBuilder {
            kind: instance.kind.to_string(),
        })?;

        Ok(RenderedResource {
            instance: *instance,
            api_kind: instance.kind.api_kind(),
            name: instance.object_name(&spec.name),
            namespace: spec.namespace.clone(),
            body: builder.render(spec, instance)?,
        })
    }
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("kinds", &self.builders.keys().collect::<Vec<_>>())
            .finish()
    }
}
