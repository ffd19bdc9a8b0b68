//! Planning module for cluster resources.
//!
//! This module turns a cluster specification into the ordered set of
//! builder instances that must exist and the set that must be removed.

mod catalog;
mod diff;
mod features;
mod plan;
mod prune;
mod resources;
mod rules;

pub use catalog::{BuilderInstance, BuilderKind, CertScope, FeatureArea};
pub use diff::{DiffType, InstanceDiff, PlanDiff};
pub use features::{
    FeatureFlags, admin_tools_enabled, cert_authority_mtls_enabled, frontend_mtls_enabled,
    internal_frontend_enabled, internode_mtls_enabled, mesh_mtls_enabled, service_monitor_enabled,
    service_monitor_requested, ui_enabled, ui_ingress_configured,
};
pub use plan::PlanResult;
pub use prune::PrunePlanner;
pub use resources::ResourceSetPlanner;
pub use rules::{Emit, PER_SERVICE_RULES, PRELUDE_RULES, PRUNE_RULES, Rule, TRAILER_RULES};

use tracing::debug;

use crate::config::ClusterSpec;
use crate::error::{PlanError, Result};

/// Runs both planners over one specification snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct Planner;

impl Planner {
    /// Creates a new planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Plans the creation and prune sets for `spec`.
    ///
    /// The pass is all-or-nothing: on error no partial plan is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an active service has no definition, or if the
    /// two sets would overlap.
    pub fn plan(&self, spec: &ClusterSpec) -> Result<PlanResult> {
        let flags = FeatureFlags::from_spec(spec);

        let to_create = ResourceSetPlanner::with_flags(spec, flags).plan()?;
        let to_prune = PrunePlanner::with_flags(flags).plan();
        let plan = PlanResult::new(to_create, to_prune);

        let overlap = plan.overlap();
        if !overlap.is_empty() {
            let names: Vec<String> = overlap.iter().map(ToString::to_string).collect();
            return Err(PlanError::ConflictingInstances {
                message: names.join(", "),
            }
            .into());
        }

        debug!(
            "Planned cluster {}: {} to create, {} to prune",
            spec.name,
            plan.create_count(),
            plan.prune_count()
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AdminToolsSpec, DynamicConfigSpec, MetricsSpec, MtlsProvider, MtlsScopeSpec, MtlsSpec,
        ScrapeConfig, ServiceDefinition, ServiceMonitorSpec, ServiceName, UiIngressSpec, UiSpec,
    };
    use crate::error::ResourceSetError;

    fn cert_manager(internode: bool, frontend: bool) -> MtlsSpec {
        MtlsSpec {
            provider: MtlsProvider::CertManager,
            internode: Some(MtlsScopeSpec { enabled: internode }),
            frontend: Some(MtlsScopeSpec { enabled: frontend }),
            certificates_duration: None,
        }
    }

    fn with_internal_frontend(spec: &mut ClusterSpec) {
        let internal = ServiceDefinition::new(ServiceName::InternalFrontend).explicitly_enabled();
        spec.services.push(internal);
    }

    /// A spread of specifications touching every feature combination the
    /// rule tables distinguish.
    fn specs() -> Vec<ClusterSpec> {
        let mut specs = Vec::new();
        for bits in 0u16..256 {
            let mut spec = ClusterSpec::new("matrix");
            if bits & 1 != 0 {
                with_internal_frontend(&mut spec);
            }
            spec.mtls = match (bits >> 1) & 3 {
                0 => None,
                1 => Some(cert_manager(bits & 8 != 0, bits & 16 != 0)),
                2 => Some(MtlsSpec {
                    provider: MtlsProvider::Istio,
                    ..MtlsSpec::default()
                }),
                _ => Some(MtlsSpec {
                    provider: MtlsProvider::Linkerd,
                    ..MtlsSpec::default()
                }),
            };
            if bits & 32 != 0 {
                spec.ui = Some(UiSpec {
                    enabled: bits & 8 == 0,
                    ingress: (bits & 16 != 0).then(UiIngressSpec::default),
                    ..UiSpec::default()
                });
            }
            if bits & 64 != 0 {
                spec.admin_tools = Some(AdminToolsSpec {
                    enabled: bits & 1 == 0,
                    image: None,
                });
            }
            if bits & 128 != 0 {
                spec.dynamic_config = Some(DynamicConfigSpec::default());
                spec.metrics = Some(MetricsSpec {
                    enabled: true,
                    scrape_config: Some(ScrapeConfig {
                        annotations: true,
                        service_monitor: Some(ServiceMonitorSpec {
                            enabled: bits & 2 == 0,
                            ..ServiceMonitorSpec::default()
                        }),
                    }),
                });
            }
            specs.push(spec);
        }
        specs
    }

    #[test]
    fn test_default_disabled_invariant() {
        let plan = Planner::new().plan(&ClusterSpec::new("prod")).unwrap();
        assert_eq!(plan.create_count(), 14);
        assert_eq!(plan.prune_count(), 4);
        assert!(plan
            .to_create
            .iter()
            .all(|i| i.kind.feature() == FeatureArea::Core));
    }

    #[test]
    fn test_plans_are_deterministic() {
        let planner = Planner::new();
        for spec in specs() {
            let first = planner.plan(&spec).unwrap();
            let second = planner.plan(&spec).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.fingerprint(), second.fingerprint());
        }
    }

    #[test]
    fn test_create_and_prune_never_overlap() {
        let planner = Planner::new();
        for spec in specs() {
            let plan = planner.plan(&spec).unwrap();
            assert!(plan.overlap().is_empty(), "{plan}");
        }
    }

    #[test]
    fn test_scenario_internal_frontend() {
        let mut spec = ClusterSpec::new("prod");
        with_internal_frontend(&mut spec);
        let plan = Planner::new().plan(&spec).unwrap();
        assert_eq!(plan.create_count(), 17);
        assert_eq!(FeatureFlags::from_spec(&spec).active_services().len(), 5);
    }

    #[test]
    fn test_scenario_cert_manager_both_scopes() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(true, true));
        let plan = Planner::new().plan(&spec).unwrap();
        assert_eq!(plan.create_count(), 14 + 10);
        assert_eq!(plan.created_for(FeatureArea::Mtls).len(), 10);
    }

    #[test]
    fn test_scenario_ui_with_ingress_and_frontend_mtls() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(false, true));
        let baseline = Planner::new().plan(&spec).unwrap();

        spec.ui = Some(UiSpec {
            enabled: true,
            ingress: Some(UiIngressSpec::default()),
            ..UiSpec::default()
        });
        let plan = Planner::new().plan(&spec).unwrap();

        assert_eq!(plan.create_count(), baseline.create_count() + 4);
        assert_eq!(plan.created_for(FeatureArea::Ui).len(), 4);
        assert!(plan.to_prune.iter().all(|i| i.kind.feature() != FeatureArea::Ui));
        assert_eq!(plan.prune_count(), 1);
    }

    #[test]
    fn test_internal_frontend_exclusivity_across_matrix() {
        let worker_cert = BuilderInstance::scoped(
            BuilderKind::WorkerFrontendClientCertificate,
            CertScope::Frontend,
        );
        let planner = Planner::new();
        for spec in specs() {
            let flags = FeatureFlags::from_spec(&spec);
            let plan = planner.plan(&spec).unwrap();
            if flags.frontend_mtls {
                assert_eq!(plan.creates(&worker_cert), !flags.internal_frontend);
            } else {
                assert!(!plan.creates(&worker_cert));
            }
        }
    }

    #[test]
    fn test_lookup_failure_yields_no_plan() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.clear();
        let result = Planner::new().plan(&spec);
        assert!(matches!(
            result,
            Err(ResourceSetError::Plan(PlanError::ServiceLookup { .. }))
        ));
    }
}
