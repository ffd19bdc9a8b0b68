//! Desired resource set planning.

use crate::config::ClusterSpec;
use crate::error::PlanError;

use super::catalog::BuilderInstance;
use super::features::FeatureFlags;
use super::rules::{self, PER_SERVICE_RULES, PRELUDE_RULES, TRAILER_RULES};

/// Computes every builder instance that should exist for a specification.
#[derive(Debug)]
pub struct ResourceSetPlanner<'a> {
    /// Specification being planned.
    spec: &'a ClusterSpec,
    /// Features evaluated from `spec`.
    flags: FeatureFlags,
}

impl<'a> ResourceSetPlanner<'a> {
    /// Creates a planner, evaluating the feature flags of `spec`.
    #[must_use]
    pub fn new(spec: &'a ClusterSpec) -> Self {
        Self::with_flags(spec, FeatureFlags::from_spec(spec))
    }

    /// Creates a planner reusing already evaluated flags.
    #[must_use]
    pub const fn with_flags(spec: &'a ClusterSpec, flags: FeatureFlags) -> Self {
        Self { spec, flags }
    }

    /// Returns the ordered desired set.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ServiceLookup`] when an active service has no
    /// definition in the specification. No partial set is returned.
    pub fn plan(&self) -> Result<Vec<BuilderInstance>, PlanError> {
        let mut instances = Vec::new();

        rules::apply_global(PRELUDE_RULES, &self.flags, &mut instances);

        for service in self.flags.active_services() {
            self.spec.resolve_service(service)?;

            for rule in PER_SERVICE_RULES.iter().filter(|r| r.applies(&self.flags)) {
                instances.extend(rule.instances(Some(service)));
            }
        }

        rules::apply_global(TRAILER_RULES, &self.flags, &mut instances);

        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AdminToolsSpec, DynamicConfigSpec, MetricsSpec, MtlsProvider, MtlsScopeSpec, MtlsSpec,
        ScrapeConfig, ServiceDefinition, ServiceMonitorSpec, ServiceName, UiIngressSpec, UiSpec,
    };
    use crate::planner::catalog::{BuilderKind, CertScope};

    fn plan(spec: &ClusterSpec) -> Vec<BuilderInstance> {
        ResourceSetPlanner::new(spec).plan().unwrap()
    }

    fn cert_manager(internode: bool, frontend: bool) -> MtlsSpec {
        MtlsSpec {
            provider: MtlsProvider::CertManager,
            internode: Some(MtlsScopeSpec { enabled: internode }),
            frontend: Some(MtlsScopeSpec { enabled: frontend }),
            certificates_duration: None,
        }
    }

    fn position(instances: &[BuilderInstance], wanted: BuilderInstance) -> usize {
        instances.iter().position(|i| *i == wanted).unwrap()
    }

    #[test]
    fn test_base_services_only() {
        let instances = plan(&ClusterSpec::new("prod"));
        assert_eq!(instances.len(), 14);
        assert_eq!(instances[0], BuilderInstance::global(BuilderKind::ConfigMap));
        assert_eq!(instances[1], BuilderInstance::global(BuilderKind::FrontendService));

        let expected_services: Vec<_> = ServiceName::BASE.iter().flat_map(|s| [*s; 3]).collect();
        let services: Vec<_> = instances[2..].iter().filter_map(|i| i.service).collect();
        assert_eq!(services, expected_services);
        assert_eq!(
            instances[2..5].iter().map(|i| i.kind).collect::<Vec<_>>(),
            vec![
                BuilderKind::ServiceAccount,
                BuilderKind::Deployment,
                BuilderKind::HeadlessService
            ]
        );
    }

    #[test]
    fn test_internal_frontend_adds_service() {
        let mut spec = ClusterSpec::new("prod");
        let internal = ServiceDefinition::new(ServiceName::InternalFrontend).explicitly_enabled();
        spec.services.push(internal);

        let instances = plan(&spec);
        assert_eq!(instances.len(), 17);
        assert!(instances[14..]
            .iter()
            .all(|i| i.service == Some(ServiceName::InternalFrontend)));
    }

    #[test]
    fn test_missing_definition_aborts_plan() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.retain(|d| d.name != "worker");

        let result = ResourceSetPlanner::new(&spec).plan();
        assert!(matches!(result, Err(PlanError::ServiceLookup { service }) if service == "worker"));
    }

    #[test]
    fn test_mesh_and_monitor_follow_each_service() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(MtlsSpec {
            provider: MtlsProvider::Istio,
            ..MtlsSpec::default()
        });
        spec.metrics = Some(MetricsSpec {
            enabled: true,
            scrape_config: Some(ScrapeConfig {
                annotations: false,
                service_monitor: Some(ServiceMonitorSpec {
                    enabled: true,
                    ..ServiceMonitorSpec::default()
                }),
            }),
        });

        let instances = plan(&spec);
        assert_eq!(instances.len(), 2 + 4 * 6);
        let history: Vec<_> = instances
            .iter()
            .filter(|i| i.service == Some(ServiceName::History))
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            history,
            vec![
                BuilderKind::ServiceAccount,
                BuilderKind::Deployment,
                BuilderKind::HeadlessService,
                BuilderKind::PeerAuthentication,
                BuilderKind::DestinationRule,
                BuilderKind::ServiceMonitor,
            ]
        );
        assert!(!instances.iter().any(|i| i.kind == BuilderKind::MtlsBootstrapIssuer));
    }

    #[test]
    fn test_full_certificate_chain() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(true, true));

        let instances = plan(&spec);
        assert_eq!(instances.len(), 14 + 10);

        let chain: Vec<_> = instances[14..].to_vec();
        assert_eq!(
            chain,
            vec![
                BuilderInstance::global(BuilderKind::MtlsBootstrapIssuer),
                BuilderInstance::global(BuilderKind::MtlsRootCaCertificate),
                BuilderInstance::global(BuilderKind::MtlsRootCaIssuer),
                BuilderInstance::scoped(BuilderKind::MtlsIntermediateCaCertificate, CertScope::Internode),
                BuilderInstance::scoped(BuilderKind::MtlsIntermediateCaIssuer, CertScope::Internode),
                BuilderInstance::scoped(BuilderKind::MtlsCertificate, CertScope::Internode),
                BuilderInstance::scoped(BuilderKind::MtlsIntermediateCaCertificate, CertScope::Frontend),
                BuilderInstance::scoped(BuilderKind::MtlsIntermediateCaIssuer, CertScope::Frontend),
                BuilderInstance::scoped(BuilderKind::MtlsCertificate, CertScope::Frontend),
                BuilderInstance::scoped(
                    BuilderKind::WorkerFrontendClientCertificate,
                    CertScope::Frontend
                ),
            ]
        );
    }

    #[test]
    fn test_root_chain_precedes_internode_chain() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(true, false));
        let instances = plan(&spec);

        let root_issuer = position(&instances, BuilderInstance::global(BuilderKind::MtlsRootCaIssuer));
        let intermediate = position(
            &instances,
            BuilderInstance::scoped(BuilderKind::MtlsIntermediateCaCertificate, CertScope::Internode),
        );
        let leaf = position(
            &instances,
            BuilderInstance::scoped(BuilderKind::MtlsCertificate, CertScope::Internode),
        );
        assert!(root_issuer < intermediate);
        assert!(intermediate < leaf);
        assert!(!instances.iter().any(|i| i.scope == Some(CertScope::Frontend)));
    }

    #[test]
    fn test_internal_frontend_drops_worker_client_certificate() {
        let worker_cert = BuilderInstance::scoped(
            BuilderKind::WorkerFrontendClientCertificate,
            CertScope::Frontend,
        );
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(false, true));
        assert!(plan(&spec).contains(&worker_cert));

        let internal = ServiceDefinition::new(ServiceName::InternalFrontend).explicitly_enabled();
        spec.services.push(internal);
        assert!(!plan(&spec).contains(&worker_cert));
    }

    #[test]
    fn test_ui_admin_tools_and_dynamic_config() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(false, true));
        spec.dynamic_config = Some(DynamicConfigSpec::default());
        spec.ui = Some(UiSpec {
            enabled: true,
            ingress: Some(UiIngressSpec::default()),
            ..UiSpec::default()
        });
        spec.admin_tools = Some(AdminToolsSpec {
            enabled: true,
            image: None,
        });

        let instances = plan(&spec);
        let tail: Vec<_> = instances.iter().rev().take(6).rev().map(|i| i.kind).collect();
        assert_eq!(
            tail,
            vec![
                BuilderKind::UiDeployment,
                BuilderKind::UiService,
                BuilderKind::UiIngress,
                BuilderKind::UiFrontendClientCertificate,
                BuilderKind::AdminToolsDeployment,
                BuilderKind::AdminToolsFrontendClientCertificate,
            ]
        );
        assert_eq!(instances[14], BuilderInstance::global(BuilderKind::DynamicConfigMap));
    }

    #[test]
    fn test_ui_ingress_toggle_flips_one_entry() {
        let mut spec = ClusterSpec::new("prod");
        spec.ui = Some(UiSpec {
            enabled: true,
            ..UiSpec::default()
        });
        let without = plan(&spec);

        if let Some(ui) = spec.ui.as_mut() {
            ui.ingress = Some(UiIngressSpec::default());
        }
        let with = plan(&spec);

        assert_eq!(with.len(), without.len() + 1);
        let added: Vec<_> = with.iter().filter(|i| !without.contains(i)).collect();
        assert_eq!(added, vec![&BuilderInstance::global(BuilderKind::UiIngress)]);
    }

    #[test]
    fn test_plan_has_no_duplicates() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(cert_manager(true, true));
        spec.ui = Some(UiSpec {
            enabled: true,
            ingress: Some(UiIngressSpec::default()),
            ..UiSpec::default()
        });
        spec.admin_tools = Some(AdminToolsSpec {
            enabled: true,
            image: None,
        });
        let internal = ServiceDefinition::new(ServiceName::InternalFrontend).explicitly_enabled();
        spec.services.push(internal);

        let instances = plan(&spec);
        let mut sorted = instances.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), instances.len());
    }
}
