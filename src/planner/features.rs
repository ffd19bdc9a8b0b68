//! Feature predicates over a cluster specification.
//!
//! Every nested-presence check lives here so that "absent means disabled"
//! is decided in exactly one place.

use serde::Serialize;

use crate::config::{ClusterSpec, MtlsProvider, MtlsScopeSpec, MtlsSpec, ServiceName};

/// Plain booleans describing which optional features are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeatureFlags {
    /// mTLS delegated to the Istio mesh.
    pub mesh_mtls: bool,
    /// mTLS backed by cert-manager issued certificates.
    pub cert_authority_mtls: bool,
    /// Internode scope of cert-manager mTLS.
    pub internode_mtls: bool,
    /// Frontend scope of cert-manager mTLS.
    pub frontend_mtls: bool,
    /// The internal-frontend service is explicitly enabled.
    pub internal_frontend: bool,
    /// The web UI is enabled.
    pub ui: bool,
    /// The web UI is enabled and has an ingress block.
    pub ui_ingress: bool,
    /// Admin tools are enabled.
    pub admin_tools: bool,
    /// Service monitors are requested at every nesting level.
    pub service_monitor: bool,
    /// A dynamic configuration block is present.
    pub dynamic_config: bool,
}

impl FeatureFlags {
    /// Evaluates every predicate against `spec`.
    #[must_use]
    pub fn from_spec(spec: &ClusterSpec) -> Self {
        Self {
            mesh_mtls: mesh_mtls_enabled(spec),
            cert_authority_mtls: cert_authority_mtls_enabled(spec),
            internode_mtls: internode_mtls_enabled(spec),
            frontend_mtls: frontend_mtls_enabled(spec),
            internal_frontend: internal_frontend_enabled(spec),
            ui: ui_enabled(spec),
            ui_ingress: ui_ingress_configured(spec),
            admin_tools: admin_tools_enabled(spec),
            service_monitor: service_monitor_enabled(spec),
            dynamic_config: spec.dynamic_config.is_some(),
        }
    }

    /// Returns the active services in enumeration order.
    #[must_use]
    pub fn active_services(&self) -> Vec<ServiceName> {
        ServiceName::ALL
            .into_iter()
            .filter(|s| *s != ServiceName::InternalFrontend || self.internal_frontend)
            .collect()
    }

    /// Client certificates for frontend access are needed.
    #[must_use]
    pub const fn frontend_client_certificates(&self) -> bool {
        self.cert_authority_mtls && self.frontend_mtls
    }
}

/// True when mTLS is delegated to the Istio mesh.
#[must_use]
pub fn mesh_mtls_enabled(spec: &ClusterSpec) -> bool {
    spec.mtls.as_ref().is_some_and(|m| m.provider == MtlsProvider::Istio)
}

/// True when mTLS certificates are issued by cert-manager.
#[must_use]
pub fn cert_authority_mtls_enabled(spec: &ClusterSpec) -> bool {
    cert_authority_mtls(spec).is_some()
}

/// True when cert-manager mTLS covers internode traffic.
#[must_use]
pub fn internode_mtls_enabled(spec: &ClusterSpec) -> bool {
    cert_authority_mtls(spec).is_some_and(|m| scope_enabled(m.internode.as_ref()))
}

/// True when cert-manager mTLS covers frontend traffic.
#[must_use]
pub fn frontend_mtls_enabled(spec: &ClusterSpec) -> bool {
    cert_authority_mtls(spec).is_some_and(|m| scope_enabled(m.frontend.as_ref()))
}

/// True when internal-frontend has a definition explicitly enabled.
#[must_use]
pub fn internal_frontend_enabled(spec: &ClusterSpec) -> bool {
    spec.service_definition(ServiceName::InternalFrontend).is_some_and(|d| d.enabled == Some(true))
}

/// True when the UI block is present and enabled.
#[must_use]
pub fn ui_enabled(spec: &ClusterSpec) -> bool {
    spec.ui.as_ref().is_some_and(|ui| ui.enabled)
}

/// True when the UI is enabled and carries an ingress block.
#[must_use]
pub fn ui_ingress_configured(spec: &ClusterSpec) -> bool {
    spec.ui.as_ref().is_some_and(|ui| ui.enabled && ui.ingress.is_some())
}

/// True when the admin tools block is present and enabled.
#[must_use]
pub fn admin_tools_enabled(spec: &ClusterSpec) -> bool {
    spec.admin_tools.as_ref().is_some_and(|a| a.enabled)
}

/// True when a service monitor is switched on under `metrics.scrapeConfig`,
/// whether or not metrics themselves are enabled.
#[must_use]
pub fn service_monitor_requested(spec: &ClusterSpec) -> bool {
    spec.metrics
        .as_ref()
        .and_then(|m| m.scrape_config.as_ref())
        .and_then(|c| c.service_monitor.as_ref())
        .is_some_and(|m| m.enabled)
}

/// True when service monitors are requested at every nesting level.
#[must_use]
pub fn service_monitor_enabled(spec: &ClusterSpec) -> bool {
    spec.metrics.as_ref().is_some_and(|m| m.enabled) && service_monitor_requested(spec)
}

/// Returns the mTLS block when its provider is cert-manager.
fn cert_authority_mtls(spec: &ClusterSpec) -> Option<&MtlsSpec> {
    spec.mtls.as_ref().filter(|m| m.provider == MtlsProvider::CertManager)
}

fn scope_enabled(scope: Option<&MtlsScopeSpec>) -> bool {
    scope.is_some_and(|s| s.enabled)
}
