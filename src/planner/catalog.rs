//! Builder catalog and builder instance identities.
//!
//! A [`BuilderKind`] names one kind of resource the builder layer knows how
//! to render. A [`BuilderInstance`] pins a kind to an optional service and
//! an optional certificate scope; two equal instances are the same resource
//! across planning passes.

use serde::Serialize;
use std::fmt;

use crate::config::ServiceName;

/// Every resource builder kind, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuilderKind {
    /// Shared server configuration.
    ConfigMap,
    /// Front-facing endpoint of the frontend service.
    FrontendService,
    /// Per-service identity.
    ServiceAccount,
    /// Per-service workload.
    Deployment,
    /// Per-service headless endpoint.
    HeadlessService,
    /// Per-service mesh peer authentication.
    PeerAuthentication,
    /// Per-service mesh traffic routing.
    DestinationRule,
    /// Per-service metrics scrape target.
    ServiceMonitor,
    /// Dynamic configuration.
    DynamicConfigMap,
    /// Self-signed issuer bootstrapping the root CA.
    MtlsBootstrapIssuer,
    /// Root CA certificate.
    MtlsRootCaCertificate,
    /// Issuer backed by the root CA.
    MtlsRootCaIssuer,
    /// Intermediate CA certificate of one scope.
    MtlsIntermediateCaCertificate,
    /// Issuer backed by the intermediate CA of one scope.
    MtlsIntermediateCaIssuer,
    /// Leaf certificate of one scope.
    MtlsCertificate,
    /// Client certificate the worker uses against the frontend.
    WorkerFrontendClientCertificate,
    /// UI workload.
    UiDeployment,
    /// UI endpoint.
    UiService,
    /// UI ingress.
    UiIngress,
    /// Client certificate the UI uses against the frontend.
    UiFrontendClientCertificate,
    /// Admin tools workload.
    AdminToolsDeployment,
    /// Client certificate admin tools use against the frontend.
    AdminToolsFrontendClientCertificate,
}

/// Feature a builder kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureArea {
    /// Always present.
    Core,
    /// Istio mesh integration.
    Mesh,
    /// Metrics scraping.
    Metrics,
    /// Dynamic configuration.
    DynamicConfig,
    /// cert-manager backed mTLS.
    Mtls,
    /// Web UI.
    Ui,
    /// Admin tools.
    AdminTools,
}

/// Certificate chain a certificate or issuer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertScope {
    /// Service to service traffic.
    Internode,
    /// Client to frontend traffic.
    Frontend,
}

impl CertScope {
    /// Returns the scope name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internode => "internode",
            Self::Frontend => "frontend",
        }
    }
}

impl fmt::Display for CertScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BuilderKind {
    /// Every kind, in catalog order.
    pub const ALL: [Self; 22] = [
        Self::ConfigMap,
        Self::FrontendService,
        Self::ServiceAccount,
        Self::Deployment,
        Self::HeadlessService,
        Self::PeerAuthentication,
        Self::DestinationRule,
        Self::ServiceMonitor,
        Self::DynamicConfigMap,
        Self::MtlsBootstrapIssuer,
        Self::MtlsRootCaCertificate,
        Self::MtlsRootCaIssuer,
        Self::MtlsIntermediateCaCertificate,
        Self::MtlsIntermediateCaIssuer,
        Self::MtlsCertificate,
        Self::WorkerFrontendClientCertificate,
        Self::UiDeployment,
        Self::UiService,
        Self::UiIngress,
        Self::UiFrontendClientCertificate,
        Self::AdminToolsDeployment,
        Self::AdminToolsFrontendClientCertificate,
    ];

    /// Returns the kebab-case kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigMap => "config-map",
            Self::FrontendService => "frontend-service",
            Self::ServiceAccount => "service-account",
            Self::Deployment => "deployment",
            Self::HeadlessService => "headless-service",
            Self::PeerAuthentication => "peer-authentication",
            Self::DestinationRule => "destination-rule",
            Self::ServiceMonitor => "service-monitor",
            Self::DynamicConfigMap => "dynamic-config-map",
            Self::MtlsBootstrapIssuer => "mtls-bootstrap-issuer",
            Self::MtlsRootCaCertificate => "mtls-root-ca-certificate",
            Self::MtlsRootCaIssuer => "mtls-root-ca-issuer",
            Self::MtlsIntermediateCaCertificate => "mtls-intermediate-ca-certificate",
            Self::MtlsIntermediateCaIssuer => "mtls-intermediate-ca-issuer",
            Self::MtlsCertificate => "mtls-certificate",
            Self::WorkerFrontendClientCertificate => "worker-frontend-client-certificate",
            Self::UiDeployment => "ui-deployment",
            Self::UiService => "ui-service",
            Self::UiIngress => "ui-ingress",
            Self::UiFrontendClientCertificate => "ui-frontend-client-certificate",
            Self::AdminToolsDeployment => "admintools-deployment",
            Self::AdminToolsFrontendClientCertificate => "admintools-frontend-client-certificate",
        }
    }

    /// Returns the cluster API kind rendered by this builder.
    #[must_use]
    pub const fn api_kind(self) -> &'static str {
        match self {
            Self::ConfigMap | Self::DynamicConfigMap => "ConfigMap",
            Self::FrontendService | Self::HeadlessService | Self::UiService => "Service",
            Self::ServiceAccount => "ServiceAccount",
            Self::Deployment | Self::UiDeployment | Self::AdminToolsDeployment => "Deployment",
            Self::PeerAuthentication => "PeerAuthentication",
            Self::DestinationRule => "DestinationRule",
            Self::ServiceMonitor => "ServiceMonitor",
            Self::MtlsBootstrapIssuer | Self::MtlsRootCaIssuer | Self::MtlsIntermediateCaIssuer => {
                "Issuer"
            }
            Self::MtlsRootCaCertificate
            | Self::MtlsIntermediateCaCertificate
            | Self::MtlsCertificate
            | Self::WorkerFrontendClientCertificate
            | Self::UiFrontendClientCertificate
            | Self::AdminToolsFrontendClientCertificate => "Certificate",
            Self::UiIngress => "Ingress",
        }
    }

    /// Returns the feature that owns this kind.
    #[must_use]
    pub const fn feature(self) -> FeatureArea {
        match self {
            Self::ConfigMap
            | Self::FrontendService
            | Self::ServiceAccount
            | Self::Deployment
            | Self::HeadlessService => FeatureArea::Core,
            Self::PeerAuthentication | Self::DestinationRule => FeatureArea::Mesh,
            Self::ServiceMonitor => FeatureArea::Metrics,
            Self::DynamicConfigMap => FeatureArea::DynamicConfig,
            Self::MtlsBootstrapIssuer
            | Self::MtlsRootCaCertificate
            | Self::MtlsRootCaIssuer
            | Self::MtlsIntermediateCaCertificate
            | Self::MtlsIntermediateCaIssuer
            | Self::MtlsCertificate
            | Self::WorkerFrontendClientCertificate => FeatureArea::Mtls,
            Self::UiDeployment
            | Self::UiService
            | Self::UiIngress
            | Self::UiFrontendClientCertificate => FeatureArea::Ui,
            Self::AdminToolsDeployment | Self::AdminToolsFrontendClientCertificate => {
                FeatureArea::AdminTools
            }
        }
    }

    /// True for kinds instantiated once per active service.
    #[must_use]
    pub const fn per_service(self) -> bool {
        matches!(
            self,
            Self::ServiceAccount
                | Self::Deployment
                | Self::HeadlessService
                | Self::PeerAuthentication
                | Self::DestinationRule
                | Self::ServiceMonitor
        )
    }

    /// True for kinds instantiated once per certificate scope.
    #[must_use]
    pub const fn scoped(self) -> bool {
        matches!(
            self,
            Self::MtlsIntermediateCaCertificate | Self::MtlsIntermediateCaIssuer | Self::MtlsCertificate
        )
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FeatureArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Core => "core",
            Self::Mesh => "mesh",
            Self::Metrics => "metrics",
            Self::DynamicConfig => "dynamic-config",
            Self::Mtls => "mtls",
            Self::Ui => "ui",
            Self::AdminTools => "admintools",
        };
        f.write_str(s)
    }
}

/// Identity of one desired or to-be-removed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BuilderInstance {
    /// Builder kind.
    pub kind: BuilderKind,
    /// Service the resource belongs to, for per-service kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceName>,
    /// Certificate chain, for scoped kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<CertScope>,
}

impl BuilderInstance {
    /// Creates a cluster-wide instance.
    #[must_use]
    pub const fn global(kind: BuilderKind) -> Self {
        Self {
            kind,
            service: None,
            scope: None,
        }
    }

    /// Creates an instance bound to a service.
    #[must_use]
    pub const fn for_service(kind: BuilderKind, service: ServiceName) -> Self {
        Self {
            kind,
            service: Some(service),
            scope: None,
        }
    }

    /// Creates an instance bound to a certificate scope.
    #[must_use]
    pub const fn scoped(kind: BuilderKind, scope: CertScope) -> Self {
        Self {
            kind,
            service: None,
            scope: Some(scope),
        }
    }

    /// Returns the object name this instance renders to for `cluster`.
    #[must_use]
    pub fn object_name(&self, cluster: &str) -> String {
        let service = self.service.map_or("", ServiceName::as_str);
        let scope = self.scope.map_or("", CertScope::as_str);
        match self.kind {
            BuilderKind::ConfigMap => format!("{cluster}-config"),
            BuilderKind::FrontendService => format!("{cluster}-frontend"),
            BuilderKind::ServiceAccount
            | BuilderKind::Deployment
            | BuilderKind::PeerAuthentication
            | BuilderKind::DestinationRule
            | BuilderKind::ServiceMonitor => format!("{cluster}-{service}"),
            BuilderKind::HeadlessService => format!("{cluster}-{service}-headless"),
            BuilderKind::DynamicConfigMap => format!("{cluster}-dynamic-config"),
            BuilderKind::MtlsBootstrapIssuer => format!("{cluster}-bootstrap-issuer"),
            BuilderKind::MtlsRootCaCertificate => format!("{cluster}-root-ca-certificate"),
            BuilderKind::MtlsRootCaIssuer => format!("{cluster}-root-ca-issuer"),
            BuilderKind::MtlsIntermediateCaCertificate => {
                format!("{cluster}-{scope}-intermediate-ca-certificate")
            }
            BuilderKind::MtlsIntermediateCaIssuer => format!("{cluster}-{scope}-intermediate-ca-issuer"),
            BuilderKind::MtlsCertificate => format!("{cluster}-{scope}-certificate"),
            BuilderKind::WorkerFrontendClientCertificate => {
                format!("{cluster}-worker-frontend-client-certificate")
            }
            BuilderKind::UiDeployment | BuilderKind::UiService | BuilderKind::UiIngress => {
                format!("{cluster}-ui")
            }
            BuilderKind::UiFrontendClientCertificate => format!("{cluster}-ui-client-certificate"),
            BuilderKind::AdminToolsDeployment => format!("{cluster}-admintools"),
            BuilderKind::AdminToolsFrontendClientCertificate => {
                format!("{cluster}-admintools-client-certificate")
            }
        }
    }
}

impl fmt::Display for BuilderInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(service) = self.service {
            write!(f, "/{service}")?;
        }
        if let Some(scope) = self.scope {
            write!(f, "[{scope}]")?;
        }
        Ok(())
    }
}
