//! Cluster specification types.
//!
//! This module defines the structs that map to a `temporal-cluster.yaml`
//! file. Every optional block is an `Option`: an absent block means the
//! feature is disabled, never that the specification is invalid.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PlanError;

/// The root declarative specification for one Temporal cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Cluster name, used as the prefix of every planned object name.
    pub name: String,
    /// Namespace the cluster resources live in.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Temporal server version.
    #[serde(default)]
    pub version: Option<String>,
    /// Service definitions. Base services left out of the list are added
    /// back with no overrides.
    #[serde(default = "default_services", deserialize_with = "deserialize_services")]
    pub services: Vec<ServiceDefinition>,
    /// Mutual TLS configuration.
    #[serde(default)]
    pub mtls: Option<MtlsSpec>,
    /// Metrics configuration.
    #[serde(default)]
    pub metrics: Option<MetricsSpec>,
    /// Dynamic configuration block.
    #[serde(default)]
    pub dynamic_config: Option<DynamicConfigSpec>,
    /// Web UI configuration.
    #[serde(default)]
    pub ui: Option<UiSpec>,
    /// Admin tools configuration.
    #[serde(default)]
    pub admin_tools: Option<AdminToolsSpec>,
}

/// The closed, ordered set of Temporal services.
///
/// Variant order is the iteration order used by every planner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceName {
    /// Public gRPC frontend.
    Frontend,
    /// History service.
    History,
    /// Matching service.
    Matching,
    /// Internal worker service.
    Worker,
    /// Frontend reserved for in-cluster traffic.
    InternalFrontend,
}

impl ServiceName {
    /// Services that are always part of a cluster.
    pub const BASE: [Self; 4] = [Self::Frontend, Self::History, Self::Matching, Self::Worker];

    /// Every known service, in enumeration order.
    pub const ALL: [Self; 5] = [
        Self::Frontend,
        Self::History,
        Self::Matching,
        Self::Worker,
        Self::InternalFrontend,
    ];

    /// Returns the canonical service name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::History => "history",
            Self::Matching => "matching",
            Self::Worker => "worker",
            Self::InternalFrontend => "internal-frontend",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| format!("Unknown service: {s}"))
    }
}

/// One logical service entry of the specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    /// Service name, one of [`ServiceName::ALL`].
    pub name: String,
    /// Explicit enable switch. Only consulted for `internal-frontend`.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Per-service overrides.
    #[serde(default)]
    pub overrides: Option<ServiceOverrides>,
}

/// Per-service overrides handed through to the resource builders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOverrides {
    /// Replica count.
    #[serde(default)]
    pub replicas: Option<u32>,
    /// gRPC port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Ringpop membership port.
    #[serde(default)]
    pub membership_port: Option<u16>,
    /// HTTP API port.
    #[serde(default)]
    pub http_port: Option<u16>,
}

/// Mutual TLS provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MtlsProvider {
    /// Certificates issued through cert-manager.
    #[default]
    CertManager,
    /// mTLS delegated to Istio sidecars.
    Istio,
    /// mTLS delegated to Linkerd proxies.
    Linkerd,
}

/// Mutual TLS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MtlsSpec {
    /// Provider in charge of mTLS.
    #[serde(default)]
    pub provider: MtlsProvider,
    /// Internode (service to service) traffic.
    #[serde(default)]
    pub internode: Option<MtlsScopeSpec>,
    /// Frontend (client to frontend) traffic.
    #[serde(default)]
    pub frontend: Option<MtlsScopeSpec>,
    /// Certificate lifetimes.
    #[serde(default)]
    pub certificates_duration: Option<CertificatesDuration>,
}

/// Enable switch for one mTLS scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MtlsScopeSpec {
    /// Whether the scope is enabled.
    #[serde(default)]
    pub enabled: bool,
}

/// Lifetimes of the generated certificates, as duration strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificatesDuration {
    /// Root CA certificate lifetime.
    #[serde(default)]
    pub root_ca_certificate: Option<String>,
    /// Intermediate CA certificates lifetime.
    #[serde(default)]
    pub intermediate_ca_certificates: Option<String>,
    /// Client certificates lifetime.
    #[serde(default)]
    pub client_certificates: Option<String>,
    /// Leaf certificates lifetime.
    #[serde(default)]
    pub internode_certificate: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSpec {
    /// Whether metrics are exposed.
    #[serde(default)]
    pub enabled: bool,
    /// Scrape configuration.
    #[serde(default)]
    pub scrape_config: Option<ScrapeConfig>,
}

/// How metrics get scraped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeConfig {
    /// Annotate pods for annotation-based discovery.
    #[serde(default)]
    pub annotations: bool,
    /// Service monitor configuration.
    #[serde(default)]
    pub service_monitor: Option<ServiceMonitorSpec>,
}

/// Service monitor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMonitorSpec {
    /// Whether service monitors are created.
    #[serde(default)]
    pub enabled: bool,
    /// Extra labels set on every service monitor.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Dynamic configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynamicConfigSpec {
    /// Poll interval, as a duration string.
    #[serde(default)]
    pub poll_interval: Option<String>,
    /// Dynamic configuration values keyed by setting name.
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
}

/// Web UI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UiSpec {
    /// Whether the UI is deployed.
    #[serde(default)]
    pub enabled: bool,
    /// UI version.
    #[serde(default)]
    pub version: Option<String>,
    /// UI image.
    #[serde(default)]
    pub image: Option<String>,
    /// Ingress exposure.
    #[serde(default)]
    pub ingress: Option<UiIngressSpec>,
}

/// UI ingress configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UiIngressSpec {
    /// Hosts routed to the UI.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Ingress annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// TLS secret name.
    #[serde(default)]
    pub tls_secret: Option<String>,
}

/// Admin tools configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminToolsSpec {
    /// Whether admin tools are deployed.
    #[serde(default)]
    pub enabled: bool,
    /// Admin tools image.
    #[serde(default)]
    pub image: Option<String>,
}

// Default value functions

fn default_namespace() -> String {
    String::from("default")
}

fn default_services() -> Vec<ServiceDefinition> {
    ServiceName::BASE
        .into_iter()
        .map(ServiceDefinition::new)
        .collect()
}

fn deserialize_services<'de, D>(deserializer: D) -> Result<Vec<ServiceDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut services = Vec::<ServiceDefinition>::deserialize(deserializer)?;
    for base in ServiceName::BASE {
        if !services.iter().any(|d| d.name == base.as_str()) {
            services.push(ServiceDefinition::new(base));
        }
    }
    Ok(services)
}

impl ServiceDefinition {
    /// Creates a definition with no overrides.
    #[must_use]
    pub fn new(name: ServiceName) -> Self {
        Self {
            name: name.as_str().to_string(),
            enabled: None,
            overrides: None,
        }
    }

    /// Marks the definition as explicitly enabled.
    #[must_use]
    pub fn explicitly_enabled(mut self) -> Self {
        self.enabled = Some(true);
        self
    }
}

impl ClusterSpec {
    /// Creates a specification with the base services and every optional
    /// block absent.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: default_namespace(),
            version: None,
            services: default_services(),
            mtls: None,
            metrics: None,
            dynamic_config: None,
            ui: None,
            admin_tools: None,
        }
    }

    /// Returns the definition for `service`, if any.
    #[must_use]
    pub fn service_definition(&self, service: ServiceName) -> Option<&ServiceDefinition> {
        self.services.iter().find(|d| d.name == service.as_str())
    }

    /// Resolves the definition of a service that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ServiceLookup`] when the specification has no
    /// definition for `service`.
    pub fn resolve_service(&self, service: ServiceName) -> Result<&ServiceDefinition, PlanError> {
        self.service_definition(service)
            .ok_or_else(|| PlanError::service_lookup(service.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_parse() {
        assert_eq!("internal-frontend".parse::<ServiceName>(), Ok(ServiceName::InternalFrontend));
        assert_eq!("history".parse::<ServiceName>(), Ok(ServiceName::History));
        assert!("web".parse::<ServiceName>().is_err());
    }

    #[test]
    fn test_service_name_order() {
        let mut shuffled = vec![ServiceName::Worker, ServiceName::Frontend, ServiceName::Matching];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![ServiceName::Frontend, ServiceName::Matching, ServiceName::Worker]
        );
    }

    #[test]
    fn test_resolve_missing_service() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.retain(|d| d.name != "matching");

        assert!(spec.resolve_service(ServiceName::Frontend).is_ok());
        assert!(matches!(
            spec.resolve_service(ServiceName::Matching),
            Err(PlanError::ServiceLookup { service }) if service == "matching"
        ));
    }
}
