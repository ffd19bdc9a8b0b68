//! Specification validation.
//!
//! This module checks a cluster specification for inconsistencies before it
//! is planned. Feature blocks that are present but ineffective are reported
//! as warnings; they never fail validation because the planner treats them
//! as disabled.

use crate::error::{ConfigError, ResourceSetError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::planner::{
    frontend_mtls_enabled, internal_frontend_enabled, internode_mtls_enabled,
    service_monitor_enabled, service_monitor_requested,
};

use super::spec::{ClusterSpec, MtlsProvider, ServiceName};

/// Maximum length of a DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Longest suffix appended to the cluster name for a `Service` object.
const LONGEST_SERVICE_SUFFIX: &str = "-internal-frontend-headless";

/// Validator for cluster specifications.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a cluster specification.
    ///
    /// # Errors
    ///
    /// Returns the first error found. Unknown, duplicated or missing base
    /// service names are reported with their dedicated error variants.
    pub fn validate(&self, spec: &ClusterSpec) -> Result<ValidationResult> {
        Self::check_service_names(spec)?;

        let mut result = ValidationResult::default();

        Self::validate_identity(spec, &mut result);
        Self::validate_services(spec, &mut result);
        Self::validate_mtls(spec, &mut result);
        Self::validate_metrics(spec, &mut result);
        Self::validate_ui(spec, &mut result);

        for warning in &result.warnings {
            warn!("{warning}");
        }

        if result.errors.is_empty() {
            debug!("Specification validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(ResourceSetError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }

    /// Rejects service definitions outside the known set, defined twice, or
    /// base services left without a definition.
    fn check_service_names(spec: &ClusterSpec) -> std::result::Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for definition in &spec.services {
            let name: ServiceName =
                definition.name.parse().map_err(|_| ConfigError::UnknownService {
                    name: definition.name.clone(),
                })?;
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateService {
                    name: definition.name.clone(),
                });
            }
        }

        let missing: Vec<String> = ServiceName::BASE
            .into_iter()
            .filter(|s| !seen.contains(s))
            .map(|s| s.as_str().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingServices { names: missing });
        }
        Ok(())
    }

    /// Validates the cluster name and namespace.
    fn validate_identity(spec: &ClusterSpec, result: &mut ValidationResult) {
        if spec.name.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: String::from("Cluster name cannot be empty"),
            });
        } else if !is_valid_name(&spec.name) {
            result.errors.push(ValidationError {
                field: String::from("name"),
                message: format!(
                    "Cluster name '{}' is invalid. Must be a lowercase DNS label of at most {MAX_LABEL_LEN} characters.",
                    spec.name
                ),
            });
        } else if spec.name.len() + LONGEST_SERVICE_SUFFIX.len() > MAX_LABEL_LEN {
            result.warnings.push(format!(
                "name: Cluster name '{}' is long; some service object names will exceed {MAX_LABEL_LEN} characters",
                spec.name
            ));
        }

        if !is_valid_name(&spec.namespace) {
            result.errors.push(ValidationError {
                field: String::from("namespace"),
                message: format!("Namespace '{}' is not a valid DNS label", spec.namespace),
            });
        }
    }

    /// Validates service definitions.
    fn validate_services(spec: &ClusterSpec, result: &mut ValidationResult) {
        for (i, definition) in spec.services.iter().enumerate() {
            let prefix = format!("services[{i}]");

            let is_internal = definition.name == ServiceName::InternalFrontend.as_str();
            if !is_internal && definition.enabled.is_some() {
                result.warnings.push(format!(
                    "{prefix}.enabled: '{}' is always deployed; the enabled flag is ignored",
                    definition.name
                ));
            }

            if let Some(overrides) = &definition.overrides {
                if overrides.replicas == Some(0) {
                    result.errors.push(ValidationError {
                        field: format!("{prefix}.overrides.replicas"),
                        message: format!("Service '{}' needs at least one replica", definition.name),
                    });
                }
                if overrides.port.is_some() && overrides.port == overrides.membership_port {
                    result.errors.push(ValidationError {
                        field: format!("{prefix}.overrides.membershipPort"),
                        message: format!(
                            "Service '{}' uses the same port for gRPC and membership",
                            definition.name
                        ),
                    });
                }
            }
        }

        if internal_frontend_enabled(spec) && !frontend_mtls_enabled(spec) {
            result.warnings.push(String::from(
                "services: internal-frontend is enabled but frontend mTLS is not; workers gain no client certificate change",
            ));
        }
    }

    /// Validates mTLS configuration.
    fn validate_mtls(spec: &ClusterSpec, result: &mut ValidationResult) {
        let Some(mtls) = &spec.mtls else {
            return;
        };

        match mtls.provider {
            MtlsProvider::CertManager => {
                if !internode_mtls_enabled(spec) && !frontend_mtls_enabled(spec) {
                    result.warnings.push(String::from(
                        "mtls: cert-manager provider selected but neither internode nor frontend is enabled",
                    ));
                }
            }
            MtlsProvider::Istio | MtlsProvider::Linkerd => {
                if mtls.internode.is_some() || mtls.frontend.is_some() {
                    result.warnings.push(String::from(
                        "mtls: internode and frontend scopes only apply to the cert-manager provider",
                    ));
                }
                if mtls.certificates_duration.is_some() {
                    result.warnings.push(String::from(
                        "mtls.certificatesDuration: only applies to the cert-manager provider",
                    ));
                }
            }
        }
    }

    /// Validates metrics configuration.
    fn validate_metrics(spec: &ClusterSpec, result: &mut ValidationResult) {
        if service_monitor_requested(spec) && !service_monitor_enabled(spec) {
            result.warnings.push(String::from(
                "metrics.scrapeConfig.serviceMonitor: enabled but metrics are disabled",
            ));
        }
    }

    /// Validates UI configuration.
    fn validate_ui(spec: &ClusterSpec, result: &mut ValidationResult) {
        let Some(ui) = &spec.ui else {
            return;
        };

        if let Some(ingress) = &ui.ingress {
            if !ui.enabled {
                result.warnings.push(String::from("ui.ingress: configured but the UI is disabled"));
            }
            if ingress.hosts.is_empty() {
                result.errors.push(ValidationError {
                    field: String::from("ui.ingress.hosts"),
                    message: String::from("UI ingress requires at least one host"),
                });
            }
        }
    }
}

/// Validates that a name is a lowercase DNS label.
/// Names must be lowercase alphanumeric with hyphens, starting with a letter.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_LABEL_LEN {
        return false;
    }

    let mut chars = name.chars();

    // First character must be a letter
    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }

    // Rest must be lowercase alphanumeric or hyphen
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return false;
    }

    !name.ends_with('-')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        MetricsSpec, MtlsScopeSpec, MtlsSpec, ScrapeConfig, ServiceDefinition, ServiceMonitorSpec,
        ServiceOverrides, UiIngressSpec, UiSpec,
    };

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("prod"));
        assert!(is_valid_name("temporal-prod-1"));
        assert!(is_valid_name("a"));
    }

    #[test]
    fn test_invalid_name() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Prod")); // uppercase
        assert!(!is_valid_name("1-prod")); // starts with number
        assert!(!is_valid_name("prod_1")); // underscore
        assert!(!is_valid_name("prod-")); // ends with hyphen
        assert!(!is_valid_name(&"a".repeat(64)));
    }

    #[test]
    fn test_default_spec_is_valid() {
        let result = ConfigValidator::new().validate(&ClusterSpec::new("prod")).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_unknown_service_rejected() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.push(ServiceDefinition {
            name: String::from("web"),
            enabled: None,
            overrides: None,
        });
        let err = ConfigValidator::new().validate(&spec).unwrap_err();
        assert!(matches!(
            err,
            ResourceSetError::Config(ConfigError::UnknownService { name }) if name == "web"
        ));
    }

    #[test]
    fn test_duplicate_service_rejected() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.push(ServiceDefinition::new(ServiceName::History));
        let err = ConfigValidator::new().validate(&spec).unwrap_err();
        assert!(matches!(
            err,
            ResourceSetError::Config(ConfigError::DuplicateService { name }) if name == "history"
        ));
    }

    #[test]
    fn test_missing_base_services_rejected() {
        let mut spec = ClusterSpec::new("prod");
        spec.services.retain(|d| d.name == "history" || d.name == "worker");
        let err = ConfigValidator::new().validate(&spec).unwrap_err();
        assert!(matches!(
            err,
            ResourceSetError::Config(ConfigError::MissingServices { names })
                if names == ["frontend", "matching"]
        ));
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let mut spec = ClusterSpec::new("prod");
        spec.services[1].overrides = Some(ServiceOverrides {
            replicas: Some(0),
            ..ServiceOverrides::default()
        });
        let err = ConfigValidator::new().validate(&spec).unwrap_err();
        assert!(matches!(
            err,
            ResourceSetError::Config(ConfigError::ValidationError { field: Some(field), .. })
                if field == "services[1].overrides.replicas"
        ));
    }

    #[test]
    fn test_ineffective_blocks_warn() {
        let mut spec = ClusterSpec::new("prod");
        spec.services[0].enabled = Some(false);
        spec.mtls = Some(MtlsSpec {
            provider: MtlsProvider::Istio,
            internode: Some(MtlsScopeSpec { enabled: true }),
            ..MtlsSpec::default()
        });
        spec.metrics = Some(MetricsSpec {
            enabled: false,
            scrape_config: Some(ScrapeConfig {
                annotations: false,
                service_monitor: Some(ServiceMonitorSpec {
                    enabled: true,
                    ..ServiceMonitorSpec::default()
                }),
            }),
        });
        spec.ui = Some(UiSpec {
            enabled: false,
            ingress: Some(UiIngressSpec {
                hosts: vec![String::from("temporal.example.com")],
                ..UiIngressSpec::default()
            }),
            ..UiSpec::default()
        });

        let result = ConfigValidator::new().validate(&spec).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 4);
    }

    #[test]
    fn test_cert_manager_without_scopes_warns() {
        let mut spec = ClusterSpec::new("prod");
        spec.mtls = Some(MtlsSpec::default());
        let result = ConfigValidator::new().validate(&spec).unwrap();
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_internal_frontend_without_frontend_mtls_warns() {
        let mut spec = ClusterSpec::new("prod");
        let internal = ServiceDefinition::new(ServiceName::InternalFrontend).explicitly_enabled();
        spec.services.push(internal);
        let result = ConfigValidator::new().validate(&spec).unwrap();
        assert_eq!(result.warning_count(), 1);

        spec.mtls = Some(MtlsSpec {
            frontend: Some(MtlsScopeSpec { enabled: true }),
            ..MtlsSpec::default()
        });
        let result = ConfigValidator::new().validate(&spec).unwrap();
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_ingress_without_hosts_rejected() {
        let mut spec = ClusterSpec::new("prod");
        spec.ui = Some(UiSpec {
            enabled: true,
            ingress: Some(UiIngressSpec::default()),
            ..UiSpec::default()
        });
        assert!(ConfigValidator::new().validate(&spec).is_err());
    }
}
