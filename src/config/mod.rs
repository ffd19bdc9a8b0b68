//! Specification module for the resource-set planner.
//!
//! This module handles all specification-related functionality:
//! - Parsing and deserializing `temporal-cluster.yaml`
//! - Validation of specification values
//! - Computing specification hashes for change detection

mod spec;
mod parser;
mod validator;
mod hash;

pub use spec::{
    AdminToolsSpec, CertificatesDuration, ClusterSpec, DynamicConfigSpec, MetricsSpec,
    MtlsProvider, MtlsScopeSpec, MtlsSpec, ScrapeConfig, ServiceDefinition, ServiceMonitorSpec,
    ServiceName, ServiceOverrides, UiIngressSpec, UiSpec,
};
pub use parser::{ConfigParser, DEFAULT_SPEC_FILES, find_spec_file};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
pub use hash::ConfigHasher;
