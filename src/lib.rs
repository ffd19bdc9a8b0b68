// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Temporal Resourceset
//!
//! A deterministic planner for the Kubernetes resources of a Temporal cluster.
//!
//! ## Overview
//!
//! Given one snapshot of a `TemporalCluster` specification, the planner
//! decides which resource builders must run to create or update the cluster
//! and which builders own objects that must be deleted:
//!
//! - Derive feature flags (mesh mTLS, cert-manager mTLS, UI, admin tools...)
//! - Emit per-service core resources for every active Temporal service
//! - Emit the certificate chains, UI and admin tools resources in a fixed order
//! - Emit prune entries for features that were turned off
//!
//! ## Architecture
//!
//! Planning is a pure function of the specification:
//!
//! 1. **Specification**: Defined in `temporal-cluster.yaml`
//! 2. **Feature flags**: Derived once per pass from the specification
//! 3. **Rules**: Declarative tables mapping flags to builder instances
//!
//! ## Modules
//!
//! - [`config`]: Specification parsing, validation and hashing
//! - [`planner`]: Feature flags, builder catalog and planners
//! - [`builder`]: Resource builder trait and registry
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! name: prod
//! namespace: temporal
//! version: 1.24.2
//! mtls:
//!   provider: cert-manager
//!   internode:
//!     enabled: true
//! ui:
//!   enabled: true
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod planner;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{BuilderRegistry, RenderedResource, ResourceBuilder};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ClusterSpec, ConfigHasher, ConfigParser, ConfigValidator, ServiceName};
pub use error::{ResourceSetError, Result};
pub use planner::{
    BuilderInstance, BuilderKind, FeatureFlags, PlanDiff, PlanResult, Planner, PrunePlanner,
    ResourceSetPlanner,
};
