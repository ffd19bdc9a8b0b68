//! Ordered rule tables driving both planners.
//!
//! Each [`Rule`] pairs a predicate over [`FeatureFlags`] with the builder
//! kinds it emits. Tables are evaluated top to bottom and every rule emits
//! its kinds in the listed order, which is the creation order the
//! reconciler relies on.

use crate::config::ServiceName;

use super::catalog::{BuilderInstance, BuilderKind, CertScope};
use super::features::FeatureFlags;

/// One builder kind emitted by a rule, with its certificate scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emit {
    /// Kind to emit.
    pub kind: BuilderKind,
    /// Certificate scope, for scoped kinds.
    pub scope: Option<CertScope>,
}

/// A predicate and the kinds it emits when it holds.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Rule name, for diagnostics.
    pub name: &'static str,
    /// Predicate deciding whether the rule fires.
    pub when: fn(&FeatureFlags) -> bool,
    /// Kinds emitted, in order.
    pub emits: &'static [Emit],
}

impl Emit {
    const fn kind(kind: BuilderKind) -> Self {
        Self { kind, scope: None }
    }

    const fn scoped(kind: BuilderKind, scope: CertScope) -> Self {
        Self {
            kind,
            scope: Some(scope),
        }
    }
}

impl Rule {
    /// Returns true if the rule fires for `flags`.
    #[must_use]
    pub fn applies(&self, flags: &FeatureFlags) -> bool {
        (self.when)(flags)
    }

    /// Builds the instances this rule emits, bound to `service` if given.
    #[must_use]
    pub fn instances(&self, service: Option<ServiceName>) -> Vec<BuilderInstance> {
        self.emits
            .iter()
            .map(|emit| BuilderInstance {
                kind: emit.kind,
                service,
                scope: emit.scope,
            })
            .collect()
    }
}

/// Evaluates cluster-wide `rules` against `flags`, appending to `out`.
pub fn apply_global(rules: &[Rule], flags: &FeatureFlags, out: &mut Vec<BuilderInstance>) {
    for rule in rules.iter().filter(|r| r.applies(flags)) {
        out.extend(rule.instances(None));
    }
}

const fn always(_: &FeatureFlags) -> bool {
    true
}

const fn mesh_mtls(flags: &FeatureFlags) -> bool {
    flags.mesh_mtls
}

const fn service_monitor(flags: &FeatureFlags) -> bool {
    flags.service_monitor
}

const fn dynamic_config(flags: &FeatureFlags) -> bool {
    flags.dynamic_config
}

const fn cert_authority_mtls(flags: &FeatureFlags) -> bool {
    flags.cert_authority_mtls
}

const fn internode_mtls(flags: &FeatureFlags) -> bool {
    flags.cert_authority_mtls && flags.internode_mtls
}

const fn frontend_mtls(flags: &FeatureFlags) -> bool {
    flags.cert_authority_mtls && flags.frontend_mtls
}

// With internal-frontend the worker reaches the in-cluster frontend and
// needs no frontend client certificate.
const fn worker_frontend_client(flags: &FeatureFlags) -> bool {
    frontend_mtls(flags) && !flags.internal_frontend
}

const fn ui(flags: &FeatureFlags) -> bool {
    flags.ui
}

const fn ui_ingress(flags: &FeatureFlags) -> bool {
    flags.ui && flags.ui_ingress
}

const fn ui_client(flags: &FeatureFlags) -> bool {
    flags.ui && flags.frontend_client_certificates()
}

const fn admin_tools(flags: &FeatureFlags) -> bool {
    flags.admin_tools
}

const fn admin_tools_client(flags: &FeatureFlags) -> bool {
    flags.admin_tools && flags.frontend_client_certificates()
}

const fn ui_disabled(flags: &FeatureFlags) -> bool {
    !flags.ui
}

const fn admin_tools_disabled(flags: &FeatureFlags) -> bool {
    !flags.admin_tools
}

/// Rules evaluated once, before the per-service rules.
pub const PRELUDE_RULES: &[Rule] = &[Rule {
    name: "shared-configuration",
    when: always,
    emits: &[
        Emit::kind(BuilderKind::ConfigMap),
        Emit::kind(BuilderKind::FrontendService),
    ],
}];

/// Rules evaluated for every active service, in service order.
pub const PER_SERVICE_RULES: &[Rule] = &[
    Rule {
        name: "service-core",
        when: always,
        emits: &[
            Emit::kind(BuilderKind::ServiceAccount),
            Emit::kind(BuilderKind::Deployment),
            Emit::kind(BuilderKind::HeadlessService),
        ],
    },
    Rule {
        name: "mesh-mtls",
        when: mesh_mtls,
        emits: &[
            Emit::kind(BuilderKind::PeerAuthentication),
            Emit::kind(BuilderKind::DestinationRule),
        ],
    },
    Rule {
        name: "service-monitor",
        when: service_monitor,
        emits: &[Emit::kind(BuilderKind::ServiceMonitor)],
    },
];

/// Rules evaluated once, after the per-service rules.
pub const TRAILER_RULES: &[Rule] = &[
    Rule {
        name: "dynamic-config",
        when: dynamic_config,
        emits: &[Emit::kind(BuilderKind::DynamicConfigMap)],
    },
    Rule {
        name: "mtls-root-chain",
        when: cert_authority_mtls,
        emits: &[
            Emit::kind(BuilderKind::MtlsBootstrapIssuer),
            Emit::kind(BuilderKind::MtlsRootCaCertificate),
            Emit::kind(BuilderKind::MtlsRootCaIssuer),
        ],
    },
    Rule {
        name: "mtls-internode-chain",
        when: internode_mtls,
        emits: &[
            Emit::scoped(BuilderKind::MtlsIntermediateCaCertificate, CertScope::Internode),
            Emit::scoped(BuilderKind::MtlsIntermediateCaIssuer, CertScope::Internode),
            Emit::scoped(BuilderKind::MtlsCertificate, CertScope::Internode),
        ],
    },
    Rule {
        name: "mtls-frontend-chain",
        when: frontend_mtls,
        emits: &[
            Emit::scoped(BuilderKind::MtlsIntermediateCaCertificate, CertScope::Frontend),
            Emit::scoped(BuilderKind::MtlsIntermediateCaIssuer, CertScope::Frontend),
            Emit::scoped(BuilderKind::MtlsCertificate, CertScope::Frontend),
        ],
    },
    Rule {
        name: "worker-frontend-client-certificate",
        when: worker_frontend_client,
        emits: &[Emit::scoped(
            BuilderKind::WorkerFrontendClientCertificate,
            CertScope::Frontend,
        )],
    },
    Rule {
        name: "ui",
        when: ui,
        emits: &[
            Emit::kind(BuilderKind::UiDeployment),
            Emit::kind(BuilderKind::UiService),
        ],
    },
    Rule {
        name: "ui-ingress",
        when: ui_ingress,
        emits: &[Emit::kind(BuilderKind::UiIngress)],
    },
    Rule {
        name: "ui-frontend-client-certificate",
        when: ui_client,
        emits: &[Emit::scoped(
            BuilderKind::UiFrontendClientCertificate,
            CertScope::Frontend,
        )],
    },
    Rule {
        name: "admintools",
        when: admin_tools,
        emits: &[Emit::kind(BuilderKind::AdminToolsDeployment)],
    },
    Rule {
        name: "admintools-frontend-client-certificate",
        when: admin_tools_client,
        emits: &[Emit::scoped(
            BuilderKind::AdminToolsFrontendClientCertificate,
            CertScope::Frontend,
        )],
    },
];

/// Rules selecting resources to delete because their feature is off.
///
/// Certificate and mesh resources are deliberately absent: disabling those
/// features leaves their material in place.
pub const PRUNE_RULES: &[Rule] = &[
    Rule {
        name: "ui-disabled",
        when: ui_disabled,
        emits: &[
            Emit::kind(BuilderKind::UiDeployment),
            Emit::kind(BuilderKind::UiService),
            Emit::kind(BuilderKind::UiIngress),
        ],
    },
    Rule {
        name: "admintools-disabled",
        when: admin_tools_disabled,
        emits: &[Emit::kind(BuilderKind::AdminToolsDeployment)],
    },
];
