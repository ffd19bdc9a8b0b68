//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! plans, diffs and the builder catalog in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::{ClusterSpec, ValidationResult};
use crate::planner::{BuilderInstance, BuilderKind, DiffType, PlanDiff, PlanResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Plan instance row for table display.
#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Builder")]
    builder: String,
    #[tabled(rename = "Feature")]
    feature: String,
}

/// Detailed plan instance row for table display.
#[derive(Tabled)]
struct DetailedInstanceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Builder")]
    builder: String,
    #[tabled(rename = "Kind")]
    api_kind: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// Catalog row for table display.
#[derive(Tabled, Serialize)]
struct CatalogRow {
    #[tabled(rename = "Builder")]
    builder: String,
    #[tabled(rename = "Kind")]
    api_kind: String,
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Per service")]
    per_service: bool,
    #[tabled(rename = "Scoped")]
    scoped: bool,
}

/// JSON form of a plan.
#[derive(Serialize)]
struct PlanJson<'a> {
    cluster: &'a str,
    namespace: &'a str,
    config_hash: &'a str,
    fingerprint: String,
    to_create: Vec<InstanceJson>,
    to_prune: Vec<InstanceJson>,
}

/// JSON form of one planned instance.
#[derive(Serialize)]
struct InstanceJson {
    #[serde(flatten)]
    instance: BuilderInstance,
    api_kind: &'static str,
    name: String,
}

impl InstanceJson {
    fn new(instance: &BuilderInstance, cluster: &str) -> Self {
        Self {
            instance: *instance,
            api_kind: instance.kind.api_kind(),
            name: instance.object_name(cluster),
        }
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a plan for display.
    #[must_use]
    pub fn format_plan(
        &self,
        spec: &ClusterSpec,
        plan: &PlanResult,
        config_hash: &str,
        detailed: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = PlanJson {
                    cluster: &spec.name,
                    namespace: &spec.namespace,
                    config_hash,
                    fingerprint: plan.fingerprint(),
                    to_create: plan.to_create.iter().map(|i| InstanceJson::new(i, &spec.name)).collect(),
                    to_prune: plan.to_prune.iter().map(|i| InstanceJson::new(i, &spec.name)).collect(),
                };
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_plan_text(spec, plan, config_hash, detailed),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(
        spec: &ClusterSpec,
        plan: &PlanResult,
        config_hash: &str,
        detailed: bool,
    ) -> String {
        let mut output = String::new();

        let _ = write!(output, "\nResource Plan for {}/{}\n", spec.namespace, spec.name);
        let _ = write!(
            output,
            "   Spec hash: {}  Plan fingerprint: {}\n\n",
            config_hash.chars().take(8).collect::<String>(),
            plan.fingerprint().chars().take(8).collect::<String>()
        );

        let actions = plan
            .to_create
            .iter()
            .map(|i| ("create", i))
            .chain(plan.to_prune.iter().map(|i| ("prune", i)));

        let table = if detailed {
            let rows: Vec<DetailedInstanceRow> = actions
                .enumerate()
                .map(|(i, (action, instance))| DetailedInstanceRow {
                    index: i + 1,
                    action: Self::format_action(action),
                    builder: instance.to_string(),
                    api_kind: instance.kind.api_kind().to_string(),
                    name: instance.object_name(&spec.name),
                })
                .collect();
            Table::new(rows).to_string()
        } else {
            let rows: Vec<InstanceRow> = actions
                .enumerate()
                .map(|(i, (action, instance))| InstanceRow {
                    index: i + 1,
                    action: Self::format_action(action),
                    builder: instance.to_string(),
                    feature: instance.kind.feature().to_string(),
                })
                .collect();
            Table::new(rows).to_string()
        };
        output.push_str(&table);
        output.push('\n');

        let _ = write!(
            output,
            "\nPlan: {} to create, {} to prune\n",
            plan.create_count().to_string().green(),
            plan.prune_count().to_string().red()
        );

        output
    }

    /// Formats a validation result for display.
    #[must_use]
    pub fn format_validation(
        &self,
        spec: &ClusterSpec,
        result: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "cluster": spec.name,
                "warnings": result.warnings,
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!("{} Specification is valid!\n", "✓".green());
                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }
                let _ = write!(
                    output,
                    "\nSpecification summary:\n  Cluster: {}\n  Namespace: {}\n  Services defined: {}\n",
                    spec.name,
                    spec.namespace,
                    spec.services.len()
                );
                output
            }
        }
    }

    /// Formats a plan diff for display.
    #[must_use]
    pub fn format_diff(&self, diff: &PlanDiff) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(diff).unwrap_or_default(),
            OutputFormat::Text => {
                if diff.is_empty() {
                    return format!(
                        "{} No changes - both specifications plan the same resources.\n",
                        "✓".green()
                    );
                }

                let mut output = String::from("\nPlan changes:\n");
                for change in &diff.diffs {
                    let marker = match change.diff_type {
                        DiffType::Added => "+".green(),
                        DiffType::Removed => "-".red(),
                        DiffType::NowPruned => "x".red(),
                        DiffType::NoLongerPruned => "~".yellow(),
                    };
                    let _ = writeln!(output, "  {marker} {change}");
                }
                let _ = write!(
                    output,
                    "\n{} added, {} removed, {} newly pruned, {} no longer pruned\n",
                    diff.count(DiffType::Added),
                    diff.count(DiffType::Removed),
                    diff.count(DiffType::NowPruned),
                    diff.count(DiffType::NoLongerPruned)
                );
                output
            }
        }
    }

    /// Formats the builder catalog for display.
    #[must_use]
    pub fn format_catalog(&self) -> String {
        let rows: Vec<CatalogRow> = BuilderKind::ALL
            .iter()
            .map(|kind| CatalogRow {
                builder: kind.to_string(),
                api_kind: kind.api_kind().to_string(),
                feature: kind.feature().to_string(),
                per_service: kind.per_service(),
                scoped: kind.scoped(),
            })
            .collect();

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&rows).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats an action name with color.
    fn format_action(action: &str) -> String {
        match action {
            "create" => action.green().to_string(),
            "prune" => action.red().to_string(),
            _ => action.to_string(),
        }
    }
}
