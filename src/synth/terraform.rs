//! Terraform HCL rendering
//!
//! Each automatable recommendation maps to plain Terraform blocks:
//! - resize: `import` + `resource` carrying only the changed attribute
//! - deletion: `removed` with `lifecycle { destroy = true }`
//! - S3 transitions: `aws_s3_bucket_lifecycle_configuration`
//!
//! Advisory recommendations become comment blocks.

use crate::recommend::detectors::right_sizing::parse_memory_mb;
use crate::recommend::detectors::storage_tiering::{GLACIER_CLASS, GP3_VOLUME_TYPE, INTELLIGENT_TIERING_CLASS};
use crate::recommend::{ActionKind, AffectedResource, Recommendation};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt::{self, Write};

/// Days before objects transition to Glacier
pub const GLACIER_TRANSITION_DAYS: u32 = 90;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Int(u32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", escape(s)),
            Value::Int(n) => write!(f, "{}", n),
        }
    }
}

/// One block group for one resource
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    Resize {
        resource_type: &'static str,
        import_id: String,
        attributes: Vec<(&'static str, Value)>,
    },
    Remove {
        resource_type: &'static str,
        resource_id: String,
    },
    Lifecycle {
        bucket: String,
        rule_id: &'static str,
        storage_class: String,
        days: u32,
    },
}

impl Directive {
    fn label_source(&self) -> &str {
        match self {
            Directive::Resize { import_id, .. } => import_id,
            Directive::Remove { resource_id, .. } => resource_id,
            Directive::Lifecycle { bucket, .. } => bucket,
        }
    }

    fn resource_type(&self) -> &'static str {
        match self {
            Directive::Resize { resource_type, .. } | Directive::Remove { resource_type, .. } => {
                resource_type
            }
            Directive::Lifecycle { .. } => "aws_s3_bucket_lifecycle_configuration",
        }
    }
}

fn instance_resource(service: &str) -> Option<(&'static str, &'static str)> {
    if service.eq_ignore_ascii_case("EC2") {
        Some(("aws_instance", "instance_type"))
    } else if service.eq_ignore_ascii_case("RDS") {
        Some(("aws_db_instance", "instance_class"))
    } else {
        None
    }
}

/// Block group for one resource
///
/// Every directive targets an existing resource, so a resource without an
/// id yields `None` and its recommendation stays advisory.
fn directive_for(kind: ActionKind, resource: &AffectedResource) -> Option<Directive> {
    let id = resource.resource_id.clone();
    match kind {
        ActionKind::Downsize => {
            let (resource_type, attribute) = instance_resource(&resource.service)?;
            let target = resource.target_type.clone()?;
            Some(Directive::Resize {
                resource_type,
                import_id: id?,
                attributes: vec![(attribute, Value::Str(target))],
            })
        }
        ActionKind::ReduceMemory => {
            let memory = resource.target_type.as_deref().and_then(parse_memory_mb)?;
            let name = id?;
            Some(Directive::Resize {
                resource_type: "aws_lambda_function",
                attributes: vec![
                    ("function_name", Value::Str(name.clone())),
                    ("memory_size", Value::Int(memory)),
                ],
                import_id: name,
            })
        }
        ActionKind::MigrateVolumeType => {
            let target = resource
                .target_type
                .clone()
                .unwrap_or_else(|| GP3_VOLUME_TYPE.to_string());
            Some(Directive::Resize {
                resource_type: "aws_ebs_volume",
                import_id: id?,
                attributes: vec![("type", Value::Str(target))],
            })
        }
        ActionKind::Terminate => Some(Directive::Remove {
            resource_type: "aws_instance",
            resource_id: id?,
        }),
        ActionKind::DeleteVolume => Some(Directive::Remove {
            resource_type: "aws_ebs_volume",
            resource_id: id?,
        }),
        ActionKind::ArchiveToGlacier => Some(Directive::Lifecycle {
            bucket: id?,
            rule_id: "archive-to-glacier",
            storage_class: resource
                .target_type
                .clone()
                .unwrap_or_else(|| GLACIER_CLASS.to_string()),
            days: GLACIER_TRANSITION_DAYS,
        }),
        ActionKind::IntelligentTiering => Some(Directive::Lifecycle {
            bucket: id?,
            rule_id: "intelligent-tiering",
            storage_class: resource
                .target_type
                .clone()
                .unwrap_or_else(|| INTELLIGENT_TIERING_CLASS.to_string()),
            days: 0,
        }),
        ActionKind::CommitReserved | ActionKind::ReviewSpend => None,
    }
}

fn directives(rec: &Recommendation) -> Vec<Directive> {
    if !rec.action_kind.is_automatable() {
        return Vec::new();
    }
    rec.resources
        .iter()
        .filter_map(|resource| directive_for(rec.action_kind, resource))
        .collect()
}

/// Escape a value for an HCL quoted string
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Template sequences must not be interpolated
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Make a Terraform identifier from arbitrary text
fn sanitize_label(value: &str) -> String {
    let mut label: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    while label.contains("__") {
        label = label.replace("__", "_");
    }
    label.trim_matches('_').to_string()
}

fn comment(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Rendered script plus the number of recommendations that produced blocks
pub(crate) struct Rendered {
    pub script: String,
    pub optimization_count: usize,
}

/// Render recommendations as a Terraform script
pub(crate) fn render(recommendations: &[Recommendation]) -> Result<Rendered, fmt::Error> {
    let planned: Vec<(&Recommendation, Vec<Directive>)> = recommendations
        .iter()
        .map(|rec| (rec, directives(rec)))
        .collect();
    let optimization_count = planned.iter().filter(|(_, d)| !d.is_empty()).count();
    let total: Decimal = recommendations.iter().map(|r| r.estimated_monthly_savings).sum();

    let mut out = String::new();
    writeln!(out, "# Cost optimization plan")?;
    writeln!(
        out,
        "# Recommendations: {} ({} automated, {} advisory)",
        recommendations.len(),
        optimization_count,
        recommendations.len() - optimization_count
    )?;
    writeln!(out, "# Estimated monthly savings: {}", money(total))?;
    writeln!(out, "# Estimated annual savings: {}", money(total * Decimal::from(12)))?;
    writeln!(out, "#")?;
    writeln!(out, "# Review every change with `terraform plan` before applying.")?;

    let mut labels = HashSet::new();
    for (rec, directives) in &planned {
        writeln!(out)?;
        write_recommendation_header(&mut out, rec, directives.is_empty())?;
        for (index, directive) in directives.iter().enumerate() {
            let label = unique_label(&mut labels, rec, directive, index);
            writeln!(out)?;
            write_directive(&mut out, directive, &label)?;
        }
    }

    Ok(Rendered {
        script: out,
        optimization_count,
    })
}

fn unique_label(
    used: &mut HashSet<String>,
    rec: &Recommendation,
    directive: &Directive,
    index: usize,
) -> String {
    let source = sanitize_label(directive.label_source());
    let base = if source.is_empty() {
        format!("rec{}_{}_{}", rec.id, sanitize_label(&rec.title), index + 1)
    } else {
        format!("rec{}_{}", rec.id, source)
    };

    let mut label = base.clone();
    let mut suffix = 2;
    while !used.insert(format!("{}.{}", directive.resource_type(), label)) {
        label = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    label
}

fn write_recommendation_header(out: &mut String, rec: &Recommendation, advisory: bool) -> fmt::Result {
    writeln!(
        out,
        "# [{}] {} ({}, confidence {:.1}%)",
        rec.id,
        comment(&rec.title),
        rec.severity,
        rec.confidence
    )?;
    writeln!(out, "# {}", comment(&rec.description))?;
    if advisory {
        writeln!(out, "# Advisory: {}", comment(&rec.action))?;
    } else {
        writeln!(out, "# Action: {}", comment(&rec.action))?;
    }
    writeln!(
        out,
        "# Estimated monthly savings: {} of {}",
        money(rec.estimated_monthly_savings),
        money(rec.current_monthly_cost)
    )
}

fn write_directive(out: &mut String, directive: &Directive, label: &str) -> fmt::Result {
    let address = format!("{}.{}", directive.resource_type(), label);
    match directive {
        Directive::Resize {
            resource_type,
            import_id,
            attributes,
        } => {
            writeln!(out, "import {{")?;
            writeln!(out, "  to = {}", address)?;
            writeln!(out, "  id = \"{}\"", escape(import_id))?;
            writeln!(out, "}}")?;
            writeln!(out)?;
            writeln!(out, "resource \"{}\" \"{}\" {{", resource_type, label)?;
            let width = attributes.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (key, value) in attributes {
                writeln!(out, "  {:width$} = {}", key, value, width = width)?;
            }
            writeln!(out, "}}")
        }
        Directive::Remove { resource_id, .. } => {
            writeln!(out, "# Resource id: {}", comment(resource_id))?;
            writeln!(out, "removed {{")?;
            writeln!(out, "  from = {}", address)?;
            writeln!(out)?;
            writeln!(out, "  lifecycle {{")?;
            writeln!(out, "    destroy = true")?;
            writeln!(out, "  }}")?;
            writeln!(out, "}}")
        }
        Directive::Lifecycle {
            bucket,
            rule_id,
            storage_class,
            days,
        } => {
            writeln!(out, "resource \"{}\" \"{}\" {{", directive.resource_type(), label)?;
            writeln!(out, "  bucket = \"{}\"", escape(bucket))?;
            writeln!(out)?;
            writeln!(out, "  rule {{")?;
            writeln!(out, "    id     = \"{}\"", rule_id)?;
            writeln!(out, "    status = \"Enabled\"")?;
            writeln!(out)?;
            writeln!(out, "    filter {{}}")?;
            writeln!(out)?;
            writeln!(out, "    transition {{")?;
            writeln!(out, "      days          = {}", days)?;
            writeln!(out, "      storage_class = \"{}\"", escape(storage_class))?;
            writeln!(out, "    }}")?;
            writeln!(out, "  }}")?;
            writeln!(out, "}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes_and_templates() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape("${var}"), "$${var}");
        assert_eq!(escape("%{if}"), "%%{if}");
        assert_eq!(escape("cost $5"), "cost $5");
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("i-0abc123"), "i_0abc123");
        assert_eq!(sanitize_label("My Bucket!!.logs"), "my_bucket_logs");
        assert_eq!(sanitize_label("---"), "");
    }

    #[test]
    fn test_remove_requires_resource_id() {
        let resource = AffectedResource {
            resource_id: None,
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            current_type: None,
            target_type: None,
        };
        assert_eq!(directive_for(ActionKind::Terminate, &resource), None);
        assert_eq!(directive_for(ActionKind::CommitReserved, &resource), None);
    }

    #[test]
    fn test_downsize_without_target_has_no_directive() {
        let resource = AffectedResource {
            resource_id: Some("i-1".to_string()),
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            current_type: Some("m5.metal".to_string()),
            target_type: None,
        };
        assert_eq!(directive_for(ActionKind::Downsize, &resource), None);
    }

    #[test]
    fn test_resize_requires_resource_id() {
        let resource = AffectedResource {
            resource_id: None,
            service: "EC2".to_string(),
            region: "us-east-1".to_string(),
            current_type: Some("t3.2xlarge".to_string()),
            target_type: Some("t3.large".to_string()),
        };
        assert_eq!(directive_for(ActionKind::Downsize, &resource), None);
        assert_eq!(directive_for(ActionKind::MigrateVolumeType, &resource), None);

        let lambda = AffectedResource {
            service: "Lambda".to_string(),
            target_type: Some("512MB".to_string()),
            ..resource
        };
        assert_eq!(directive_for(ActionKind::ReduceMemory, &lambda), None);
    }
}
