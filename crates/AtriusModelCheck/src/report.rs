//! What the commands print, as text or JSON.

use std::fmt;
use std::io::{self, Write};

use atrius_fhirpath_support::{Binding, Invariant, ValidationIssue, ValidationSeverity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl From<ValidationSeverity> for Severity {
    fn from(severity: ValidationSeverity) -> Self {
        match severity {
            ValidationSeverity::Error => Severity::Error,
            ValidationSeverity::Warning => Severity::Warning,
            ValidationSeverity::Information => Severity::Information,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    Constraint,
    Binding,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub source: IssueSource,
    pub key: String,
    pub severity: Severity,
    pub path: String,
    pub instance_path: String,
    pub message: String,
}

impl IssueReport {
    pub fn new(source: IssueSource, issue: ValidationIssue) -> Self {
        Self {
            source,
            key: issue.key.to_string(),
            severity: issue.severity.into(),
            path: issue.path.to_string(),
            instance_path: issue.instance_path,
            message: issue.message,
        }
    }
}

/// The outcome for one input file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<&'static str>,
    /// Why the file could not be read as a resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub issues: Vec<IssueReport>,
}

impl FileReport {
    /// Rejected files and error issues fail; warnings fail only when `strict`.
    pub fn passed(&self, strict: bool) -> bool {
        self.error.is_none()
            && self.issues.iter().all(|issue| match issue.severity {
                Severity::Error => false,
                Severity::Warning => !strict,
                Severity::Information => true,
            })
    }

    pub fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(error) = &self.error {
            return writeln!(out, "{}: rejected: {}", self.file, error);
        }
        let resource_type = self.resource_type.unwrap_or("?");
        if self.issues.is_empty() {
            return writeln!(out, "{}: {}: ok", self.file, resource_type);
        }
        writeln!(out, "{}: {}: {} issue(s)", self.file, resource_type, self.issues.len())?;
        for issue in &self.issues {
            writeln!(
                out,
                "  {:<11} {} at {}: {}",
                issue.severity, issue.key, issue.instance_path, issue.message
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvariantReport {
    pub key: &'static str,
    pub severity: Severity,
    pub path: &'static str,
    pub human: &'static str,
    pub expression: &'static str,
}

impl From<&Invariant> for InvariantReport {
    fn from(invariant: &Invariant) -> Self {
        Self {
            key: invariant.key,
            severity: invariant.severity.into(),
            path: invariant.path,
            human: invariant.human,
            expression: invariant.expr,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingReport {
    pub name: &'static str,
    pub path: &'static str,
    pub strength: &'static str,
    pub value_set: &'static str,
}

impl From<&Binding> for BindingReport {
    fn from(binding: &Binding) -> Self {
        Self {
            name: binding.name,
            path: binding.path,
            strength: binding.strength.as_code(),
            value_set: binding.value_set,
        }
    }
}

/// The rule surface of one resource type and its backbone elements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub resource_type: &'static str,
    pub invariants: Vec<InvariantReport>,
    pub bindings: Vec<BindingReport>,
}

impl Description {
    pub fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.resource_type)?;
        writeln!(out, "invariants:")?;
        for inv in &self.invariants {
            writeln!(out, "  {} ({}) {}: {}", inv.key, inv.severity, inv.path, inv.human)?;
            writeln!(out, "      {}", inv.expression)?;
        }
        writeln!(out, "bindings:")?;
        for binding in &self.bindings {
            writeln!(out, "  {} ({}) {} -> {}", binding.path, binding.strength, binding.name, binding.value_set)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> IssueReport {
        IssueReport {
            source: IssueSource::Constraint,
            key: "nor-1".to_string(),
            severity,
            path: "NutritionOrder".to_string(),
            instance_path: "NutritionOrder".to_string(),
            message: "Nutrition Order SHALL contain either Oral Diet , Supplement, or Enteral Formula class"
                .to_string(),
        }
    }

    fn report(issues: Vec<IssueReport>) -> FileReport {
        FileReport {
            file: "order.json".to_string(),
            resource_type: Some("NutritionOrder"),
            error: None,
            issues,
        }
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let warned = report(vec![issue(Severity::Warning)]);
        assert!(warned.passed(false));
        assert!(!warned.passed(true));
        assert!(!report(vec![issue(Severity::Error)]).passed(false));
        assert!(report(vec![issue(Severity::Information)]).passed(true));
    }

    #[test]
    fn text_lists_each_issue() {
        let mut out = Vec::new();
        report(vec![issue(Severity::Warning)]).write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("order.json: NutritionOrder: 1 issue(s)\n"));
        assert!(text.contains("warning     nor-1 at NutritionOrder: Nutrition Order SHALL"));
    }

    #[test]
    fn json_uses_camel_case_and_lowercase_enums() {
        let json = serde_json::to_value(report(vec![issue(Severity::Error)])).unwrap();
        assert_eq!(json["resourceType"], "NutritionOrder");
        assert_eq!(json["issues"][0]["instancePath"], "NutritionOrder");
        assert_eq!(json["issues"][0]["severity"], "error");
        assert_eq!(json["issues"][0]["source"], "constraint");
        assert!(json.get("error").is_none());
    }
}
