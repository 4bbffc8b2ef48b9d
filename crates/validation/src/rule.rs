use crate::context::PlanContext;
use crate::finding::Finding;

/// A check run against a candidate plan
pub trait PlanRule {
    /// Short label used to prefix diagnostics
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &PlanContext<'_>) -> RuleReport;
}

/// Findings of one rule plus its diagnostic trail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleReport {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<String>,
}

impl RuleReport {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.diagnostics.push(message.into());
    }

    /// No error-severity findings
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| !finding.is_error())
    }
}
