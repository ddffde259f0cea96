//! Audit report portfolio

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SiteError};
use crate::helpers::parse_calendar_date;

/// Highest severity found during an audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Critical" => Severity::Critical,
            "High" => Severity::High,
            "Medium" => Severity::Medium,
            "Low" => Severity::Low,
            _ => Severity::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.label().to_string()
    }
}

impl Severity {
    pub fn label(&self) -> &str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Other(s) => s,
        }
    }

    /// CSS class for the severity badge
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Critical => "severity-critical",
            Severity::High => "severity-high",
            Severity::Medium => "severity-medium",
            Severity::Low => "severity-low",
            Severity::Other(_) => "severity-info",
        }
    }
}

/// A published audit report summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub id: u32,
    pub project_name: String,
    pub category: String,
    pub platform: String,
    pub date: String,
    pub severity: Severity,
    pub status: String,
    pub findings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

impl AuditReport {
    pub fn timestamp(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Case-insensitive match on project name, category or platform
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.project_name, &self.category, &self.platform]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Read-only list of audit reports
#[derive(Debug, Clone, Default)]
pub struct AuditStore {
    audits: Vec<AuditReport>,
}

impl AuditStore {
    pub fn new(audits: Vec<AuditReport>) -> Self {
        Self { audits }
    }

    /// Load audits from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SiteError::malformed(path.display().to_string(), e))?;
        let audits: Vec<AuditReport> = serde_json::from_str(&content)
            .map_err(|e| SiteError::malformed(path.display().to_string(), e))?;
        tracing::info!("Loaded {} audit reports from {:?}", audits.len(), path);
        Ok(Self::new(audits))
    }

    /// Load audits, degrading to an empty list on failure
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Audit data unavailable, serving an empty portfolio: {}", e);
            Self::default()
        })
    }

    pub fn audits(&self) -> &[AuditReport] {
        &self.audits
    }

    /// Audits matching an optional query, newest first (stable on ties)
    pub fn search(&self, query: &str) -> Vec<&AuditReport> {
        let query = query.trim();
        let mut audits: Vec<&AuditReport> = self
            .audits
            .iter()
            .filter(|a| query.is_empty() || a.matches(query))
            .collect();
        audits.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        audits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuditStore {
        let json = r#"[
            {"id": 1, "projectName": "SolanaSwap Protocol", "category": "DeFi", "platform": "Solana",
             "date": "June 15, 2023", "severity": "High", "status": "Completed", "findings": 8},
            {"id": 4, "projectName": "DeFi Vault", "category": "DeFi", "platform": "Rust",
             "date": "April 22, 2023", "severity": "Critical", "status": "Completed", "findings": 12},
            {"id": 7, "projectName": "Oracle Relay", "category": "Infrastructure", "platform": "Solana",
             "date": "July 2, 2023", "severity": "Informational", "status": "In Progress", "findings": 1}
        ]"#;
        AuditStore::new(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_severity_parsing() {
        let store = sample();
        assert_eq!(store.audits()[0].severity, Severity::High);
        assert_eq!(store.audits()[1].severity.css_class(), "severity-critical");
        assert_eq!(
            store.audits()[2].severity,
            Severity::Other("Informational".to_string())
        );
        assert_eq!(store.audits()[2].severity.label(), "Informational");
    }

    #[test]
    fn test_search_orders_newest_first() {
        let store = sample();
        let names: Vec<_> = store
            .search("")
            .iter()
            .map(|a| a.project_name.as_str())
            .collect();
        assert_eq!(names, vec!["Oracle Relay", "SolanaSwap Protocol", "DeFi Vault"]);
    }

    #[test]
    fn test_search_matches_name_category_platform() {
        let store = sample();
        assert_eq!(store.search("vault").len(), 1);
        assert_eq!(store.search("defi").len(), 2);
        assert_eq!(store.search("SOLANA").len(), 2);
        assert!(store.search("bridge").is_empty());
    }

    #[test]
    fn test_severity_round_trips_as_string() {
        let json = serde_json::to_string(&Severity::Other("Info".to_string())).unwrap();
        assert_eq!(json, "\"Info\"");
        let json = serde_json::to_string(&Severity::Low).unwrap();
        assert_eq!(json, "\"Low\"");
    }
}
