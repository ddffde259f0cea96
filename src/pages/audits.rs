//! Audit portfolio view

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::content::{AuditReport, AuditStore};
use crate::helpers;
use crate::templates::AuditRow;

/// Query string of the audits page: `?q=<term>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditsQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditsView {
    pub query: String,
    pub audits: Vec<AuditRow>,
    pub message: Option<String>,
}

pub struct AuditsController {
    audits: Arc<AuditStore>,
}

impl AuditsController {
    pub fn new(audits: Arc<AuditStore>) -> Self {
        Self { audits }
    }

    pub fn view(&self, query: &str) -> AuditsView {
        let audits: Vec<AuditRow> = self.audits.search(query).into_iter().map(row).collect();
        let message = if audits.is_empty() {
            Some(if query.trim().is_empty() {
                "No audit reports published yet.".to_string()
            } else {
                "No audits found matching your search.".to_string()
            })
        } else {
            None
        };

        AuditsView {
            query: query.to_string(),
            audits,
            message,
        }
    }
}

pub(crate) fn row(audit: &AuditReport) -> AuditRow {
    AuditRow {
        id: audit.id,
        project_name: audit.project_name.clone(),
        category: audit.category.clone(),
        platform: audit.platform.clone(),
        date: helpers::display_date(&audit.date),
        severity: audit.severity.label().to_string(),
        severity_class: audit.severity.css_class().to_string(),
        status: audit.status.clone(),
        findings: audit.findings,
        report_url: audit.report_url.clone(),
    }
}
