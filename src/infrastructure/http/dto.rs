//! Wire-shape DTOs for the admin endpoints (§6). `POST /transactions`
//! serializes the domain `TransactionRequest`/`TransactionResponse` types
//! directly — they already match the wire schema and carry their own
//! serde derives.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::StatusReport;

/// `GET /processors/status` entry.
#[derive(Debug, Serialize)]
pub struct StatusReportDto {
    pub name: String,
    pub state: String,
    pub success_rate: f64,
    pub total_calls_in_window: u32,
    pub successful_calls_in_window: u32,
    pub failed_calls_in_window: u32,
    pub last_failure_at: Option<String>,
    pub cooldown_remaining_seconds: Option<f64>,
    pub fee_rate: f64,
}

impl StatusReportDto {
    #[must_use]
    pub fn from_report(report: StatusReport, fee_rate: f64) -> Self {
        Self {
            name: report.name,
            state: report.state.to_string(),
            success_rate: report.success_rate,
            total_calls_in_window: report.total_calls_in_window,
            successful_calls_in_window: report.successful_calls_in_window,
            failed_calls_in_window: report.failed_calls_in_window,
            last_failure_at: report.last_failure_at.map(render_ago),
            cooldown_remaining_seconds: report.cooldown_remaining_seconds,
            fee_rate,
        }
    }
}

fn render_ago(elapsed: Duration) -> String {
    format!("{:.1}s ago", elapsed.as_secs_f64())
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub processor: String,
    pub action: &'static str,
    pub state: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct InjectFailuresQuery {
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct InjectFailuresResponse {
    pub processor: String,
    pub injected_failures: u32,
    pub state: String,
    pub success_rate: f64,
    pub total_calls_in_window: u32,
}
