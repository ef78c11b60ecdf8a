//! Request types for the reimbursement engine API.
//!
//! This module defines the JSON request structures for the `/quote`,
//! `/process`, and `/eligibility` endpoints. Date fields accept either a
//! plain date (`2024-03-15`) or an ISO-8601 date-time
//! (`2024-03-15T10:30:00Z`); the engine compares at day resolution.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Category, ReimbursementRequest, RequestStatus};

/// Request body for the `/quote` endpoint.
///
/// Contains the invoice inputs for computing the base reimbursement and
/// a depreciation preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// The employee the quote is for.
    pub employee_id: String,
    /// The date the employee joined the organization.
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub joining_date: NaiveDate,
    /// The calendar date the laptop was purchased.
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub laptop_purchase_date: NaiveDate,
    /// The reimbursement category of the employee.
    pub category: Category,
    /// The amount on the purchase invoice.
    pub invoice_amount: Decimal,
    /// Additional invoice amount for a Windows Pro upgrade.
    #[serde(default)]
    pub windows_pro_amount: Option<Decimal>,
    /// Whether to include the informational month-by-month breakdown.
    #[serde(default)]
    pub include_monthly_breakdown: bool,
}

/// A stored reimbursement request supplied by the caller.
///
/// Mirrors the fields the surrounding workflow persists; converted into
/// the domain [`ReimbursementRequest`] before calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestPayload {
    /// Unique identifier for the request.
    pub id: String,
    /// Identifier of the employee who submitted the request.
    pub employee_id: String,
    /// The date the employee joined the organization.
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub joining_date: NaiveDate,
    /// The calendar date the laptop was purchased.
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub laptop_purchase_date: NaiveDate,
    /// The reimbursement category of the employee.
    pub category: Category,
    /// The amount on the purchase invoice.
    pub invoice_amount: Decimal,
    /// Additional invoice amount for a Windows Pro upgrade.
    #[serde(default)]
    pub windows_pro_amount: Option<Decimal>,
    /// The invoice-derived base reimbursement, set at submission.
    pub base_reimbursement_amount: Decimal,
    /// The amount currently owed to the employee.
    pub reimbursement_amount: Decimal,
    /// The workflow status of the request.
    pub status: RequestStatus,
    /// The date the request was processed, if it has been.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub processed_at: Option<NaiveDate>,
    /// The kind of depreciation applied at processing time.
    #[serde(default)]
    pub depreciation_type: Option<String>,
    /// The depreciation percentage applied, rendered as a string.
    #[serde(default)]
    pub depreciation_value: Option<String>,
    /// The monthly installment amount, if processed.
    #[serde(default)]
    pub monthly_installment: Option<Decimal>,
    /// First day of the installment window, if processed.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub installment_start_date: Option<NaiveDate>,
    /// Last day of the installment window, if processed.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub installment_end_date: Option<NaiveDate>,
    /// The earliest date a new request may be submitted, if processed.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub next_eligible_date: Option<NaiveDate>,
}

/// Request body for the `/process` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// The stored request being processed.
    pub request: RequestPayload,
    /// The processing date; defaults to the current date when absent.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub processed_on: Option<NaiveDate>,
}

/// Request body for the `/eligibility` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    /// The employee the check is for.
    pub employee_id: String,
    /// The date the employee joined the organization.
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub joining_date: NaiveDate,
    /// The employee's prior requests (any statuses).
    #[serde(default)]
    pub prior_requests: Vec<RequestPayload>,
    /// The date to decide for; defaults to the current date when absent.
    #[serde(default, deserialize_with = "flexible_date::deserialize_opt")]
    pub as_of: Option<NaiveDate>,
}

impl From<RequestPayload> for ReimbursementRequest {
    fn from(payload: RequestPayload) -> Self {
        ReimbursementRequest {
            id: payload.id,
            employee_id: payload.employee_id,
            joining_date: payload.joining_date,
            laptop_purchase_date: payload.laptop_purchase_date,
            category: payload.category,
            invoice_amount: payload.invoice_amount,
            windows_pro_amount: payload.windows_pro_amount,
            base_reimbursement_amount: payload.base_reimbursement_amount,
            reimbursement_amount: payload.reimbursement_amount,
            status: payload.status,
            processed_at: payload.processed_at,
            depreciation_type: payload.depreciation_type,
            depreciation_value: payload.depreciation_value,
            monthly_installment: payload.monthly_installment,
            installment_start_date: payload.installment_start_date,
            installment_end_date: payload.installment_end_date,
            next_eligible_date: payload.next_eligible_date,
        }
    }
}

/// Serde support for date fields that accept date or date-time strings.
mod flexible_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    /// Parses a calendar day from a date or date-time string.
    fn parse_day(value: &str) -> Result<NaiveDate, String> {
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Ok(datetime.date_naive());
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
            return Ok(datetime.date());
        }
        Err(format!(
            "expected a date (2024-03-15) or date-time (2024-03-15T10:30:00Z), got '{}'",
            value
        ))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_day(&value).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|s| parse_day(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_quote_request_with_plain_dates() {
        let json = r#"{
            "employee_id": "EMP003",
            "joining_date": "2024-01-01",
            "laptop_purchase_date": "2024-02-10",
            "category": "Developer",
            "invoice_amount": "100000"
        }"#;

        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "EMP003");
        assert_eq!(
            request.joining_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(request.windows_pro_amount, None);
        assert!(!request.include_monthly_breakdown);
    }

    #[test]
    fn test_deserialize_quote_request_with_datetime_dates() {
        let json = r#"{
            "employee_id": "EMP003",
            "joining_date": "2024-01-01T09:30:00Z",
            "laptop_purchase_date": "2022-01-01T23:59:59",
            "category": "Non-Developer",
            "invoice_amount": "120000",
            "windows_pro_amount": "8000",
            "include_monthly_breakdown": true
        }"#;

        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.joining_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            request.laptop_purchase_date,
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );
        assert_eq!(
            request.windows_pro_amount,
            Some(Decimal::from_str("8000").unwrap())
        );
        assert!(request.include_monthly_breakdown);
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let json = r#"{
            "employee_id": "EMP003",
            "joining_date": "01/15/2024",
            "laptop_purchase_date": "2024-02-10",
            "category": "Developer",
            "invoice_amount": "100000"
        }"#;

        let result: Result<QuoteRequest, _> = serde_json::from_str(json);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("01/15/2024"));
    }

    #[test]
    fn test_deserialize_process_request_defaults_date() {
        let json = r#"{
            "request": {
                "id": "req_001",
                "employee_id": "EMP003",
                "joining_date": "2024-01-01",
                "laptop_purchase_date": "2024-02-10",
                "category": "Developer",
                "invoice_amount": "64000",
                "base_reimbursement_amount": "48000",
                "reimbursement_amount": "48000",
                "status": "approved"
            }
        }"#;

        let request: ProcessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.processed_on, None);
        assert_eq!(request.request.status, RequestStatus::Approved);
    }

    #[test]
    fn test_payload_conversion_to_domain_request() {
        let payload = RequestPayload {
            id: "req_001".to_string(),
            employee_id: "EMP003".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            laptop_purchase_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            category: Category::Developer,
            invoice_amount: Decimal::from_str("64000").unwrap(),
            windows_pro_amount: None,
            base_reimbursement_amount: Decimal::from_str("48000").unwrap(),
            reimbursement_amount: Decimal::from_str("48000").unwrap(),
            status: RequestStatus::Approved,
            processed_at: None,
            depreciation_type: None,
            depreciation_value: None,
            monthly_installment: None,
            installment_start_date: None,
            installment_end_date: None,
            next_eligible_date: None,
        };

        let request: ReimbursementRequest = payload.into();
        assert_eq!(request.id, "req_001");
        assert_eq!(request.category, Category::Developer);
        assert!(!request.is_settled());
    }

    #[test]
    fn test_deserialize_eligibility_request_with_history() {
        let json = r#"{
            "employee_id": "EMP003",
            "joining_date": "2023-01-01",
            "as_of": "2026-01-10",
            "prior_requests": [{
                "id": "req_001",
                "employee_id": "EMP003",
                "joining_date": "2023-01-01",
                "laptop_purchase_date": "2023-02-01",
                "category": "Developer",
                "invoice_amount": "64000",
                "base_reimbursement_amount": "48000",
                "reimbursement_amount": "48000",
                "status": "processed",
                "processed_at": "2024-03-15T11:00:00Z",
                "next_eligible_date": "2027-03-15"
            }]
        }"#;

        let request: EligibilityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.prior_requests.len(), 1);
        assert_eq!(
            request.prior_requests[0].processed_at,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(request.as_of, NaiveDate::from_ymd_opt(2026, 1, 10));
    }

    #[test]
    fn test_deserialize_eligibility_request_without_history() {
        let json = r#"{
            "employee_id": "EMP003",
            "joining_date": "2024-06-10"
        }"#;

        let request: EligibilityRequest = serde_json::from_str(json).unwrap();
        assert!(request.prior_requests.is_empty());
        assert_eq!(request.as_of, None);
    }
}
