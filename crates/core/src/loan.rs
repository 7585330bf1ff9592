//! Loan records as served by the loan backend.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DomainError, LoanId};

/// Loan lifecycle status.
///
/// Status transitions happen only in the backend; clients display it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Rejected,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Pending,
        LoanStatus::Active,
        LoanStatus::Completed,
        LoanStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Rejected => "rejected",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
            LoanStatus::Rejected => "Rejected",
        }
    }
}

impl core::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "active" => Ok(LoanStatus::Active),
            "completed" => Ok(LoanStatus::Completed),
            "rejected" => Ok(LoanStatus::Rejected),
            other => Err(DomainError::unknown_variant("loan status", other)),
        }
    }
}

/// Raw loan record (matches the backend's response shape).
///
/// `total_loan` is sensitive: it is carried here exactly as fetched and must
/// only reach a viewer through a role-aware projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub user_email: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_loan: Option<f64>,
    pub status: LoanStatus,
    pub interest_rate: f64,
    #[serde(with = "wire_date")]
    pub maturity_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub application_date: NaiveDate,
    pub purpose: String,
}

impl Loan {
    /// A loan is expired once its maturity date lies strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.maturity_date < today
    }
}

/// Calendar dates on the wire.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (only the date part is
/// kept). Always writes `YYYY-MM-DD`.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .map_err(|_| format!("invalid date '{raw}': expected YYYY-MM-DD or RFC 3339"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "1",
            "userEmail": "ana@example.com",
            "amount": 5000.0,
            "totalLoan": 9000.0,
            "status": "pending",
            "interestRate": 7.5,
            "maturityDate": "2026-03-01",
            "applicationDate": "2025-03-01T10:15:00Z",
            "purpose": "Working capital"
        })
    }

    #[test]
    fn decodes_camel_case_payload() {
        let loan: Loan = serde_json::from_value(sample()).unwrap();
        assert_eq!(loan.id.as_str(), "1");
        assert_eq!(loan.status, LoanStatus::Pending);
        assert_eq!(loan.total_loan, Some(9000.0));
        assert_eq!(loan.application_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn total_loan_is_optional() {
        let mut raw = sample();
        raw.as_object_mut().unwrap().remove("totalLoan");
        let loan: Loan = serde_json::from_value(raw).unwrap();
        assert_eq!(loan.total_loan, None);

        let back = serde_json::to_value(&loan).unwrap();
        assert!(back.get("totalLoan").is_none());
        assert_eq!(back["applicationDate"], "2025-03-01");
    }

    #[test]
    fn numeric_id_is_accepted() {
        let mut raw = sample();
        raw["id"] = json!(1);
        let loan: Loan = serde_json::from_value(raw).unwrap();
        assert_eq!(loan.id.as_str(), "1");

        let batch: Vec<Loan> = serde_json::from_value(json!([sample(), {
            "id": 2,
            "userEmail": "ben@example.com",
            "amount": 1200,
            "status": "active",
            "interestRate": 4,
            "maturityDate": "2027-01-01",
            "applicationDate": "2026-01-01",
            "purpose": "Bike"
        }]))
        .unwrap();
        assert_eq!(batch[1].id.as_str(), "2");
        assert_eq!(batch[1].total_loan, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut raw = sample();
        raw["status"] = json!("defaulted");
        assert!(serde_json::from_value::<Loan>(raw).is_err());
    }

    #[test]
    fn expiry_is_strictly_before_today() {
        let loan: Loan = serde_json::from_value(sample()).unwrap();
        let maturity = loan.maturity_date;
        assert!(!loan.is_expired(maturity));
        assert!(loan.is_expired(maturity.succ_opt().unwrap()));
    }
}
