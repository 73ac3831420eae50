//! Domain types held by the ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAY-{:06}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvoiceId(pub u64);

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INV-{:06}", self.0)
    }
}

/// External student identifier (e.g. `NA2024001`) used to correlate payments
/// and invoices with a student. Equality, hashing and
/// [`AdmissionNumber::matches`] all ignore ASCII case; the original spelling is
/// kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdmissionNumber(String);

impl AdmissionNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl PartialEq for AdmissionNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for AdmissionNumber {}

impl Hash for AdmissionNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_uppercase());
        }
        state.write_u8(0xff);
    }
}

impl From<&str> for AdmissionNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AdmissionNumber {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for AdmissionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StudentStatus::Active => "Active",
            StudentStatus::Inactive => "Inactive",
            StudentStatus::Graduated => "Graduated",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(PaymentStatus::Completed),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(Error::InvalidEvent("unknown payment status")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl FromStr for InvoiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(InvoiceStatus::Paid),
            "pending" => Ok(InvoiceStatus::Pending),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(Error::InvalidEvent("unknown invoice status")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub class: String,
    pub admission_number: AdmissionNumber,
    /// Amount owed. Invoices raise it, payments lower it (never below zero).
    pub balance: Decimal,
    pub status: StudentStatus,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
}

/// Everything needed to enroll a student; the store assigns id and status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub class: String,
    pub admission_number: AdmissionNumber,
    pub balance: Decimal,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
}

/// Partial update for a student. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub class: Option<String>,
    pub admission_number: Option<AdmissionNumber>,
    pub balance: Option<Decimal>,
    pub status: Option<StudentStatus>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_email: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(class) = self.class {
            student.class = class;
        }
        if let Some(admission_number) = self.admission_number {
            student.admission_number = admission_number;
        }
        if let Some(balance) = self.balance {
            student.balance = crate::money::round(balance);
        }
        if let Some(status) = self.status {
            student.status = status;
        }
        if let Some(guardian_name) = self.guardian_name {
            student.guardian_name = guardian_name;
        }
        if let Some(guardian_phone) = self.guardian_phone {
            student.guardian_phone = guardian_phone;
        }
        if let Some(guardian_email) = self.guardian_email {
            student.guardian_email = guardian_email;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub student: AdmissionNumber,
    pub amount: Decimal,
    pub method: String,
    pub transaction_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub student: AdmissionNumber,
    pub amount: Decimal,
    pub method: String,
    pub transaction_id: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub student: AdmissionNumber,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    /// Generated as `INV-<year>-<seq>` when absent.
    pub invoice_number: Option<String>,
    pub student: AdmissionNumber,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn student() -> Student {
        Student {
            id: StudentId(1),
            name: "Amani Wanjiru".to_string(),
            class: "Grade 4".to_string(),
            admission_number: AdmissionNumber::new("NA2024001"),
            balance: dec!(15000),
            status: StudentStatus::Active,
            guardian_name: "Grace Wanjiru".to_string(),
            guardian_phone: "+254712345678".to_string(),
            guardian_email: "grace@example.com".to_string(),
        }
    }

    #[test]
    fn test_admission_number_matches_ignoring_case() {
        let admission = AdmissionNumber::new("NA2024001");
        assert!(admission.matches("na2024001"));
        assert!(admission.matches(" NA2024001 "));
        assert!(!admission.matches("NA2024002"));
    }

    #[test]
    fn test_admission_number_equality_agrees_with_matches() {
        use std::collections::HashSet;

        let lower = AdmissionNumber::new("a1");
        let upper = AdmissionNumber::new("A1");
        assert!(lower.matches(upper.as_str()));
        assert_eq!(lower, upper);
        assert_ne!(lower, AdmissionNumber::new("A2"));

        let set: HashSet<_> = [lower, upper].into_iter().collect();
        assert_eq!(set.len(), 1);
        // Spelling is kept as entered
        assert_eq!(AdmissionNumber::new(" na2024001 ").to_string(), "na2024001");
    }

    #[test]
    fn test_ids_display_with_prefix() {
        assert_eq!(PaymentId(42).to_string(), "PAY-000042");
        assert_eq!(InvoiceId(7).to_string(), "INV-000007");
        assert_eq!(StudentId(3).to_string(), "3");
    }

    #[test]
    fn test_empty_patch_leaves_student_unchanged() {
        let mut s = student();
        let patch = StudentPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut s);
        assert_eq!(s, student());
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut s = student();
        StudentPatch {
            class: Some("Grade 5".to_string()),
            balance: Some(dec!(100.555)),
            ..Default::default()
        }
        .apply(&mut s);
        assert_eq!(s.class, "Grade 5");
        assert_eq!(s.balance, dec!(100.56));
        assert_eq!(s.name, "Amani Wanjiru");
        assert_eq!(s.status, StudentStatus::Active);
    }

    #[test]
    fn test_parse_statuses() {
        assert_eq!("Completed".parse::<PaymentStatus>(), Ok(PaymentStatus::Completed));
        assert_eq!(" failed ".parse::<PaymentStatus>(), Ok(PaymentStatus::Failed));
        assert_eq!("overdue".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Overdue));
        assert!("refunded".parse::<PaymentStatus>().is_err());
        assert!("completed".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(StudentStatus::Active.to_string(), "Active");
        assert_eq!(StudentStatus::default(), StudentStatus::Active);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Completed);
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
    }
}
