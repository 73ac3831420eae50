use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::model::{
    AdmissionNumber, InvoiceStatus, LineItem, NewInvoice, NewPayment, PaymentStatus, Student,
    StudentId, StudentStatus,
};
use crate::money::{deserialize_amount, deserialize_optional_amount, round};
use crate::Error;

const DEFAULT_DESCRIPTION: &str = "School fees";

/// One roster line, used both for importing students and for the balance report.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StudentRow {
    pub id: u32,
    pub name: String,
    pub class: String,
    pub admission_number: String,
    #[serde(
        deserialize_with = "deserialize_amount",
        serialize_with = "serialize_amount"
    )]
    pub balance: Decimal,
    pub status: StudentStatus,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
}

fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.2}", round(*amount)))
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.0,
            name: student.name.clone(),
            class: student.class.clone(),
            admission_number: student.admission_number.to_string(),
            balance: student.balance,
            status: student.status,
            guardian_name: student.guardian_name.clone(),
            guardian_phone: student.guardian_phone.clone(),
            guardian_email: student.guardian_email.clone(),
        }
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: StudentId(row.id),
            name: row.name,
            class: row.class,
            admission_number: AdmissionNumber::new(row.admission_number),
            balance: row.balance,
            status: row.status,
            guardian_name: row.guardian_name,
            guardian_phone: row.guardian_phone,
            guardian_email: row.guardian_email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum FeeEventType {
    Payment,
    Invoice,
}

/// One line of a fee event file. Which columns are required depends on the type.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FeeEvent {
    #[serde(rename = "type")]
    pub event_type: FeeEventType,
    pub admission_number: String,
    #[serde(deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
}

/// A validated fee event, ready to be applied to the store.
#[derive(Debug, PartialEq)]
pub enum FeeCommand {
    Payment(NewPayment),
    Invoice(NewInvoice),
}

impl TryFrom<FeeEvent> for FeeCommand {
    type Error = Error;

    fn try_from(event: FeeEvent) -> Result<Self, Self::Error> {
        let student = AdmissionNumber::new(event.admission_number);
        if student.as_str().is_empty() {
            return Err(Error::InvalidEvent("missing admission number"));
        }
        let description = event
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        match event.event_type {
            FeeEventType::Payment => Ok(FeeCommand::Payment(NewPayment {
                student,
                amount: event
                    .amount
                    .ok_or(Error::InvalidEvent("payment without amount"))?,
                method: event.method.unwrap_or_default(),
                transaction_id: event.reference.unwrap_or_default(),
                description,
                date: event.date.ok_or(Error::InvalidEvent("payment without date"))?,
                status: match event.status {
                    Some(status) => status.parse::<PaymentStatus>()?,
                    None => PaymentStatus::default(),
                },
            })),
            FeeEventType::Invoice => {
                let amount = event
                    .amount
                    .ok_or(Error::InvalidEvent("invoice without amount"))?;
                let due_date = event
                    .due_date
                    .ok_or(Error::InvalidEvent("invoice without due date"))?;
                Ok(FeeCommand::Invoice(NewInvoice {
                    invoice_number: event.invoice_number,
                    student,
                    amount,
                    due_date,
                    status: match event.status {
                        Some(status) => status.parse::<InvoiceStatus>()?,
                        None => InvoiceStatus::default(),
                    },
                    items: vec![LineItem {
                        description,
                        amount,
                    }],
                    created_at: event.date.unwrap_or(due_date),
                }))
            }
        }
    }
}
