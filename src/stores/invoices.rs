use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::model::{Invoice, InvoiceId, InvoiceStatus, NewInvoice};
use crate::{money, Error};

#[derive(Debug, Default)]
pub struct InvoicesStore {
    invoices: Vec<Invoice>,
    last_id: u64,
    /// Last generated invoice number per year of creation.
    year_sequences: HashMap<i32, u32>,
}

impl InvoicesStore {
    pub fn new() -> Self {
        Self {
            invoices: Vec::new(),
            last_id: 0,
            year_sequences: HashMap::new(),
        }
    }

    /// Records an invoice under a freshly generated id.
    /// A missing invoice number becomes `INV-<year of creation>-<sequence>`,
    /// where the sequence restarts at 1 each year.
    pub fn append(&mut self, new: NewInvoice) -> Result<&Invoice, Error> {
        let amount = money::round(new.amount);
        if amount <= Decimal::ZERO {
            return Err(Error::AmountMustBePositive);
        }
        self.last_id += 1;
        let id = InvoiceId(self.last_id);
        let invoice_number = match new.invoice_number.filter(|n| !n.trim().is_empty()) {
            Some(number) => number,
            None => {
                let year = new.created_at.year();
                let seq = self.year_sequences.entry(year).or_insert(0);
                *seq += 1;
                format!("INV-{}-{:04}", year, seq)
            }
        };
        self.invoices.push(Invoice {
            id,
            invoice_number,
            student: new.student,
            amount,
            due_date: new.due_date,
            status: new.status,
            items: new.items,
            created_at: new.created_at,
        });
        Ok(&self.invoices[self.invoices.len() - 1])
    }

    pub fn get(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Invoices referencing the admission number, in the order they were raised.
    pub fn by_student(&self, admission_number: &str) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|i| i.student.matches(admission_number))
            .collect()
    }

    pub fn count_with_status(&self, status: InvoiceStatus) -> usize {
        self.invoices.iter().filter(|i| i.status == status).count()
    }

    pub fn as_slice(&self) -> &[Invoice] {
        &self.invoices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdmissionNumber, LineItem};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice(admission: &str, amount: Decimal, number: Option<&str>) -> NewInvoice {
        NewInvoice {
            invoice_number: number.map(str::to_string),
            student: AdmissionNumber::new(admission),
            amount,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            status: InvoiceStatus::Pending,
            items: vec![LineItem {
                description: "Tuition".to_string(),
                amount,
            }],
            created_at: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }
    }

    #[test]
    fn test_generated_invoice_number() {
        let mut store = InvoicesStore::new();
        let first = store.append(invoice("A1", dec!(1000), None)).unwrap();
        assert_eq!(first.id, InvoiceId(1));
        assert_eq!(first.invoice_number, "INV-2024-0001");

        let second = store.append(invoice("A1", dec!(1000), Some("  "))).unwrap();
        assert_eq!(second.invoice_number, "INV-2024-0002");
    }

    #[test]
    fn test_generated_sequence_restarts_each_year() {
        let mut store = InvoicesStore::new();
        store.append(invoice("A1", dec!(1000), None)).unwrap();
        store.append(invoice("A1", dec!(1000), Some("T1-0042"))).unwrap();

        let mut next_year = invoice("A1", dec!(1000), None);
        next_year.created_at = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let raised = store.append(next_year).unwrap();
        assert_eq!(raised.id, InvoiceId(3));
        assert_eq!(raised.invoice_number, "INV-2025-0001");

        let again = store.append(invoice("A1", dec!(1000), None)).unwrap();
        assert_eq!(again.invoice_number, "INV-2024-0002");
    }

    #[test]
    fn test_given_invoice_number_kept() {
        let mut store = InvoicesStore::new();
        let id = store.append(invoice("A1", dec!(1000), Some("T1-0042"))).unwrap().id;
        assert_eq!(store.get(id).unwrap().invoice_number, "T1-0042");
        assert_eq!(store.get(id).unwrap().items.len(), 1);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut store = InvoicesStore::new();
        assert_eq!(
            store.append(invoice("A1", dec!(0), None)).err(),
            Some(Error::AmountMustBePositive)
        );
        assert!(store.as_slice().is_empty());
    }

    #[test]
    fn test_by_student_and_status_counts() {
        let mut store = InvoicesStore::new();
        store.append(invoice("A1", dec!(100), None)).unwrap();
        let mut overdue = invoice("B1", dec!(200), None);
        overdue.status = InvoiceStatus::Overdue;
        store.append(overdue).unwrap();
        store.append(invoice("A1", dec!(300), None)).unwrap();

        let amounts: Vec<_> = store.by_student("a1").iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![dec!(100), dec!(300)]);
        assert_eq!(store.count_with_status(InvoiceStatus::Pending), 2);
        assert_eq!(store.count_with_status(InvoiceStatus::Overdue), 1);
        assert_eq!(store.count_with_status(InvoiceStatus::Paid), 0);
    }
}
