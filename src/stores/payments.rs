//! Payment history.
//!
//! Payments are append-only. Ids come from a counter owned by the store, so
//! ids stay unique however quickly payments are recorded.

use rust_decimal::Decimal;

use crate::model::{NewPayment, Payment, PaymentId, PaymentStatus};
use crate::{money, Error};

#[derive(Debug, Default)]
pub struct PaymentsStore {
    payments: Vec<Payment>,
    /// Last id handed out
    last_id: u64,
}

impl PaymentsStore {
    pub fn new() -> Self {
        Self {
            payments: Vec::new(),
            last_id: 0,
        }
    }

    /// Records a payment under a freshly generated id.
    pub fn append(&mut self, new: NewPayment) -> Result<&Payment, Error> {
        let amount = money::round(new.amount);
        if amount <= Decimal::ZERO {
            return Err(Error::AmountMustBePositive);
        }
        self.last_id += 1;
        let id = PaymentId(self.last_id);
        self.payments.push(Payment {
            id,
            student: new.student,
            amount,
            method: new.method,
            transaction_id: new.transaction_id,
            description: new.description,
            date: new.date,
            status: new.status,
        });
        Ok(&self.payments[self.payments.len() - 1])
    }

    pub fn get(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    /// Payments referencing the admission number, in the order they were recorded.
    pub fn by_student(&self, admission_number: &str) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.student.matches(admission_number))
            .collect()
    }

    /// Sum of payment amounts with the given status.
    pub fn total_with_status(&self, status: PaymentStatus) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.amount)
            .sum()
    }

    pub fn as_slice(&self) -> &[Payment] {
        &self.payments
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Payment> {
        self.payments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AdmissionNumber;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn payment(admission: &str, amount: Decimal, status: PaymentStatus) -> NewPayment {
        NewPayment {
            student: AdmissionNumber::new(admission),
            amount,
            method: "M-Pesa".to_string(),
            transaction_id: "QJK7ABC123".to_string(),
            description: "Term 1 fees".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status,
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PaymentsStore::new();
        assert!(store.as_slice().is_empty());
        assert!(store.by_student("A1").is_empty());
        assert_eq!(store.total_with_status(PaymentStatus::Completed), dec!(0));
    }

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let mut store = PaymentsStore::new();
        let first = store.append(payment("A1", dec!(10), PaymentStatus::Completed)).unwrap().id;
        let second = store.append(payment("A1", dec!(10), PaymentStatus::Completed)).unwrap().id;
        assert_ne!(first, second);
        assert_eq!(first, PaymentId(1));
        assert_eq!(second, PaymentId(2));
        assert_eq!(store.get(second).unwrap().amount, dec!(10));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut store = PaymentsStore::new();
        assert_eq!(
            store.append(payment("A1", dec!(0), PaymentStatus::Completed)).err(),
            Some(Error::AmountMustBePositive)
        );
        assert_eq!(
            store.append(payment("A1", dec!(-5), PaymentStatus::Completed)).err(),
            Some(Error::AmountMustBePositive)
        );
        // Rounds to zero at two decimal places
        assert_eq!(
            store.append(payment("A1", dec!(0.001), PaymentStatus::Completed)).err(),
            Some(Error::AmountMustBePositive)
        );
        assert!(store.as_slice().is_empty());
    }

    #[test]
    fn test_by_student_keeps_insertion_order() {
        let mut store = PaymentsStore::new();
        store.append(payment("A1", dec!(100), PaymentStatus::Completed)).unwrap();
        store.append(payment("B1", dec!(200), PaymentStatus::Completed)).unwrap();
        store.append(payment("a1", dec!(300), PaymentStatus::Pending)).unwrap();

        let amounts: Vec<_> = store.by_student("A1").iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(100), dec!(300)]);
    }

    #[test]
    fn test_total_with_status() {
        let mut store = PaymentsStore::new();
        store.append(payment("A1", dec!(100), PaymentStatus::Completed)).unwrap();
        store.append(payment("A1", dec!(50), PaymentStatus::Pending)).unwrap();
        store.append(payment("A1", dec!(25), PaymentStatus::Failed)).unwrap();
        store.append(payment("B1", dec!(0.50), PaymentStatus::Completed)).unwrap();

        assert_eq!(store.total_with_status(PaymentStatus::Completed), dec!(100.50));
        assert_eq!(store.total_with_status(PaymentStatus::Pending), dec!(50));
        assert_eq!(store.total_with_status(PaymentStatus::Failed), dec!(25));
    }
}
