use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::dto::{FeeCommand, FeeEvent};
use crate::model::{
    Invoice, InvoiceId, InvoiceStatus, NewInvoice, NewPayment, NewStudent, Payment, PaymentId,
    PaymentStatus, Student, StudentId, StudentPatch, StudentStatus,
};
use crate::stats::DashboardStats;
use crate::stores::{InvoicesStore, PaymentsStore, StudentsStore};
use crate::{seed, Error};

/// Change notification delivered to subscribers after a mutation took effect.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    StudentAdded(StudentId),
    StudentUpdated(StudentId),
    StudentDeleted(StudentId),
    PaymentAdded(PaymentId),
    InvoiceAdded(InvoiceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Single source of truth for students, payments and invoices.
///
/// All mutations go through `&mut self` and run to completion; listeners are
/// invoked synchronously once the state has changed, so they always observe the
/// committed state through the read accessors.
pub struct FinanceStore {
    students: StudentsStore,
    payments: PaymentsStore,
    invoices: InvoicesStore,
    listeners: Vec<(SubscriptionId, Listener)>,
    last_subscription: u64,
}

impl Default for FinanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceStore {
    pub fn new() -> Self {
        Self {
            students: StudentsStore::new(),
            payments: PaymentsStore::new(),
            invoices: InvoicesStore::new(),
            listeners: Vec::new(),
            last_subscription: 0,
        }
    }

    /// A store holding the built-in fixture roster.
    pub fn seeded() -> Self {
        Self::with_students(seed::students()).unwrap_or_else(|err| {
            error!(%err, "built-in roster rejected");
            Self::new()
        })
    }

    /// A store holding an imported roster. Ids and statuses are preserved.
    pub fn with_students<I>(students: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Student>,
    {
        let mut store = Self::new();
        for student in students {
            store.students.insert_existing(student)?;
        }
        Ok(store)
    }

    /// Registers a listener called after every effective mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.last_subscription += 1;
        let id = SubscriptionId(self.last_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub fn add_student(&mut self, new: NewStudent) -> Result<StudentId, Error> {
        let id = self.students.insert(new)?;
        debug!(student = %id, "student added");
        self.notify(StoreEvent::StudentAdded(id));
        Ok(id)
    }

    /// Merges the patch into the matching student. Unknown ids are ignored.
    pub fn update_student(&mut self, id: StudentId, patch: StudentPatch) -> Result<(), Error> {
        if self.students.update(id, patch)? {
            debug!(student = %id, "student updated");
            self.notify(StoreEvent::StudentUpdated(id));
        } else {
            debug!(student = %id, "update ignored, no such student");
        }
        Ok(())
    }

    /// Removes the matching student. Unknown ids are ignored.
    pub fn delete_student(&mut self, id: StudentId) {
        if self.students.remove(id).is_some() {
            debug!(student = %id, "student deleted");
            self.notify(StoreEvent::StudentDeleted(id));
        } else {
            debug!(student = %id, "delete ignored, no such student");
        }
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    /// Case-insensitive exact lookup by admission number.
    pub fn student_by_admission(&self, admission_number: &str) -> Option<&Student> {
        self.students.find_by_admission(admission_number)
    }

    /// Records a payment and lowers the paying student's balance by its
    /// amount, never below zero. A payment for an unknown admission number is
    /// still recorded.
    pub fn add_payment(&mut self, new: NewPayment) -> Result<PaymentId, Error> {
        let payment = self.payments.append(new)?;
        let (id, student, amount) = (payment.id, payment.student.clone(), payment.amount);
        match self.students.adjust_balance(student.as_str(), -amount, true) {
            Some(balance) => debug!(payment = %id, %student, %amount, %balance, "payment recorded"),
            None => debug!(payment = %id, %student, %amount, "payment recorded for unknown student"),
        }
        self.notify(StoreEvent::PaymentAdded(id));
        Ok(id)
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.get(id)
    }

    pub fn payments_by_student(&self, admission_number: &str) -> Vec<&Payment> {
        self.payments.by_student(admission_number)
    }

    /// Records an invoice and raises the billed student's balance by its amount.
    pub fn add_invoice(&mut self, new: NewInvoice) -> Result<InvoiceId, Error> {
        let invoice = self.invoices.append(new)?;
        let (id, student, amount) = (invoice.id, invoice.student.clone(), invoice.amount);
        match self.students.adjust_balance(student.as_str(), amount, false) {
            Some(balance) => debug!(invoice = %id, %student, %amount, %balance, "invoice raised"),
            None => debug!(invoice = %id, %student, %amount, "invoice raised for unknown student"),
        }
        self.notify(StoreEvent::InvoiceAdded(id));
        Ok(id)
    }

    /// Validates a fee event row and applies it as a payment or an invoice.
    pub fn apply_event(&mut self, event: FeeEvent) -> Result<(), Error> {
        match FeeCommand::try_from(event)? {
            FeeCommand::Payment(payment) => self.add_payment(payment).map(|_| ()),
            FeeCommand::Invoice(invoice) => self.add_invoice(invoice).map(|_| ()),
        }
    }

    pub fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    pub fn invoices_by_student(&self, admission_number: &str) -> Vec<&Invoice> {
        self.invoices.by_student(admission_number)
    }

    /// Sum of every student's balance as stored. Not floored: a negative
    /// balance loaded from a roster reduces the total.
    pub fn total_outstanding(&self) -> Decimal {
        self.students.iter().map(|s| s.balance).sum()
    }

    /// Students owing a strictly positive amount.
    pub fn students_with_balance(&self) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.balance > Decimal::ZERO)
            .collect()
    }

    /// Sum of completed payments. Pending and failed payments are excluded.
    pub fn total_collected(&self) -> Decimal {
        self.payments.total_with_status(PaymentStatus::Completed)
    }

    /// The last `limit` payments, newest first.
    pub fn recent_payments(&self, limit: usize) -> Vec<&Payment> {
        self.payments.iter().rev().take(limit).collect()
    }

    pub fn students(&self) -> &[Student] {
        self.students.as_slice()
    }

    pub fn payments(&self) -> &[Payment] {
        self.payments.as_slice()
    }

    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.as_slice()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_students: self.students.len(),
            active_students: self
                .students
                .iter()
                .filter(|s| s.status == StudentStatus::Active)
                .count(),
            total_outstanding: self.total_outstanding(),
            total_collected: self.total_collected(),
            pending_payments: self.payments.total_with_status(PaymentStatus::Pending),
            students_with_balance: self.students_with_balance().len(),
            pending_invoices: self.invoices.count_with_status(InvoiceStatus::Pending),
            overdue_invoices: self.invoices.count_with_status(InvoiceStatus::Overdue),
        }
    }
}
