use rust_decimal::Decimal;
use std::fmt;

use crate::money::format_amount;

/// Aggregate figures shown on the finance dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_students: usize,
    pub active_students: usize,
    pub total_outstanding: Decimal,
    pub total_collected: Decimal,
    pub pending_payments: Decimal,
    pub students_with_balance: usize,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "students: {} ({} active, {} with balance)",
            self.total_students, self.active_students, self.students_with_balance
        )?;
        writeln!(f, "outstanding: {}", format_amount(self.total_outstanding))?;
        writeln!(
            f,
            "collected: {} ({} pending)",
            format_amount(self.total_collected),
            format_amount(self.pending_payments)
        )?;
        write!(
            f,
            "invoices: {} pending, {} overdue",
            self.pending_invoices, self.overdue_invoices
        )
    }
}
