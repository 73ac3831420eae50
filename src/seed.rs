//! Built-in fixture roster used when no roster file is supplied.

use rust_decimal::Decimal;

use crate::model::{AdmissionNumber, Student, StudentId, StudentStatus};

// (name, class, admission number, balance, guardian, phone, email)
const ROSTER: &[(&str, &str, &str, i64, &str, &str, &str)] = &[
    (
        "Amani Wanjiru",
        "Grade 4",
        "NA2024001",
        15_000,
        "Grace Wanjiru",
        "+254712345678",
        "grace.wanjiru@example.com",
    ),
    (
        "Baraka Otieno",
        "Grade 6",
        "NA2024002",
        0,
        "Peter Otieno",
        "+254723456789",
        "peter.otieno@example.com",
    ),
    (
        "Chebet Kiprono",
        "Grade 2",
        "NA2024003",
        22_500,
        "Ruth Kiprono",
        "+254734567890",
        "ruth.kiprono@example.com",
    ),
    (
        "David Mwangi",
        "Grade 8",
        "NA2024004",
        8_000,
        "Jane Mwangi",
        "+254745678901",
        "jane.mwangi@example.com",
    ),
    (
        "Esther Achieng",
        "Grade 5",
        "NA2024005",
        0,
        "Tom Achieng",
        "+254756789012",
        "tom.achieng@example.com",
    ),
];

pub fn students() -> Vec<Student> {
    ROSTER
        .iter()
        .enumerate()
        .map(
            |(i, (name, class, admission, balance, guardian, phone, email))| Student {
                id: StudentId(i as u32 + 1),
                name: name.to_string(),
                class: class.to_string(),
                admission_number: AdmissionNumber::new(*admission),
                balance: Decimal::from(*balance),
                status: StudentStatus::Active,
                guardian_name: guardian.to_string(),
                guardian_phone: phone.to_string(),
                guardian_email: email.to_string(),
            },
        )
        .collect()
}
