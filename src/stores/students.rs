use rust_decimal::Decimal;

use crate::model::{NewStudent, Student, StudentId, StudentPatch, StudentStatus};
use crate::{money, Error};

/// Student roster, kept in enrollment order.
#[derive(Debug, Default)]
pub struct StudentsStore {
    students: Vec<Student>,
}

impl StudentsStore {
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
        }
    }

    /// Next id to hand out: one past the highest id on the roster, or 1.
    pub fn next_id(&self) -> StudentId {
        let max = self.students.iter().map(|s| s.id.0).max().unwrap_or(0);
        StudentId(max + 1)
    }

    /// Checks that no student other than `except` holds the admission number.
    pub fn check_admission_free(
        &self,
        admission_number: &str,
        except: Option<StudentId>,
    ) -> Result<(), Error> {
        let taken = self
            .students
            .iter()
            .any(|s| Some(s.id) != except && s.admission_number.matches(admission_number));
        if taken {
            return Err(Error::DuplicateAdmissionNumber(admission_number.to_string()));
        }
        Ok(())
    }

    /// Enrolls a new student with the next id and an Active status.
    pub fn insert(&mut self, new: NewStudent) -> Result<StudentId, Error> {
        self.check_admission_free(new.admission_number.as_str(), None)?;
        let id = self.next_id();
        self.students.push(Student {
            id,
            name: new.name,
            class: new.class,
            admission_number: new.admission_number,
            balance: money::round(new.balance),
            status: StudentStatus::Active,
            guardian_name: new.guardian_name,
            guardian_phone: new.guardian_phone,
            guardian_email: new.guardian_email,
        });
        Ok(id)
    }

    /// Inserts an already identified student, e.g. from a roster import.
    /// Id and status are kept as given.
    pub fn insert_existing(&mut self, mut student: Student) -> Result<(), Error> {
        if self.get(student.id).is_some() {
            return Err(Error::DuplicateStudentId(student.id.0));
        }
        self.check_admission_free(student.admission_number.as_str(), None)?;
        student.balance = money::round(student.balance);
        self.students.push(student);
        Ok(())
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub fn find_by_admission(&self, admission_number: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|s| s.admission_number.matches(admission_number))
    }

    pub fn find_by_admission_mut(&mut self, admission_number: &str) -> Option<&mut Student> {
        self.students
            .iter_mut()
            .find(|s| s.admission_number.matches(admission_number))
    }

    /// Merges the patch into the matching student.
    /// Returns `Ok(false)` when no student has the id.
    pub fn update(&mut self, id: StudentId, patch: StudentPatch) -> Result<bool, Error> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        if let Some(admission_number) = &patch.admission_number {
            self.check_admission_free(admission_number.as_str(), Some(id))?;
        }
        match self.get_mut(id) {
            Some(student) => {
                patch.apply(student);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: StudentId) -> Option<Student> {
        let index = self.students.iter().position(|s| s.id == id)?;
        Some(self.students.remove(index))
    }

    /// Adds `delta` to the balance of the student holding the admission number,
    /// flooring the result at zero when `floor_at_zero` is set.
    /// Returns the new balance, or `None` when no student matches.
    pub fn adjust_balance(
        &mut self,
        admission_number: &str,
        delta: Decimal,
        floor_at_zero: bool,
    ) -> Option<Decimal> {
        let student = self.find_by_admission_mut(admission_number)?;
        let mut balance = money::round(student.balance + delta);
        if floor_at_zero && balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }
        student.balance = balance;
        Some(balance)
    }

    pub fn as_slice(&self) -> &[Student] {
        &self.students
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }
}
