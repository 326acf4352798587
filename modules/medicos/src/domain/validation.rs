//! Field checks for physician input. Each check appends to a violation list
//! so callers can report every problem of a request at once.

use std::fmt;

use validator::ValidateEmail;

use crate::contract::model::NewMedico;

pub const DOCUMENT_ID_MIN_DIGITS: usize = 4;
pub const DOCUMENT_ID_MAX_DIGITS: usize = 6;

/// One invalid input field. `field` uses the JSON name, dotted for nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn check_name(name: &str, out: &mut Vec<FieldViolation>) {
    if is_blank(name) {
        out.push(FieldViolation::new("name", "must not be blank"));
    }
}

pub fn check_document_id(document_id: &str, out: &mut Vec<FieldViolation>) {
    if is_blank(document_id) {
        out.push(FieldViolation::new("documentId", "must not be blank"));
        return;
    }
    let len = document_id.len();
    let digits_only = document_id.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || !(DOCUMENT_ID_MIN_DIGITS..=DOCUMENT_ID_MAX_DIGITS).contains(&len) {
        out.push(FieldViolation::new(
            "documentId",
            format!("must be {DOCUMENT_ID_MIN_DIGITS} to {DOCUMENT_ID_MAX_DIGITS} digits"),
        ));
    }
}

pub fn check_email(email: &str, out: &mut Vec<FieldViolation>) {
    if is_blank(email) {
        out.push(FieldViolation::new("email", "must not be blank"));
    } else if !email.validate_email() {
        out.push(FieldViolation::new("email", "must be a well-formed email address"));
    }
}

/// Registration checks for already-typed input (specialty is guaranteed by the type).
pub fn validate_new_medico(new_medico: &NewMedico) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    check_name(&new_medico.name, &mut out);
    check_document_id(&new_medico.document_id, &mut out);
    check_email(&new_medico.email, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Specialty;

    fn new_medico(document_id: &str, email: &str) -> NewMedico {
        NewMedico {
            name: "Carlos Lima".into(),
            document_id: document_id.into(),
            email: email.into(),
            phone: None,
            specialty: Specialty::Orthopedics,
            address: None,
        }
    }

    #[test]
    fn valid_input_has_no_violations() {
        assert!(validate_new_medico(&new_medico("1234", "carlos@vollmed.med")).is_empty());
        assert!(validate_new_medico(&new_medico("123456", "c.lima@clinic.com.br")).is_empty());
    }

    #[test]
    fn document_id_must_be_four_to_six_digits() {
        for bad in ["123", "1234567", "12a4", "12 34"] {
            let v = validate_new_medico(&new_medico(bad, "carlos@vollmed.med"));
            assert_eq!(v.len(), 1, "{bad}");
            assert_eq!(v[0].field, "documentId");
        }
    }

    #[test]
    fn email_must_be_well_formed() {
        let v = validate_new_medico(&new_medico("1234", "not-an-email"));
        assert_eq!(v, vec![FieldViolation::new("email", "must be a well-formed email address")]);
    }

    #[test]
    fn blank_fields_each_reported_once() {
        let mut input = new_medico(" ", "");
        input.name = String::new();
        let fields: Vec<_> = validate_new_medico(&input)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, ["name", "documentId", "email"]);
    }
}
