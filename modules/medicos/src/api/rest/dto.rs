use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Address, Medico, MedicoPatch, NewMedico, Specialty};
use crate::domain::error::DomainError;
use crate::domain::validation::{self, FieldViolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialtyDto {
    Orthopedics,
    Cardiology,
    Gynecology,
    Dermatology,
}

/// REST DTO for the embedded address; every part optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressDto {
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

/// REST DTO for registering a physician.
///
/// Required fields are `Option` so a missing one is reported as a field
/// violation instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMedicoReq {
    #[schema(example = "Ana Souza")]
    pub name: Option<String>,
    /// 4 to 6 digits
    #[schema(example = "123456")]
    pub document_id: Option<String>,
    #[schema(example = "ana.souza@vollmed.med")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<SpecialtyDto>,
    pub address: Option<AddressDto>,
}

/// REST DTO for a partial update; only name, phone and address are mutable
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicoReq {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressDto>,
}

/// List item projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicoSummaryDto {
    pub id: i64,
    pub name: String,
    pub document_id: String,
    pub specialty: SpecialtyDto,
    pub email: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<SpecialtyDto> for Specialty {
    fn from(s: SpecialtyDto) -> Self {
        match s {
            SpecialtyDto::Orthopedics => Self::Orthopedics,
            SpecialtyDto::Cardiology => Self::Cardiology,
            SpecialtyDto::Gynecology => Self::Gynecology,
            SpecialtyDto::Dermatology => Self::Dermatology,
        }
    }
}

impl From<Specialty> for SpecialtyDto {
    fn from(s: Specialty) -> Self {
        match s {
            Specialty::Orthopedics => Self::Orthopedics,
            Specialty::Cardiology => Self::Cardiology,
            Specialty::Gynecology => Self::Gynecology,
            Specialty::Dermatology => Self::Dermatology,
        }
    }
}

impl From<AddressDto> for Address {
    fn from(a: AddressDto) -> Self {
        Self {
            street: a.street,
            number: a.number,
            complement: a.complement,
            district: a.district,
            city: a.city,
            zip: a.zip,
        }
    }
}

impl From<Medico> for MedicoSummaryDto {
    fn from(m: Medico) -> Self {
        Self {
            id: m.id,
            name: m.name,
            document_id: m.document_id,
            specialty: m.specialty.into(),
            email: m.email,
        }
    }
}

impl RegisterMedicoReq {
    /// Check presence and format of every field, reporting all violations together.
    pub fn into_new_medico(self) -> Result<NewMedico, DomainError> {
        let name = self.name.unwrap_or_default();
        let document_id = self.document_id.unwrap_or_default();
        let email = self.email.unwrap_or_default();

        let mut violations = Vec::new();
        validation::check_name(&name, &mut violations);
        validation::check_document_id(&document_id, &mut violations);
        validation::check_email(&email, &mut violations);

        let specialty = match self.specialty {
            Some(s) => Some(s.into()),
            None => {
                violations.push(FieldViolation::new("specialty", "must not be null"));
                None
            }
        };

        match specialty {
            Some(specialty) if violations.is_empty() => Ok(NewMedico {
                name,
                document_id,
                email,
                phone: self.phone,
                specialty,
                address: self.address.map(Into::into),
            }),
            _ => Err(DomainError::validation(violations)),
        }
    }
}

impl UpdateMedicoReq {
    /// Split into the target id and the patch. `id` is the only required field.
    pub fn into_parts(self) -> Result<(i64, MedicoPatch), DomainError> {
        let id = self.id.ok_or_else(|| {
            DomainError::validation(vec![FieldViolation::new("id", "must not be null")])
        })?;
        Ok((
            id,
            MedicoPatch {
                name: self.name,
                phone: self.phone,
                address: self.address.map(Into::into),
            },
        ))
    }
}
