use sea_orm::{ActiveValue::NotSet, Set};

use crate::contract::model::{Address, Medico, NewMedico, Specialty};
use crate::infra::storage::entity::{ActiveModel, Model, SpecialtyColumn};

impl From<Specialty> for SpecialtyColumn {
    fn from(s: Specialty) -> Self {
        match s {
            Specialty::Orthopedics => Self::Orthopedics,
            Specialty::Cardiology => Self::Cardiology,
            Specialty::Gynecology => Self::Gynecology,
            Specialty::Dermatology => Self::Dermatology,
        }
    }
}

impl From<SpecialtyColumn> for Specialty {
    fn from(s: SpecialtyColumn) -> Self {
        match s {
            SpecialtyColumn::Orthopedics => Self::Orthopedics,
            SpecialtyColumn::Cardiology => Self::Cardiology,
            SpecialtyColumn::Gynecology => Self::Gynecology,
            SpecialtyColumn::Dermatology => Self::Dermatology,
        }
    }
}

/// Convert a database row to a contract model. All-null address columns read as no address.
impl From<Model> for Medico {
    fn from(m: Model) -> Self {
        let address = Address {
            street: m.address_street,
            number: m.address_number,
            complement: m.address_complement,
            district: m.address_district,
            city: m.address_city,
            zip: m.address_zip,
        };
        Medico {
            id: m.id,
            name: m.name,
            document_id: m.document_id,
            email: m.email,
            phone: m.phone,
            specialty: m.specialty.into(),
            address: (!address.is_empty()).then_some(address),
            active: m.active,
        }
    }
}

/// Full-row active model; `id` is left unset for inserts.
pub fn to_active_model(m: &Medico) -> ActiveModel {
    let addr = m.address.clone().unwrap_or_default();
    ActiveModel {
        id: Set(m.id),
        name: Set(m.name.clone()),
        document_id: Set(m.document_id.clone()),
        email: Set(m.email.clone()),
        phone: Set(m.phone.clone()),
        specialty: Set(m.specialty.into()),
        address_street: Set(addr.street),
        address_number: Set(addr.number),
        address_complement: Set(addr.complement),
        address_district: Set(addr.district),
        address_city: Set(addr.city),
        address_zip: Set(addr.zip),
        active: Set(m.active),
    }
}

pub fn new_active_model(n: NewMedico) -> ActiveModel {
    let addr = n.address.unwrap_or_default();
    ActiveModel {
        id: NotSet,
        name: Set(n.name),
        document_id: Set(n.document_id),
        email: Set(n.email),
        phone: Set(n.phone),
        specialty: Set(n.specialty.into()),
        address_street: Set(addr.street),
        address_number: Set(addr.number),
        address_complement: Set(addr.complement),
        address_district: Set(addr.district),
        address_city: Set(addr.city),
        address_zip: Set(addr.zip),
        active: Set(true),
    }
}
