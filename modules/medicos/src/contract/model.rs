/// Medical specialty of a physician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialty {
    Orthopedics,
    Cardiology,
    Gynecology,
    Dermatology,
}

impl Specialty {
    pub const ALL: [Specialty; 4] = [
        Specialty::Orthopedics,
        Specialty::Cardiology,
        Specialty::Gynecology,
        Specialty::Dermatology,
    ];

    /// Wire and storage name, e.g. `CARDIOLOGY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Orthopedics => "ORTHOPEDICS",
            Specialty::Cardiology => "CARDIOLOGY",
            Specialty::Gynecology => "GYNECOLOGY",
            Specialty::Dermatology => "DERMATOLOGY",
        }
    }
}

/// Postal address embedded in a physician record. Every part is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.complement.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.zip.is_none()
    }

    /// Overwrite each part for which `patch` carries a non-blank value.
    pub fn merge(&mut self, patch: &Address) {
        merge_field(&mut self.street, &patch.street);
        merge_field(&mut self.number, &patch.number);
        merge_field(&mut self.complement, &patch.complement);
        merge_field(&mut self.district, &patch.district);
        merge_field(&mut self.city, &patch.city);
        merge_field(&mut self.zip, &patch.zip);
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn merge_field(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = non_blank(value) {
        *target = Some(v.to_owned());
    }
}

/// Physician record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medico {
    pub id: i64,
    pub name: String,
    pub document_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: Specialty,
    pub address: Option<Address>,
    pub active: bool,
}

impl Medico {
    /// Partial update of the mutable fields: name, phone and address parts.
    /// Missing or blank values leave the current value untouched.
    pub fn apply_update(&mut self, patch: &MedicoPatch) {
        if let Some(name) = non_blank(&patch.name) {
            self.name = name.to_owned();
        }
        merge_field(&mut self.phone, &patch.phone);

        if let Some(addr) = &patch.address {
            match self.address.as_mut() {
                Some(current) => current.merge(addr),
                None => {
                    let mut fresh = Address::default();
                    fresh.merge(addr);
                    if !fresh.is_empty() {
                        self.address = Some(fresh);
                    }
                }
            }
        }
    }

    /// Soft delete. Idempotent.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Data for registering a physician. `id` and `active` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedico {
    pub name: String,
    pub document_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: Specialty,
    pub address: Option<Address>,
}

/// Partial update data for a physician
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MedicoPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}
