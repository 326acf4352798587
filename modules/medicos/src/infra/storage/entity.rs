use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "medicos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub document_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub specialty: SpecialtyColumn,
    pub address_street: Option<String>,
    pub address_number: Option<String>,
    pub address_complement: Option<String>,
    pub address_district: Option<String>,
    pub address_city: Option<String>,
    pub address_zip: Option<String>,
    pub active: bool,
}

/// Specialty as stored: its upper-case name in a string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum SpecialtyColumn {
    #[sea_orm(string_value = "ORTHOPEDICS")]
    Orthopedics,
    #[sea_orm(string_value = "CARDIOLOGY")]
    Cardiology,
    #[sea_orm(string_value = "GYNECOLOGY")]
    Gynecology,
    #[sea_orm(string_value = "DERMATOLOGY")]
    Dermatology,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
