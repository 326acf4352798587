pub mod client;
pub mod error;
pub mod model;

pub use client::MedicosApi;
pub use error::MedicosError;
pub use model::{Address, Medico, MedicoPatch, NewMedico, Specialty};
