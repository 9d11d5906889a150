//! # Records
//!
//! Data model shared between the server and the portal.
//!
//! Everything here is plain serde data so the same types decode on both sides of the wire.
//! Field names follow the JSON contract (`camelCase`), except the treatment plan whose
//! keys are `snake_case`.
//!
//!
//!
//! ## Ownership
//! - Appointments and track entries carry the owning `userId`
//! - Neither is ever updated or deleted once stored
//!
//!
//!
//! ## Doctors
//! The directory is fixed and read-only, see [`doctor_directory`].
pub mod models;
pub mod payloads;

use models::Doctor;

const DIRECTORY: [(&str, &str, &str); 3] = [
    ("d1", "Dr. Alice Nguyen", "Neurology"),
    ("d2", "Dr. Ben Carter", "Internal Medicine"),
    ("d3", "Dr. Sara Patel", "Family Medicine"),
];

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

pub fn doctor_directory() -> Vec<Doctor> {
    DIRECTORY
        .iter()
        .map(|(id, name, specialty)| Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
        })
        .collect()
}
