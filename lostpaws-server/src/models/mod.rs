//! Domain models shared by the database and HTTP layers

pub mod pet;
pub mod validation;

pub use pet::{PetStatus, Sex, Species};
pub use validation::ValidationError;
