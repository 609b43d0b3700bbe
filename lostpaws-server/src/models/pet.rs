//! Pet listing enums
//!
//! The datastore keeps the original Portuguese labels and enforces them
//! with CHECK constraints. These enums are the typed counterpart: every
//! row and every request field passes through `parse`, so an invalid
//! label can never reach an entity.

use std::fmt;

use super::ValidationError;

/// Species of a listed pet. Stored as 'Cachorro', 'Gato', or 'Outros'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Dog,
    Cat,
    Other,
}

impl Species {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "Cachorro",
            Self::Cat => "Gato",
            Self::Other => "Outros",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "Cachorro" => Ok(Self::Dog),
            "Gato" => Ok(Self::Cat),
            "Outros" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidVariant {
                field: "especie",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a listing announces a found or a lost pet.
/// Stored as 'Achado' or 'Perdido'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetStatus {
    Found,
    Lost,
}

impl PetStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "Achado",
            Self::Lost => "Perdido",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "Achado" => Ok(Self::Found),
            "Perdido" => Ok(Self::Lost),
            _ => Err(ValidationError::InvalidVariant {
                field: "situacao",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sex of a listed pet. Stored as 'Macho' or 'Fêmea'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Macho",
            Self::Female => "Fêmea",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "Macho" => Ok(Self::Male),
            "Fêmea" => Ok(Self::Female),
            _ => Err(ValidationError::InvalidVariant {
                field: "sexo",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
