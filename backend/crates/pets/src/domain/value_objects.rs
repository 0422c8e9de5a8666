//! Value Objects

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetType {
    #[display("DOG")]
    Dog,
    #[display("CAT")]
    Cat,
}

impl PetType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DOG" => Some(PetType::Dog),
            "CAT" => Some(PetType::Cat),
            _ => None,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    #[display("MALE")]
    Male,
    #[display("FEMALE")]
    Female,
}

impl Sex {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MALE" => Some(Sex::Male),
            "FEMALE" => Some(Sex::Female),
            _ => None,
        }
    }
}
