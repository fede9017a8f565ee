use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validation::max_length;

/// Personal data shared by curators and students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub last_name: String,
    pub patronymic: String,
    pub description: String,
}

impl Person {
    pub fn validate(&self) -> Result<(), DomainError> {
        max_length("name", &self.name, 35)?;
        max_length("last_name", &self.last_name, 35)?;
        max_length("patronymic", &self.patronymic, 35)?;
        max_length("description", &self.description, 200)
    }

    /// Login name generated for seeded accounts.
    #[must_use]
    pub fn username(&self) -> String {
        format!("{}.{}.{}", self.name, self.last_name, self.patronymic)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn person() -> Person {
        Person {
            name: "Anna".to_owned(),
            last_name: "Petrova".to_owned(),
            patronymic: "Igorevna".to_owned(),
            description: "robotics".to_owned(),
        }
    }

    #[test]
    fn username_joins_names() {
        assert_eq!(person().username(), "Anna.Petrova.Igorevna");
    }

    #[test]
    fn long_description_is_rejected() {
        let mut person = person();
        person.description = "x".repeat(201);
        assert_eq!(
            person.validate(),
            Err(DomainError::TooLong {
                field: "description",
                max: 200
            })
        );
    }
}
