use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Office {
    pub name: String,
    pub address: String,
}

impl Office {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown roommate {name:?}, known offices are: {known}")]
pub struct UnknownOfficeError {
    name: String,
    known: String,
}

/// Roommate name to office address, in insertion order.
#[derive(Debug, Clone)]
pub struct OfficeRegistry {
    offices: Vec<Office>,
}

pub const DEFAULT_ROOMMATES: [&str; 3] = ["Andrew", "Jack", "Trevor"];

impl Default for OfficeRegistry {
    fn default() -> Self {
        Self::new(vec![
            Office::new(
                "Jack",
                "Wavestone, 130 W 42nd St Floor 17, New York, NY 10036",
            ),
            Office::new("Andrew", "85 Broad St, New York, NY 10004"),
            Office::new("Andrew_Brooklyn1", "77 Sands St, Brooklyn, NY 11201"),
            // ~8 minutes further than Andrew_Brooklyn1
            Office::new("Andrew_Brooklyn2", "195 Montague St, Brooklyn, NY 11201"),
            Office::new("Trevor", "350 5th Ave #5100, New York, NY 10118"),
        ])
    }
}

impl OfficeRegistry {
    pub fn new(offices: Vec<Office>) -> Self {
        Self { offices }
    }

    pub fn get(&self, name: &str) -> Option<&Office> {
        self.offices.iter().find(|office| office.name == name)
    }

    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    /// Resolves every roommate to its office, keeping the roommates order.
    pub fn resolve<S: AsRef<str>>(&self, roommates: &[S]) -> Result<Vec<Office>, UnknownOfficeError> {
        roommates
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .cloned()
                    .ok_or_else(|| UnknownOfficeError {
                        name: name.as_ref().to_string(),
                        known: self
                            .offices
                            .iter()
                            .map(|office| office.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roommates_are_known() {
        let registry = OfficeRegistry::default();
        let offices = registry.resolve(&DEFAULT_ROOMMATES).unwrap();

        assert_eq!(offices.len(), 3);
        assert_eq!(offices[0].name, "Andrew");
        assert_eq!(offices[0].address, "85 Broad St, New York, NY 10004");
        assert_eq!(offices[2].address, "350 5th Ave #5100, New York, NY 10118");
    }

    #[test]
    fn test_resolve_unknown_roommate() {
        let registry = OfficeRegistry::default();
        let error = registry.resolve(&["Jack", "Zoe"]).unwrap_err();

        let message = error.to_string();
        assert!(message.contains("\"Zoe\""));
        assert!(message.contains("Andrew_Brooklyn1"));
    }
}
