use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SEPARATOR: &str = ", ";

/// A set of co-assignees, stored by the legacy panel as `"Ana, Bruno"`.
///
/// Deserializes from either the joined string or a JSON list and always
/// serializes back to the joined form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Assignees(Vec<String>);

impl Assignees {
    /// Split on `", "`, trim each segment and drop empty ones.
    pub fn parse(joined: &str) -> Self {
        Self::from_names(joined.split(SEPARATOR))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    /// Case-insensitive substring match against any of the names.
    pub fn any_matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.iter().any(|n| n.to_lowercase().contains(&needle))
    }

    pub fn joined(&self) -> String {
        self.0.join(SEPARATOR)
    }
}

impl std::fmt::Display for Assignees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<&str> for Assignees {
    fn from(joined: &str) -> Self {
        Self::parse(joined)
    }
}

impl Serialize for Assignees {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for Assignees {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
            Missing(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(joined) => Assignees::parse(&joined),
            Raw::List(names) => Assignees::from_names(names),
            Raw::Missing(()) => Assignees::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_empty_segments() {
        let assignees = Assignees::parse("Ana,  Bruno , , Carla");
        assert_eq!(assignees.iter().collect::<Vec<_>>(), vec!["Ana", "Bruno", "Carla"]);

        // only ", " separates names
        let assignees = Assignees::parse("Ana,Bruno");
        assert_eq!(assignees.iter().collect::<Vec<_>>(), vec!["Ana,Bruno"]);

        let assignees = Assignees::parse(" Ana, Bruno, ");
        assert_eq!(assignees.iter().collect::<Vec<_>>(), vec!["Ana", "Bruno"]);
        assert!(Assignees::parse("").is_empty());
    }

    #[test]
    fn accepts_string_list_or_null() {
        let from_str: Assignees = serde_json::from_str(r#""Ana, Bruno""#).unwrap();
        let from_list: Assignees = serde_json::from_str(r#"["Ana", " Bruno "]"#).unwrap();
        let from_null: Assignees = serde_json::from_str("null").unwrap();

        assert_eq!(from_str, from_list);
        assert!(from_null.is_empty());
        assert_eq!(serde_json::to_string(&from_list).unwrap(), r#""Ana, Bruno""#);
    }

    #[test]
    fn substring_match_ignores_case() {
        let assignees = Assignees::parse("Ana Costa, João Silva");
        assert!(assignees.any_matches("joão"));
        assert!(assignees.any_matches("COSTA"));
        assert!(!assignees.any_matches("Pedro"));
    }
}
