use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value of a non-file form field. A name sent once stays a plain string;
/// a name sent repeatedly collects every value in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// The value as a single string, when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s.as_str()),
            FieldValue::Multiple(_) => None,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                *self = FieldValue::Multiple(vec![std::mem::take(first), value]);
            }
            FieldValue::Multiple(values) => values.push(value),
        }
    }
}

/// Non-file form fields of a multipart request, in the order their names first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, FieldValue)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field value; repeated names turn into arrays.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((name, FieldValue::Single(value))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FormFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_names_collect_into_array() {
        let mut fields = FormFields::new();
        fields.insert("tag", "a");
        fields.insert("event", "test");
        fields.insert("tag", "b");
        fields.insert("tag", "c");

        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields.get("tag"),
            Some(&FieldValue::Multiple(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ]))
        );
        assert_eq!(fields.get("event").and_then(|v| v.as_str()), Some("test"));
    }

    #[test]
    fn test_serializes_as_object_in_first_seen_order() {
        let mut fields = FormFields::new();
        fields.insert("zeta", "1");
        fields.insert("alpha", "2");
        fields.insert("zeta", "3");

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"zeta":["1","3"],"alpha":"2"}"#);
    }
}
