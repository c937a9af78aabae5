use std::fmt;

/// Ordered query string pairs; serializes in insertion order the way a
/// browser `URLSearchParams` does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.append(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish();
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let params = QueryParams::new()
            .with("pageNumber", 1)
            .with("pageSize", 2)
            .with("isGoing", true);

        assert_eq!(params.to_string(), "pageNumber=1&pageSize=2&isGoing=true");
        assert_eq!(params.get("pageSize"), Some("2"));
    }

    #[test]
    fn encodes_reserved_characters() {
        let params = QueryParams::new().with("startDate", "2024-01-01T00:00:00.000Z");

        assert_eq!(params.to_string(), "startDate=2024-01-01T00%3A00%3A00.000Z");
    }
}
