use chrono::{DateTime, SecondsFormat, Utc};
use huddle_api::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKey {
    All,
    IsGoing,
    IsHost,
    StartDate,
}

impl PredicateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateKey::All => "all",
            PredicateKey::IsGoing => "isGoing",
            PredicateKey::IsHost => "isHost",
            PredicateKey::StartDate => "startDate",
        }
    }
}

/// One change to the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateFilter {
    All,
    IsGoing,
    IsHost,
    StartDate(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredicateValue {
    Flag,
    Date(DateTime<Utc>),
}

/// Filter sent with every list request. `all`, `isGoing` and `isHost`
/// exclude each other, `startDate` combines with any of them. Entries keep
/// insertion order and a replaced entry moves to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    entries: Vec<(PredicateKey, PredicateValue)>,
}

impl Default for Predicate {
    fn default() -> Self {
        Self {
            entries: vec![(PredicateKey::All, PredicateValue::Flag)],
        }
    }
}

impl Predicate {
    pub fn apply(&mut self, filter: PredicateFilter) {
        let (key, value) = match filter {
            PredicateFilter::All => (PredicateKey::All, PredicateValue::Flag),
            PredicateFilter::IsGoing => (PredicateKey::IsGoing, PredicateValue::Flag),
            PredicateFilter::IsHost => (PredicateKey::IsHost, PredicateValue::Flag),
            PredicateFilter::StartDate(date) => (PredicateKey::StartDate, PredicateValue::Date(date)),
        };

        if key == PredicateKey::StartDate {
            self.entries.retain(|(k, _)| *k != PredicateKey::StartDate);
        } else {
            self.entries.retain(|(k, _)| *k == PredicateKey::StartDate);
        }
        self.entries.push((key, value));
    }

    pub fn keys(&self) -> impl Iterator<Item = PredicateKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn contains(&self, key: PredicateKey) -> bool {
        self.keys().any(|k| k == key)
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().find_map(|(_, v)| match v {
            PredicateValue::Date(date) => Some(*date),
            PredicateValue::Flag => None,
        })
    }

    /// Appends every entry; dates are written as ISO-8601 UTC with millisecond precision.
    pub fn append_to(&self, params: &mut QueryParams) {
        for (key, value) in self.entries.iter() {
            match value {
                PredicateValue::Flag => params.append(key.as_str(), true),
                PredicateValue::Date(date) => params.append(
                    key.as_str(),
                    date.to_rfc3339_opts(SecondsFormat::Millis, true),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn keys(predicate: &Predicate) -> Vec<&'static str> {
        predicate.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn defaults_to_all() {
        assert_eq!(keys(&Predicate::default()), ["all"]);
    }

    #[test]
    fn flags_replace_each_other() {
        let mut predicate = Predicate::default();

        predicate.apply(PredicateFilter::IsGoing);
        assert_eq!(keys(&predicate), ["isGoing"]);

        predicate.apply(PredicateFilter::IsHost);
        assert_eq!(keys(&predicate), ["isHost"]);
    }

    #[test]
    fn start_date_combines_and_survives_flag_changes() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut predicate = Predicate::default();

        predicate.apply(PredicateFilter::StartDate(date));
        assert_eq!(keys(&predicate), ["all", "startDate"]);

        predicate.apply(PredicateFilter::IsHost);
        assert_eq!(keys(&predicate), ["startDate", "isHost"]);
        assert_eq!(predicate.start_date(), Some(date));
    }

    #[test]
    fn replacing_start_date_moves_it_last() {
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut predicate = Predicate::default();
        predicate.apply(PredicateFilter::StartDate(first));
        predicate.apply(PredicateFilter::IsGoing);

        predicate.apply(PredicateFilter::StartDate(second));

        assert_eq!(keys(&predicate), ["isGoing", "startDate"]);
        assert_eq!(predicate.start_date(), Some(second));
    }

    #[test]
    fn start_date_serializes_as_iso_timestamp() {
        let mut predicate = Predicate::default();
        predicate.apply(PredicateFilter::StartDate(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        ));
        let mut params = QueryParams::new();

        predicate.append_to(&mut params);

        assert_eq!(params.get("all"), Some("true"));
        assert_eq!(params.get("startDate"), Some("2024-01-01T09:30:00.000Z"));
    }
}
