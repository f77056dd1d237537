//! Client-side event filtering for `events search`.

use crate::model::Event;
use strum::{Display, EnumString, VariantNames};

/// Event fields that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(ascii_case_insensitive)]
pub enum SearchField {
    #[strum(serialize = "serialNumber")]
    SerialNumber,
    #[strum(serialize = "deviceName")]
    DeviceName,
    #[strum(serialize = "birdName")]
    BirdName,
}

impl SearchField {
    /// Case-insensitive match. Serial numbers must match exactly, names
    /// match on substring.
    pub fn matches(&self, event: &Event, term: &str) -> bool {
        let term = term.to_lowercase();
        match self {
            SearchField::SerialNumber => event.serial_number.to_lowercase() == term,
            SearchField::DeviceName => event.device_name.to_lowercase().contains(&term),
            SearchField::BirdName => event.bird_name.to_lowercase().contains(&term),
        }
    }
}

/// Match by field name. An unknown field never matches.
pub fn matches_search(event: &Event, field: &str, term: &str) -> bool {
    match field.parse::<SearchField>() {
        Ok(field) => field.matches(event, term),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            serial_number: "ABC123".to_string(),
            device_name: "Backyard Feeder".to_string(),
            bird_name: "Blue Jay".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_serial_number_is_exact() {
        assert!(matches_search(&event(), "serialNumber", "abc123"));
        assert!(!matches_search(&event(), "serialNumber", "ABC"));
    }

    #[test]
    fn test_names_match_substrings() {
        assert!(matches_search(&event(), "deviceName", "YARD"));
        assert!(matches_search(&event(), "birdName", "jay"));
        assert!(!matches_search(&event(), "birdName", "crow"));
    }

    #[test]
    fn test_field_name_is_case_insensitive() {
        assert!(matches_search(&event(), "DEVICENAME", "feeder"));
        assert!(matches_search(&event(), "birdname", "blue"));
    }

    #[test]
    fn test_unknown_field_never_matches() {
        assert!(!matches_search(&event(), "adminName", ""));
        assert!(!matches_search(&event(), "", "Blue Jay"));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(
            SearchField::VARIANTS,
            &["serialNumber", "deviceName", "birdName"]
        );
        assert_eq!(SearchField::BirdName.to_string(), "birdName");
    }
}
