//! Data models for the equipment tracker

pub mod client;
pub mod counter;
pub mod equipment;
pub mod stats;

// Re-export commonly used types
pub use client::{Client, ClientPatch, CreateClient, NewClient, UpdateClient};
pub use counter::EquipmentCounter;
pub use equipment::{
    CreateEquipment, Equipment, EquipmentFilter, EquipmentPatch, EquipmentQuery, EquipmentType,
    NewEquipment, UpdateEquipment,
};
pub use stats::StatsSummary;

use crate::error::FieldError;

/// Trim a required text field, recording an error when nothing is left
pub(crate) fn required_text(
    field: &str,
    value: String,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
    }
    trimmed.to_string()
}

/// Blank strings count as absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Patch semantics for nullable text: absent keeps, blank clears, anything else sets
pub(crate) fn patch_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| optional_text(Some(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some("   ".into())), None);
        assert_eq!(optional_text(Some(" Ana ".into())), Some("Ana".into()));
    }

    #[test]
    fn test_patch_text() {
        assert_eq!(patch_text(None), None);
        assert_eq!(patch_text(Some(String::new())), Some(None));
        assert_eq!(patch_text(Some("x".into())), Some(Some("x".into())));
    }

    #[test]
    fn test_required_text_records_error() {
        let mut errors = Vec::new();
        assert_eq!(required_text("brand", " Dell ".into(), &mut errors), "Dell");
        assert!(errors.is_empty());
        required_text("model", "  ".into(), &mut errors);
        assert_eq!(errors, vec![FieldError::new("model", "model is required")]);
    }
}
