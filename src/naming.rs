//! Display names for equipment
//!
//! Every equipment record gets a name made of a one-letter type prefix and
//! the counter value for its type, zero-padded to at least four digits:
//! `P0001` for the first computer, `N0012` for the twelfth UPS unit.
//! Values past 9999 simply grow longer (`P10000`).

use crate::models::EquipmentType;

/// Minimum number of digits in the numeric part
pub const MIN_DIGITS: usize = 4;

/// Letter that starts every name of the given type
pub fn prefix(kind: EquipmentType) -> char {
    match kind {
        EquipmentType::Computer => 'P',
        EquipmentType::Ups => 'N',
    }
}

/// Format a counter value into the public equipment name
pub fn format_name(kind: EquipmentType, value: i64) -> String {
    format!("{}{:0width$}", prefix(kind), value, width = MIN_DIGITS)
}
