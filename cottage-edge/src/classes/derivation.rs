//! Public calendar derivation

use chrono::NaiveDate;
use shared::models::{AdminClassRecord, PublicClassEntry};

/// Project admin records into the visitor calendar
///
/// Keeps records dated `today` or later (date only, no time of day), in
/// input order, with `seats = maxSeats - bookedSeats`.
pub fn derive_customer_view(admin_classes: &[AdminClassRecord], today: NaiveDate) -> Vec<PublicClassEntry> {
    admin_classes
        .iter()
        .filter(|c| c.is_upcoming(today))
        .map(|c| PublicClassEntry {
            id: c.id,
            date: c.date,
            class_name: c.name.clone(),
            seats: c.available_seats(),
        })
        .collect()
}
