//! Default schedule written when the admin collection is missing or unreadable

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use shared::models::{AdminClassRecord, ClassCategory};

/// (category, days from today, time, max seats, booked seats, price)
const SEED: [(ClassCategory, u64, &str, u32, u32, i64); 5] = [
    (ClassCategory::Bread, 3, "10:00", 6, 2, 85),
    (ClassCategory::FarmToTable, 6, "14:00", 8, 2, 75),
    (ClassCategory::Desserts, 10, "11:00", 6, 3, 95),
    (ClassCategory::Bread, 13, "10:00", 6, 1, 85),
    (ClassCategory::FarmToTable, 17, "14:00", 8, 6, 75),
];

/// Five classes across the three categories, dated relative to `today`
pub fn default_admin_classes(today: NaiveDate) -> Vec<AdminClassRecord> {
    SEED.iter()
        .zip(1_i64..)
        .map(|((category, offset, time, max, booked, price), id)| AdminClassRecord {
            id,
            category: category.clone(),
            name: category.display_name().to_string(),
            date: today.checked_add_days(Days::new(*offset)).unwrap_or(today),
            time: (*time).to_string(),
            max_seats: *max,
            booked_seats: *booked,
            price: Decimal::from(*price),
            notes: None,
        })
        .collect()
}
