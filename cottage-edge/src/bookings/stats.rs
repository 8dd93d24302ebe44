//! Monthly dashboard figures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::AdminClassRecord;

use super::BookingService;
use crate::classes::load_admin_classes;
use crate::utils::AppResult;
use crate::utils::time::in_month;

/// 月度统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// Σ bookedSeats
    pub booked_seats: u32,
    pub class_count: usize,
    /// Σ (maxSeats - bookedSeats)
    pub available_seats: u32,
    /// Σ bookedSeats × price
    pub revenue: Decimal,
}

impl MonthlyStats {
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a AdminClassRecord>) -> Self {
        classes.into_iter().fold(Self::default(), |mut acc, c| {
            acc.booked_seats += c.booked_seats;
            acc.class_count += 1;
            acc.available_seats += c.available_seats();
            acc.revenue += c.booked_revenue();
            acc
        })
    }
}

impl BookingService {
    pub fn monthly_stats(&self, year: i32, month: u32) -> AppResult<MonthlyStats> {
        let classes = load_admin_classes(&self.store)?;
        Ok(MonthlyStats::from_classes(
            classes.iter().filter(|c| in_month(c.date, year, month)),
        ))
    }
}
