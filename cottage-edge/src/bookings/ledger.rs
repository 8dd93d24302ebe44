//! Booking ledger queries and status changes
//!
//! Bookings are never deleted. Cancelling changes the status only; the
//! seats stay taken on the class until staff edit the schedule.

use shared::models::{BookingRecord, BookingStatus, ClassCategory};

use super::BookingService;
use crate::store::CollectionKey;
use crate::utils::time::in_month;
use crate::utils::{AppError, AppResult, ErrorCode};

impl BookingService {
    pub fn list_bookings(&self) -> AppResult<Vec<BookingRecord>> {
        Ok(self.store.read(CollectionKey::Bookings)?)
    }

    /// A member's bookings, newest class date first
    pub fn bookings_for_email(&self, email: &str) -> AppResult<Vec<BookingRecord>> {
        let email = email.trim();
        let mut bookings: Vec<_> = self
            .list_bookings()?
            .into_iter()
            .filter(|b| b.email.eq_ignore_ascii_case(email))
            .collect();
        bookings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(bookings)
    }

    pub fn bookings_in_month(&self, year: i32, month: u32) -> AppResult<Vec<BookingRecord>> {
        Ok(self
            .list_bookings()?
            .into_iter()
            .filter(|b| in_month(b.date, year, month))
            .collect())
    }

    /// Seats held by non-cancelled bookings for one class
    pub fn seats_held(&self, category: &ClassCategory, date: chrono::NaiveDate) -> AppResult<u32> {
        Ok(self
            .list_bookings()?
            .iter()
            .filter(|b| b.date == date && b.class_name == *category && b.status.holds_seats())
            .map(|b| b.seats)
            .sum())
    }

    pub fn confirm_booking(&self, id: i64) -> AppResult<BookingRecord> {
        self.set_status(id, BookingStatus::Confirmed)
    }

    pub fn cancel_booking(&self, id: i64) -> AppResult<BookingRecord> {
        self.set_status(id, BookingStatus::Cancelled)
    }

    fn set_status(&self, id: i64, status: BookingStatus) -> AppResult<BookingRecord> {
        let mut bookings = self.list_bookings()?;
        let booking = bookings.iter_mut().find(|b| b.id == id).ok_or_else(|| {
            AppError::with_message(ErrorCode::BookingNotFound, format!("Booking {id} not found"))
                .with_detail("id", id)
        })?;

        if booking.status == status {
            return Ok(booking.clone());
        }
        let previous = booking.status;
        booking.status = status;
        let updated = booking.clone();

        self.store.write(CollectionKey::Bookings, &bookings)?;
        self.broadcaster.announce_change(CollectionKey::Bookings)?;

        tracing::info!(booking_id = id, from = %previous, to = %status, "Booking status changed");
        Ok(updated)
    }
}
