//! Booking transaction
//!
//! # Steps
//!
//! 1. Read the public and admin class collections (two independent reads)
//! 2. Find the public entry by `(date, category)`, then its admin record by id
//! 3. No public entry → [`BookingError::ClassNotFound`]; too few seats →
//!    [`BookingError::InsufficientSeats`]; nothing is written in either case
//! 4. Decrement public seats; increment admin `bookedSeats` when the admin
//!    record exists (a missing admin record is logged, not surfaced)
//! 5. Write public, then admin
//! 6. Append a confirmed booking to the ledger
//! 7. Notify the admin feed and make sure the email has an account
//! 8. Announce the calendar and ledger keys
//!
//! Steps 5 and 6 are separate whole-key writes. A failure between them
//! leaves seats taken without a ledger entry; there is no rollback.

use chrono::{NaiveDate, Utc};
use shared::models::{
    AdminNotification, BookingRecord, BookingStatus, ClassCategory, CustomerInfo, NotificationKind,
};
use shared::util::snowflake_id;
use thiserror::Error;

use super::BookingService;
use crate::classes::{load_admin_classes, load_public_classes};
use crate::store::{CollectionKey, StorageError};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SEATS_PER_BOOKING, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Booking errors
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(AppError),

    #[error("No {category} class on {date}")]
    ClassNotFound { category: ClassCategory, date: NaiveDate },

    #[error("Only {available} seat(s) left, {requested} requested")]
    InsufficientSeats { requested: u32, available: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(e) => e,
            BookingError::ClassNotFound { category, date } => AppError::with_message(
                ErrorCode::ClassNotFound,
                format!("No {} class on {}", category.display_name(), date),
            )
            .with_detail("type", category.key())
            .with_detail("date", date.to_string()),
            BookingError::InsufficientSeats { requested, available } => AppError::with_message(
                ErrorCode::InsufficientSeats,
                "Sorry, not enough seats available for this class",
            )
            .with_detail("requested", requested)
            .with_detail("available", available),
            BookingError::Storage(e) => e.into(),
        }
    }
}

impl BookingService {
    pub fn submit_booking(
        &self,
        category: &ClassCategory,
        date: NaiveDate,
        requested_seats: u32,
        customer: &CustomerInfo,
    ) -> Result<BookingRecord, BookingError> {
        validate_booking(category, requested_seats, customer).map_err(BookingError::Validation)?;

        // 1
        let mut public = load_public_classes(&self.store)?;
        let mut admin = load_admin_classes(&self.store)?;

        // 2
        let Some(entry) = public
            .iter_mut()
            .find(|e| e.date == date && e.category() == *category)
        else {
            tracing::info!(category = %category, date = %date, "Booking rejected: no such class");
            return Err(BookingError::ClassNotFound {
                category: category.clone(),
                date,
            });
        };

        // 3
        if entry.seats < requested_seats {
            tracing::info!(
                class_id = entry.id,
                requested = requested_seats,
                available = entry.seats,
                "Booking rejected: insufficient seats"
            );
            return Err(BookingError::InsufficientSeats {
                requested: requested_seats,
                available: entry.seats,
            });
        }

        // 4
        entry.seats -= requested_seats;
        let class_id = entry.id;
        let admin_record = admin.iter_mut().find(|a| a.id == class_id);
        let admin_found = match admin_record {
            Some(record) => {
                record.booked_seats += requested_seats;
                true
            }
            None => {
                tracing::warn!(
                    class_id,
                    date = %date,
                    "Admin record missing for booked class, admin schedule left unchanged"
                );
                false
            }
        };

        // 5
        self.store.write(CollectionKey::PublicClasses, &public)?;
        if admin_found {
            self.store.write(CollectionKey::AdminClasses, &admin)?;
        }

        // 6
        let booking = BookingRecord {
            id: snowflake_id(),
            date,
            customer_name: customer.name.trim().to_string(),
            email: customer.email.trim().to_string(),
            phone: customer.phone.trim().to_string(),
            class_name: category.clone(),
            seats: requested_seats,
            dietary: customer.dietary.clone().filter(|d| !d.trim().is_empty()),
            status: BookingStatus::Confirmed,
            booking_time: Utc::now(),
        };
        let mut bookings: Vec<BookingRecord> = self.store.read(CollectionKey::Bookings)?;
        bookings.push(booking.clone());
        self.store.write(CollectionKey::Bookings, &bookings)?;

        tracing::info!(
            booking_id = booking.id,
            class_id,
            seats = requested_seats,
            email = %booking.email,
            "Booking confirmed"
        );

        // 7, 8: the booking is committed; follow-up failures are logged only
        self.after_commit(&booking, customer);

        Ok(booking)
    }

    fn after_commit(&self, booking: &BookingRecord, customer: &CustomerInfo) {
        let notification = AdminNotification::new(
            NotificationKind::Booking,
            format!(
                "New booking from {} for {}",
                booking.customer_name,
                booking.class_name.display_name()
            ),
        )
        .with_data(serde_json::to_value(booking).unwrap_or_default());
        if let Err(e) = self.notifications.push(notification) {
            tracing::error!(booking_id = booking.id, error = %e, "Failed to post booking notification");
        }

        if let Err(e) = self.members.ensure_user_for_booking(customer) {
            tracing::error!(booking_id = booking.id, error = %e, "Failed to create account for booking");
        }

        for key in [CollectionKey::PublicClasses, CollectionKey::Bookings] {
            if let Err(e) = self.broadcaster.announce_change(key) {
                tracing::error!(key = %key, error = %e, "Failed to announce booking change");
            }
        }
    }
}

fn validate_booking(category: &ClassCategory, seats: u32, customer: &CustomerInfo) -> AppResult<()> {
    if category.key().trim().is_empty() {
        return Err(AppError::required("className"));
    }
    validate_required_text(&customer.name, "name", MAX_NAME_LEN)?;
    validate_email(&customer.email)?;
    validate_required_text(&customer.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&customer.dietary, "dietary", MAX_NOTE_LEN)?;
    if seats == 0 {
        return Err(AppError::validation("At least one seat must be booked"));
    }
    if seats > MAX_SEATS_PER_BOOKING {
        return Err(AppError::validation(format!(
            "At most {MAX_SEATS_PER_BOOKING} seats per booking"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::MemberService;
    use crate::notifications::NotificationService;
    use crate::store::RecordStore;
    use crate::sync::{Broadcaster, ChangeBus};
    use rust_decimal::Decimal;
    use shared::models::{AccountType, AdminClassRecord, PublicClassEntry};

    fn service() -> (BookingService, RecordStore) {
        let store = RecordStore::open_in_memory(ChangeBus::new()).unwrap();
        let broadcaster = Broadcaster::new(store.clone());
        let notifications = NotificationService::new(store.clone(), broadcaster.clone());
        let members = MemberService::new(store.clone(), notifications.clone());
        (
            BookingService::new(store.clone(), broadcaster, members, notifications),
            store,
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
    }

    fn bread_class(id: i64, max: u32, booked: u32) -> AdminClassRecord {
        AdminClassRecord {
            id,
            category: ClassCategory::Bread,
            name: "Artisan Bread Making".into(),
            date: date(),
            time: "10:00".into(),
            max_seats: max,
            booked_seats: booked,
            price: Decimal::from(85),
            notes: None,
        }
    }

    fn seed(store: &RecordStore, admin: &[AdminClassRecord]) {
        let public = crate::classes::derive_customer_view(admin, date());
        store.write(CollectionKey::AdminClasses, admin).unwrap();
        store.write(CollectionKey::PublicClasses, &public).unwrap();
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            dietary: None,
        }
    }

    #[test]
    fn validation_rejects_before_reading() {
        let (svc, store) = service();
        seed(&store, &[bread_class(1, 6, 2)]);

        let err = svc
            .submit_booking(&ClassCategory::Bread, date(), 0, &customer())
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let mut bad = customer();
        bad.email = "nope".into();
        let err = svc.submit_booking(&ClassCategory::Bread, date(), 1, &bad).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let public: Vec<PublicClassEntry> = store.read(CollectionKey::PublicClasses).unwrap();
        assert_eq!(public[0].seats, 4);
    }

    #[test]
    fn missing_admin_record_still_books() {
        let (svc, store) = service();
        seed(&store, &[bread_class(1, 6, 2)]);
        // Admin deleted the class in another view without re-deriving
        store
            .write::<AdminClassRecord>(CollectionKey::AdminClasses, &[])
            .unwrap();

        let booking = svc
            .submit_booking(&ClassCategory::Bread, date(), 2, &customer())
            .unwrap();
        assert_eq!(booking.seats, 2);

        let public: Vec<PublicClassEntry> = store.read(CollectionKey::PublicClasses).unwrap();
        assert_eq!(public[0].seats, 2);
        let admin: Vec<AdminClassRecord> = store.read(CollectionKey::AdminClasses).unwrap();
        assert!(admin.is_empty());
    }

    #[test]
    fn corrupt_admin_schedule_reseeds_instead_of_emptying() {
        let (svc, store) = service();
        let seeded = load_admin_classes(&store).unwrap();
        let target = seeded[0].clone();
        store.set_raw(CollectionKey::AdminClasses, "{corrupt".into()).unwrap();

        svc.submit_booking(&target.category, target.date, 1, &customer())
            .unwrap();

        let admin: Vec<AdminClassRecord> = store.read(CollectionKey::AdminClasses).unwrap();
        assert_eq!(admin.len(), seeded.len());
        let booked = admin.iter().find(|c| c.id == target.id).unwrap();
        assert_eq!(booked.booked_seats, target.booked_seats + 1);
    }

    #[test]
    fn corrupt_calendar_is_rederived_before_booking() {
        let (svc, store) = service();
        seed(&store, &[bread_class(1, 6, 2)]);
        store.set_raw(CollectionKey::PublicClasses, "{corrupt".into()).unwrap();

        // Derived against the real today, so the 2099 class survives
        let booking = svc
            .submit_booking(&ClassCategory::Bread, date(), 1, &customer())
            .unwrap();
        assert_eq!(booking.seats, 1);

        let public: Vec<PublicClassEntry> = store.read(CollectionKey::PublicClasses).unwrap();
        assert_eq!(public[0].seats, 3);
    }

    #[test]
    fn category_must_match_exactly() {
        let (svc, store) = service();
        seed(&store, &[bread_class(1, 6, 0)]);

        let err = svc
            .submit_booking(&ClassCategory::Desserts, date(), 1, &customer())
            .unwrap_err();
        assert!(matches!(err, BookingError::ClassNotFound { .. }));

        let err = svc
            .submit_booking(&ClassCategory::Bread, date().succ_opt().unwrap(), 1, &customer())
            .unwrap_err();
        assert!(matches!(err, BookingError::ClassNotFound { .. }));
    }

    #[test]
    fn follow_ups_create_account_and_notify() {
        let (svc, store) = service();
        seed(&store, &[bread_class(1, 6, 0)]);

        svc.submit_booking(&ClassCategory::Bread, date(), 1, &customer())
            .unwrap();

        let user = svc.members.find_user("ada@example.com").unwrap().unwrap();
        assert_eq!(user.account_type, AccountType::AutoCreated);

        let feed = svc.notifications.list().unwrap();
        assert_eq!(feed[0].kind, NotificationKind::Booking);
        assert_eq!(
            feed[0].message,
            "New booking from Ada Lovelace for Artisan Bread Making"
        );
    }

    #[test]
    fn errors_map_to_app_codes() {
        let not_found: AppError = BookingError::ClassNotFound {
            category: ClassCategory::Bread,
            date: date(),
        }
        .into();
        assert_eq!(not_found.code, ErrorCode::ClassNotFound);

        let short: AppError = BookingError::InsufficientSeats {
            requested: 5,
            available: 0,
        }
        .into();
        assert_eq!(short.code, ErrorCode::InsufficientSeats);
    }
}
