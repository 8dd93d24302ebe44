//! Class schedule service
//!
//! Every admin save rewrites the admin collection, regenerates the public
//! calendar from it and announces the calendar key.

use rust_decimal::Decimal;
use shared::models::{AdminClassRecord, ClassInput, PublicClassEntry};
use shared::util::snowflake_id;

use super::{default_admin_classes, derive_customer_view};
use crate::store::{CollectionKey, RecordStore, StorageResult};
use crate::sync::Broadcaster;
use crate::utils::time::{in_month, parse_time, today, validate_not_past};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct ClassService {
    store: RecordStore,
    broadcaster: Broadcaster,
}

impl ClassService {
    pub fn new(store: RecordStore, broadcaster: Broadcaster) -> Self {
        Self { store, broadcaster }
    }

    // ========== Reads ==========

    pub fn load_admin_classes(&self) -> AppResult<Vec<AdminClassRecord>> {
        Ok(load_admin_classes(&self.store)?)
    }

    pub fn load_public_classes(&self) -> AppResult<Vec<PublicClassEntry>> {
        Ok(load_public_classes(&self.store)?)
    }

    pub fn find_class(&self, id: i64) -> AppResult<Option<AdminClassRecord>> {
        Ok(self.load_admin_classes()?.into_iter().find(|c| c.id == id))
    }

    /// Admin classes in a calendar month, by date then start time
    pub fn classes_in_month(&self, year: i32, month: u32) -> AppResult<Vec<AdminClassRecord>> {
        let mut classes: Vec<_> = self
            .load_admin_classes()?
            .into_iter()
            .filter(|c| in_month(c.date, year, month))
            .collect();
        classes.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        Ok(classes)
    }

    // ========== Writes ==========

    /// Persist the admin schedule, regenerate the calendar and announce it
    pub fn save_admin_classes(&self, classes: &[AdminClassRecord]) -> AppResult<Vec<PublicClassEntry>> {
        self.store.write(CollectionKey::AdminClasses, classes)?;
        let public = derive_customer_view(classes, today());
        self.store.write(CollectionKey::PublicClasses, &public)?;
        self.broadcaster.announce_change(CollectionKey::PublicClasses)?;

        tracing::info!(
            admin = classes.len(),
            public = public.len(),
            "Class schedule saved"
        );
        Ok(public)
    }

    pub fn add_class(&self, input: ClassInput) -> AppResult<AdminClassRecord> {
        validate_class_input(&input)?;

        let mut classes = self.load_admin_classes()?;
        let record = AdminClassRecord {
            id: next_class_id(&classes),
            name: input.category.display_name().to_string(),
            category: input.category,
            date: input.date,
            time: input.time.trim().to_string(),
            max_seats: input.max_seats,
            booked_seats: 0,
            price: input.price,
            notes: non_empty(input.notes),
        };
        classes.push(record.clone());
        self.save_admin_classes(&classes)?;

        tracing::info!(id = record.id, class = %record.name, date = %record.date, "Class added");
        Ok(record)
    }

    /// Replace the editable fields of a class; booked seats are kept
    pub fn update_class(&self, id: i64, input: ClassInput) -> AppResult<AdminClassRecord> {
        validate_class_input(&input)?;

        let mut classes = self.load_admin_classes()?;
        let class = classes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| class_not_found(id))?;

        if input.max_seats < class.booked_seats {
            return Err(AppError::with_message(
                ErrorCode::CapacityBelowBooked,
                format!(
                    "Max seats {} is below the {} seats already booked",
                    input.max_seats, class.booked_seats
                ),
            )
            .with_detail("bookedSeats", class.booked_seats));
        }

        class.name = input.category.display_name().to_string();
        class.category = input.category;
        class.date = input.date;
        class.time = input.time.trim().to_string();
        class.max_seats = input.max_seats;
        class.price = input.price;
        class.notes = non_empty(input.notes);
        let updated = class.clone();

        self.save_admin_classes(&classes)?;
        tracing::info!(id, "Class updated");
        Ok(updated)
    }

    pub fn delete_class(&self, id: i64) -> AppResult<AdminClassRecord> {
        let mut classes = self.load_admin_classes()?;
        let index = classes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| class_not_found(id))?;
        let removed = classes.remove(index);

        self.save_admin_classes(&classes)?;
        tracing::info!(id, class = %removed.name, "Class deleted");
        Ok(removed)
    }
}

/// Admin schedule; missing or unreadable → default schedule (persisted)
///
/// Every reader of the class collections goes through these two loaders, so a
/// corrupt value never heals to an empty schedule.
pub fn load_admin_classes(store: &RecordStore) -> StorageResult<Vec<AdminClassRecord>> {
    store.read_or_seed(CollectionKey::AdminClasses, || default_admin_classes(today()))
}

/// Visitor calendar; missing or unreadable → derived from the admin schedule (persisted)
pub fn load_public_classes(store: &RecordStore) -> StorageResult<Vec<PublicClassEntry>> {
    let admin = load_admin_classes(store)?;
    store.read_or_seed(CollectionKey::PublicClasses, || derive_customer_view(&admin, today()))
}

fn validate_class_input(input: &ClassInput) -> AppResult<()> {
    if input.category.key().trim().is_empty() {
        return Err(AppError::required("type"));
    }
    if input.time.trim().is_empty() {
        return Err(AppError::required("time"));
    }
    parse_time(&input.time)?;
    if input.max_seats == 0 {
        return Err(AppError::validation("Max seats must be greater than zero"));
    }
    if input.price < Decimal::ZERO {
        return Err(AppError::validation("Price must not be negative"));
    }
    validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;
    validate_not_past(input.date, today())
}

/// Fresh id, unique within the collection
fn next_class_id(classes: &[AdminClassRecord]) -> i64 {
    let id = snowflake_id();
    let max = classes.iter().map(|c| c.id).max().unwrap_or(0);
    if id > max { id } else { max + 1 }
}

fn non_empty(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

fn class_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ClassNotFound, format!("Class {id} not found")).with_detail("id", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::ChangeBus;
    use chrono::NaiveDate;
    use shared::models::ClassCategory;

    fn service() -> ClassService {
        let store = RecordStore::open_in_memory(ChangeBus::new()).unwrap();
        ClassService::new(store.clone(), Broadcaster::new(store))
    }

    fn input(category: ClassCategory, date: NaiveDate) -> ClassInput {
        ClassInput {
            category,
            date,
            time: "10:00".into(),
            max_seats: 6,
            price: Decimal::from(85),
            notes: Some("  ".into()),
        }
    }

    fn future(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, d).unwrap()
    }

    #[test]
    fn missing_admin_collection_is_seeded() {
        let svc = service();
        let classes = svc.load_admin_classes().unwrap();
        assert_eq!(classes.len(), 5);
        // Public calendar derives from the seed
        assert_eq!(svc.load_public_classes().unwrap().len(), 5);
    }

    #[test]
    fn add_class_regenerates_calendar() {
        let svc = service();
        svc.save_admin_classes(&[]).unwrap();

        let added = svc.add_class(input(ClassCategory::Bread, future(1))).unwrap();
        assert_eq!(added.name, "Artisan Bread Making");
        assert_eq!(added.booked_seats, 0);
        assert!(added.notes.is_none());

        let public = svc.load_public_classes().unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, added.id);
        assert_eq!(public[0].seats, 6);
    }

    #[test]
    fn add_class_rejects_bad_input() {
        let svc = service();
        let past = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(
            svc.add_class(input(ClassCategory::Bread, past)).unwrap_err().code,
            ErrorCode::ClassDateInPast
        );

        let mut zero = input(ClassCategory::Bread, future(1));
        zero.max_seats = 0;
        assert_eq!(svc.add_class(zero).unwrap_err().code, ErrorCode::ValidationFailed);

        let mut bad_time = input(ClassCategory::Bread, future(1));
        bad_time.time = "ten".into();
        assert!(svc.add_class(bad_time).is_err());

        let mut negative = input(ClassCategory::Bread, future(1));
        negative.price = Decimal::from(-1);
        assert!(svc.add_class(negative).is_err());

        assert_eq!(
            svc.add_class(input(ClassCategory::Other(String::new()), future(1)))
                .unwrap_err()
                .code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn update_keeps_booked_seats_and_checks_capacity() {
        let svc = service();
        let mut seeded = svc.load_admin_classes().unwrap();
        seeded[0].booked_seats = 4;
        svc.save_admin_classes(&seeded).unwrap();
        let id = seeded[0].id;

        let mut smaller = input(ClassCategory::Desserts, future(2));
        smaller.max_seats = 3;
        assert_eq!(
            svc.update_class(id, smaller).unwrap_err().code,
            ErrorCode::CapacityBelowBooked
        );

        let mut bigger = input(ClassCategory::Desserts, future(2));
        bigger.max_seats = 10;
        let updated = svc.update_class(id, bigger).unwrap();
        assert_eq!(updated.booked_seats, 4);
        assert_eq!(updated.name, "Classic Desserts");

        let entry = svc
            .load_public_classes()
            .unwrap()
            .into_iter()
            .find(|e| e.id == id)
            .unwrap();
        assert_eq!(entry.seats, 6);
    }

    #[test]
    fn delete_and_unknown_ids() {
        let svc = service();
        let id = svc.load_admin_classes().unwrap()[1].id;
        svc.delete_class(id).unwrap();
        assert!(svc.find_class(id).unwrap().is_none());
        assert!(svc.load_public_classes().unwrap().iter().all(|e| e.id != id));
        assert_eq!(svc.delete_class(id).unwrap_err().code, ErrorCode::ClassNotFound);
    }

    #[test]
    fn month_query_sorted() {
        let svc = service();
        svc.save_admin_classes(&[]).unwrap();
        svc.add_class(input(ClassCategory::Bread, future(20))).unwrap();
        svc.add_class(input(ClassCategory::Desserts, future(5))).unwrap();
        svc.add_class(input(ClassCategory::Bread, NaiveDate::from_ymd_opt(2099, 2, 1).unwrap()))
            .unwrap();

        let january = svc.classes_in_month(2099, 1).unwrap();
        assert_eq!(january.len(), 2);
        assert_eq!(january[0].date, future(5));
    }

    #[test]
    fn unreadable_admin_collection_heals_to_seed() {
        let svc = service();
        svc.store.set_raw(CollectionKey::AdminClasses, "oops".into()).unwrap();
        assert_eq!(svc.load_admin_classes().unwrap().len(), 5);
    }

    #[test]
    fn unreadable_public_collection_heals_to_derivation() {
        let svc = service();
        svc.save_admin_classes(&[]).unwrap();
        svc.add_class(input(ClassCategory::Bread, future(3))).unwrap();
        svc.store.set_raw(CollectionKey::PublicClasses, "{corrupt".into()).unwrap();

        let public = load_public_classes(&svc.store).unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].date, future(3));
        // Healed value is persisted
        let raw = svc.store.get_raw(CollectionKey::PublicClasses).unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<PublicClassEntry>>(&raw).is_ok());
    }
}
