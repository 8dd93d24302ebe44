use chrono::{Days, NaiveDate};
use cottage_edge::{BookingError, CollectionKey, Config, ServerState, derive_customer_view};
use rust_decimal::Decimal;
use shared::models::{
    AccountType, AdminClassRecord, BookingRecord, BookingStatus, ClassCategory, CustomerInfo,
    PublicClassEntry, UserRecord,
};

fn new_year_2099() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
}

fn bread_class() -> AdminClassRecord {
    AdminClassRecord {
        id: 1,
        category: ClassCategory::Bread,
        name: "Artisan Bread Making".into(),
        date: new_year_2099(),
        time: "10:00".into(),
        max_seats: 6,
        booked_seats: 2,
        price: Decimal::from(85),
        notes: None,
    }
}

fn customer(email: &str) -> CustomerInfo {
    CustomerInfo {
        name: "Ada Lovelace".into(),
        email: email.into(),
        phone: "555-0100".into(),
        dietary: Some("vegetarian".into()),
    }
}

fn state_with_bread_class() -> ServerState {
    let state = ServerState::in_memory(Config::with_overrides("/tmp/unused")).unwrap();
    state.classes.save_admin_classes(&[bread_class()]).unwrap();
    state
}

fn snapshot(state: &ServerState) -> (Option<String>, Option<String>, Option<String>) {
    (
        state.store.get_raw(CollectionKey::PublicClasses).unwrap(),
        state.store.get_raw(CollectionKey::AdminClasses).unwrap(),
        state.store.get_raw(CollectionKey::Bookings).unwrap(),
    )
}

#[test]
fn derivation_of_the_bread_class() {
    let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let public = derive_customer_view(&[bread_class()], today);
    assert_eq!(
        public,
        vec![PublicClassEntry {
            id: 1,
            date: new_year_2099(),
            class_name: "Artisan Bread Making".into(),
            seats: 4,
        }]
    );

    let json = serde_json::to_value(&public[0]).unwrap();
    assert_eq!(json["class"], "Artisan Bread Making");
    assert_eq!(json["date"], "2099-01-01");
}

#[test]
fn derivation_is_byte_identical_on_repeat() {
    let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let mut past = bread_class();
    past.id = 2;
    past.date = today.checked_sub_days(Days::new(1)).unwrap();
    let admin = vec![bread_class(), past];

    let first = serde_json::to_string(&derive_customer_view(&admin, today)).unwrap();
    let second = serde_json::to_string(&derive_customer_view(&admin, today)).unwrap();
    assert_eq!(first, second);
    assert_eq!(derive_customer_view(&admin, today).len(), 1);
}

#[test]
fn booking_four_then_five_seats() {
    let state = state_with_bread_class();

    // Four seats fit exactly
    let booking = state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 4, &customer("ada@example.com"))
        .unwrap();
    assert_eq!(booking.seats, 4);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.class_name, ClassCategory::Bread);

    let public: Vec<PublicClassEntry> = state.store.read(CollectionKey::PublicClasses).unwrap();
    assert_eq!(public[0].seats, 0);
    let admin: Vec<AdminClassRecord> = state.store.read(CollectionKey::AdminClasses).unwrap();
    assert_eq!(admin[0].booked_seats, 6);
    let ledger: Vec<BookingRecord> = state.store.read(CollectionKey::Bookings).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].seats, 4);

    // Class is now full: nothing may change
    let before = snapshot(&state);
    let err = state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 5, &customer("grace@example.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::InsufficientSeats {
            requested: 5,
            available: 0
        }
    ));
    assert_eq!(snapshot(&state), before);
    assert!(state.members.find_user("grace@example.com").unwrap().is_none());
}

#[test]
fn over_capacity_request_changes_nothing() {
    let state = state_with_bread_class();
    let before = snapshot(&state);

    let err = state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 5, &customer("ada@example.com"))
        .unwrap_err();
    assert!(matches!(err, BookingError::InsufficientSeats { available: 4, .. }));
    assert_eq!(snapshot(&state), before);
}

#[test]
fn unknown_class_changes_nothing() {
    let state = state_with_bread_class();
    let before = snapshot(&state);

    let err = state
        .bookings
        .submit_booking(&ClassCategory::Desserts, new_year_2099(), 1, &customer("ada@example.com"))
        .unwrap_err();
    assert!(matches!(err, BookingError::ClassNotFound { .. }));
    assert_eq!(snapshot(&state), before);
}

#[test]
fn unparseable_users_read_as_empty() {
    let state = state_with_bread_class();
    state
        .store
        .set_raw(CollectionKey::Users, "[{\"email\": ".into())
        .unwrap();

    let users: Vec<UserRecord> = state.store.read(CollectionKey::Users).unwrap();
    assert!(users.is_empty());
    assert!(state.members.list_users().unwrap().is_empty());
}

#[test]
fn first_booking_creates_one_auto_account() {
    let state = state_with_bread_class();

    state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 1, &customer("ada@example.com"))
        .unwrap();
    state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 1, &customer("ada@example.com"))
        .unwrap();

    let users = state.members.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].account_type, AccountType::AutoCreated);
    assert!(!users[0].password.is_empty());
    assert_eq!(users[0].first_name, "Ada");
    assert_eq!(users[0].last_name, "Lovelace");

    // The generated password signs in
    let password = users[0].password.clone();
    assert!(state.members.sign_in("ada@example.com", &password).is_ok());
}

#[test]
fn existing_member_gets_no_new_account() {
    let state = state_with_bread_class();
    state
        .members
        .sign_up(shared::models::SignUpRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            dietary: None,
        })
        .unwrap();

    state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 2, &customer("ada@example.com"))
        .unwrap();

    let users = state.members.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].account_type, AccountType::SelfRegistered);
}

#[test]
fn admin_save_after_booking_resyncs_calendar() {
    let state = state_with_bread_class();
    state
        .bookings
        .submit_booking(&ClassCategory::Bread, new_year_2099(), 3, &customer("ada@example.com"))
        .unwrap();

    let mut admin = state.classes.load_admin_classes().unwrap();
    admin[0].max_seats = 10;
    let public = state.classes.save_admin_classes(&admin).unwrap();

    // 10 max - (2 + 3) booked
    assert_eq!(public[0].seats, 5);

    let stats = state.bookings.monthly_stats(2099, 1).unwrap();
    assert_eq!(stats.booked_seats, 5);
    assert_eq!(stats.class_count, 1);
    assert_eq!(stats.available_seats, 5);
    assert_eq!(stats.revenue, Decimal::from(425));
}
