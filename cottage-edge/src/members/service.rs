//! Member accounts
//!
//! Accounts are keyed by email (case-insensitive). Passwords are compared
//! as entered; this node is a local booking desk, not an identity provider.

use chrono::Utc;
use rand::Rng;
use shared::models::{AccountType, AdminNotification, CustomerInfo, NotificationKind, SignUpRequest, UserRecord};

use crate::notifications::NotificationService;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const TEMP_PASSWORD_LEN: usize = 8;
const TEMP_PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 8 lowercase alphanumerics
pub fn generate_temp_password() -> String {
    let mut rng = rand::thread_rng();
    (0..TEMP_PASSWORD_LEN)
        .map(|_| TEMP_PASSWORD_CHARSET[rng.gen_range(0..TEMP_PASSWORD_CHARSET.len())] as char)
        .collect()
}

#[derive(Debug, Clone)]
pub struct MemberService {
    store: RecordStore,
    notifications: NotificationService,
}

impl MemberService {
    pub fn new(store: RecordStore, notifications: NotificationService) -> Self {
        Self { store, notifications }
    }

    pub fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.store.read(CollectionKey::Users)?)
    }

    pub fn find_user(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.list_users()?.into_iter().find(|u| u.has_email(email)))
    }

    pub fn sign_up(&self, request: SignUpRequest) -> AppResult<UserRecord> {
        validate_required_text(&request.first_name, "firstName", MAX_NAME_LEN)?;
        validate_optional_text(&Some(request.last_name.clone()), "lastName", MAX_NAME_LEN)?;
        validate_email(&request.email)?;
        validate_optional_text(&Some(request.phone.clone()), "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&request.dietary, "dietary", MAX_NOTE_LEN)?;
        validate_new_password(&request.password, &request.confirm_password)?;

        let mut users = self.list_users()?;
        if users.iter().any(|u| u.has_email(&request.email)) {
            return Err(AppError::with_message(
                ErrorCode::MemberEmailExists,
                "An account with this email already exists",
            ));
        }

        let user = UserRecord {
            email: request.email.trim().to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            password: request.password,
            dietary: request.dietary.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
            experience: "beginner".to_string(),
            account_type: AccountType::SelfRegistered,
            password_last_updated: None,
        };
        users.push(user.clone());
        self.store.write(CollectionKey::Users, &users)?;

        self.notifications.push(
            AdminNotification::new(
                NotificationKind::NewMember,
                format!("New member: {} just signed up!", user.full_name()),
            )
            .with_data(serde_json::json!({ "email": user.email })),
        )?;

        tracing::info!(email = %user.email, "Member signed up");
        Ok(user)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> AppResult<UserRecord> {
        match self.find_user(email)? {
            Some(user) if user.password == password => {
                tracing::info!(email = %user.email, "Member signed in");
                Ok(user)
            }
            _ => {
                tracing::warn!(email = %email.trim(), "Sign-in rejected");
                Err(AppError::invalid_credentials())
            }
        }
    }

    pub fn reset_password(&self, email: &str, new_password: &str, confirm: &str) -> AppResult<UserRecord> {
        validate_new_password(new_password, confirm)?;

        let mut users = self.list_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.has_email(email))
            .ok_or_else(|| member_not_found(email))?;
        user.password = new_password.to_string();
        user.password_last_updated = Some(Utc::now());
        let updated = user.clone();
        self.store.write(CollectionKey::Users, &users)?;

        let name = if updated.full_name().is_empty() {
            "User".to_string()
        } else {
            updated.full_name()
        };
        self.notifications.push(AdminNotification::new(
            NotificationKind::Security,
            format!("{name} reset their password"),
        ))?;

        tracing::info!(email = %updated.email, "Password reset");
        Ok(updated)
    }

    pub fn record_logout(&self, first_name: &str) -> AppResult<()> {
        let name = match first_name.trim() {
            "" => "User",
            n => n,
        };
        self.notifications
            .push(AdminNotification::new(NotificationKind::Logout, format!("{name} logged out")))
    }

    /// Create an auto account for a booking email with no account yet
    ///
    /// Returns the new account (with its temporary password), or `None` when
    /// one already exists.
    pub fn ensure_user_for_booking(&self, customer: &CustomerInfo) -> AppResult<Option<UserRecord>> {
        let mut users = self.list_users()?;
        if users.iter().any(|u| u.has_email(&customer.email)) {
            return Ok(None);
        }

        let user = UserRecord {
            email: customer.email.trim().to_string(),
            first_name: customer.first_name().to_string(),
            last_name: customer.last_name(),
            phone: customer.phone.trim().to_string(),
            password: generate_temp_password(),
            dietary: customer.dietary.clone().filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
            experience: "beginner".to_string(),
            account_type: AccountType::AutoCreated,
            password_last_updated: None,
        };
        users.push(user.clone());
        self.store.write(CollectionKey::Users, &users)?;

        tracing::info!(email = %user.email, "Account created for first booking");
        Ok(Some(user))
    }
}

fn validate_new_password(password: &str, confirm: &str) -> AppResult<()> {
    if password != confirm {
        return Err(AppError::with_message(ErrorCode::PasswordMismatch, "Passwords do not match"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

fn member_not_found(email: &str) -> AppError {
    AppError::with_message(ErrorCode::MemberNotFound, "No account found for this email")
        .with_detail("email", email.trim())
}
