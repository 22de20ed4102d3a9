//! Local accounts and the signed-in user.
//!
//! Accounts are kept in the `users` record (phone → account) and the
//! signed-in phone in `currentUser`. Passwords are stored as entered.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::{CURRENT_USER_KEY, USERS_KEY};
use crate::error::{ScheduleError, ScheduleResult};
use crate::identity::{IdentityProvider, UserId};
use crate::storage::{Storage, read_json};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 2..=12;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 6..=20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub phone: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn user_id(&self) -> UserId {
        UserId::new(&self.phone)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CurrentUser {
    phone: String,
}

pub struct AccountBook {
    storage: Rc<dyn Storage>,
    accounts: Map<String, Value>,
    current: Option<Account>,
}

impl AccountBook {
    /// Load accounts and restore the signed-in user, if any.
    pub fn load(storage: Rc<dyn Storage>) -> ScheduleResult<Self> {
        let accounts = read_accounts(storage.as_ref());

        let mut book = AccountBook {
            storage,
            accounts,
            current: None,
        };

        let saved = match book.storage.read(CURRENT_USER_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Could not read signed-in user: {e}");
                None
            }
        };

        if let Some(content) = saved {
            let phone = serde_json::from_str::<CurrentUser>(&content)
                .ok()
                .map(|c| c.phone);

            match phone.and_then(|p| book.account(&p)) {
                Some(account) => book.current = Some(account),
                None => {
                    debug!("Signed-in user no longer exists, signing out");
                    book.storage.remove(CURRENT_USER_KEY)?;
                }
            }
        }

        Ok(book)
    }

    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    pub fn account(&self, phone: &str) -> Option<Account> {
        self.accounts
            .get(phone)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn register(
        &mut self,
        username: &str,
        phone: &str,
        password: &str,
        confirm_password: &str,
    ) -> ScheduleResult<Account> {
        let username = username.trim();
        let phone = phone.trim();

        validate_username(username)?;
        validate_phone(phone)?;
        validate_password(password)?;

        if password != confirm_password {
            return Err(ScheduleError::Validation("Passwords do not match".into()));
        }

        self.accounts = read_account_records(self.storage.as_ref())?;
        if self.accounts.contains_key(phone) {
            return Err(ScheduleError::Account(format!(
                "Phone number {} is already registered",
                phone
            )));
        }

        let account = Account {
            username: username.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };

        self.save_account(&account)?;
        self.sign_in(account.clone())?;

        Ok(account)
    }

    pub fn login(&mut self, phone: &str, password: &str) -> ScheduleResult<Account> {
        let phone = phone.trim();
        validate_phone(phone)?;

        let account = self.account(phone).ok_or_else(|| {
            ScheduleError::Account(format!("Phone number {} is not registered", phone))
        })?;

        if account.password != password {
            return Err(ScheduleError::Account("Wrong password".into()));
        }

        self.sign_in(account.clone())?;
        Ok(account)
    }

    pub fn logout(&mut self) -> ScheduleResult<()> {
        self.current = None;
        self.storage.remove(CURRENT_USER_KEY)
    }

    /// Change the signed-in user's display name.
    pub fn rename(&mut self, username: &str) -> ScheduleResult<Account> {
        let username = username.trim();
        validate_username(username)?;

        let mut account = self.current.clone().ok_or(ScheduleError::NotSignedIn)?;
        account.username = username.to_string();

        self.save_account(&account)?;
        self.current = Some(account.clone());

        Ok(account)
    }

    fn sign_in(&mut self, account: Account) -> ScheduleResult<()> {
        let content = serde_json::to_string(&CurrentUser {
            phone: account.phone.clone(),
        })?;
        self.storage.write(CURRENT_USER_KEY, &content)?;

        debug!(user = %account.phone, "Signed in");
        self.current = Some(account);
        Ok(())
    }

    /// Read-merge-write of one account. Nothing is written if the record cannot be read.
    fn save_account(&mut self, account: &Account) -> ScheduleResult<()> {
        let mut all = read_account_records(self.storage.as_ref())?;
        all.insert(account.phone.clone(), serde_json::to_value(account)?);

        let content = serde_json::to_string(&all)?;
        self.storage.write(USERS_KEY, &content)?;
        self.accounts = all;
        Ok(())
    }
}

impl IdentityProvider for AccountBook {
    fn current_user_id(&self) -> Option<UserId> {
        self.current.as_ref().map(Account::user_id)
    }
}

fn read_account_records(storage: &dyn Storage) -> ScheduleResult<Map<String, Value>> {
    match read_json(storage, USERS_KEY)? {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ScheduleError::Storage("Accounts record is not an object".into())),
        None => Ok(Map::new()),
    }
}

/// Like `read_account_records`, but an unreadable record loads as empty.
fn read_accounts(storage: &dyn Storage) -> Map<String, Value> {
    read_account_records(storage).unwrap_or_else(|e| {
        warn!("Could not load accounts: {e}");
        Map::new()
    })
}

pub fn validate_username(username: &str) -> ScheduleResult<()> {
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(ScheduleError::Validation(
            "Username must be 2-12 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> ScheduleResult<()> {
    if !PASSWORD_LEN.contains(&password.chars().count()) {
        return Err(ScheduleError::Validation(
            "Password must be 6-20 characters".into(),
        ));
    }
    Ok(())
}

/// Mainland China mobile number: `1[3-9]` followed by 9 digits, optionally prefixed by `+86`.
pub fn validate_phone(phone: &str) -> ScheduleResult<()> {
    let number = phone.strip_prefix("+86").unwrap_or(phone);
    let bytes = number.as_bytes();

    let valid = bytes.len() == 11
        && bytes[0] == b'1'
        && (b'3'..=b'9').contains(&bytes[1])
        && bytes.iter().all(u8::is_ascii_digit);

    if !valid {
        return Err(ScheduleError::Validation(format!(
            "'{}' is not a valid phone number",
            phone
        )));
    }
    Ok(())
}
