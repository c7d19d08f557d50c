//! User Entity
//!
//! A registered caregiver. Owns accounts (in the growth crate) by id.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};

/// User entity as stored
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique (case-insensitive), used for login and display
    pub user_name: UserName,
    /// Unique, lowercased
    pub email: Email,
    pub password_hash: UserPassword,
    /// URL path of the uploaded avatar
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration data, before an id is assigned
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
}

/// Profile fields replaced by a profile update
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub user_name: UserName,
    pub email: Email,
    pub avatar: Option<String>,
}

impl User {
    /// Apply a profile update in memory
    pub fn apply(&mut self, changes: ProfileChanges) {
        self.user_name = changes.user_name;
        self.email = changes.email;
        self.avatar = changes.avatar;
        self.updated_at = Utc::now();
    }
}
