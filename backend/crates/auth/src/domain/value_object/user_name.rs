//! User Name Value Object
//!
//! ユーザー名はログインと画面表示に使う識別子。
//! 既定アカウント（子ども）の初期名にも使われるため、日本語などの
//! 非 ASCII 文字も許可する。
//!
//! ## 設計方針
//! - NFKC正規化 → trim → 検証 の順で処理
//! - 表示用 `original` は大文字小文字を保持
//! - 一意性判定用 `canonical` は小文字
//!
//! ## 不変条件
//! - 長さ: 3〜30文字（正規化後、コードポイント単位）
//! - 空白文字・制御文字を含まない

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    /// User name is too short (minimum: USER_NAME_MIN_LENGTH)
    TooShort { length: usize, min: usize },

    /// User name is too long (maximum: USER_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// User name contains whitespace
    ContainsWhitespace,

    /// User name contains a control character
    ContainsControl,
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username is required"),
            Self::TooShort { length, min } => {
                write!(f, "Username is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Username is too long ({length} chars, maximum {max})")
            }
            Self::ContainsWhitespace => write!(f, "Username cannot contain whitespace"),
            Self::ContainsControl => write!(f, "Username contains invalid characters"),
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated, normalized user name
///
/// # Storage
/// - `original`: trimmed, NFKC normalized, case preserved
/// - `canonical`: lowercase form for uniqueness checks
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    /// Create a new UserName from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let original = Self::normalize(input.as_ref());
        Self::validate(&original)?;
        let canonical = original.to_lowercase();
        Ok(Self {
            original,
            canonical,
        })
    }

    /// Get the original user name (preserves case)
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Get the canonical (lowercase) user name
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Create from database value (assumes already validated)
    pub fn from_db(original: &str) -> Self {
        Self {
            original: original.to_string(),
            canonical: original.to_lowercase(),
        }
    }

    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        if name.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = name.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if name.chars().any(char::is_whitespace) {
            return Err(UserNameError::ContainsWhitespace);
        }

        if name.chars().any(char::is_control) {
            return Err(UserNameError::ContainsControl);
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserName")
            .field("original", &self.original)
            .field("canonical", &self.canonical)
            .finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = UserName::new("  hanako  ").unwrap();
            assert_eq!(name.original(), "hanako");
        }

        #[test]
        fn test_canonical_is_lowercase() {
            let name = UserName::new("HanaKo").unwrap();
            assert_eq!(name.original(), "HanaKo");
            assert_eq!(name.canonical(), "hanako");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) becomes ASCII 'A'
            let name = UserName::new("Ａlice").unwrap();
            assert_eq!(name.original(), "Alice");
            assert_eq!(name.canonical(), "alice");
        }

        #[test]
        fn test_japanese_allowed() {
            let name = UserName::new("やまだ花子").unwrap();
            assert_eq!(name.original(), "やまだ花子");
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
        }

        #[test]
        fn test_too_short() {
            assert_eq!(
                UserName::new("ab"),
                Err(UserNameError::TooShort { length: 2, min: 3 })
            );
        }

        #[test]
        fn test_length_bounds() {
            assert!(UserName::new("abc").is_ok());
            assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
            assert!(matches!(
                UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
                Err(UserNameError::TooLong { .. })
            ));
        }

        #[test]
        fn test_whitespace_in_middle_fails() {
            assert_eq!(
                UserName::new("hana ko"),
                Err(UserNameError::ContainsWhitespace)
            );
            // Ideographic space
            assert_eq!(
                UserName::new("はな\u{3000}こ"),
                Err(UserNameError::ContainsWhitespace)
            );
        }

        #[test]
        fn test_control_character_fails() {
            assert_eq!(
                UserName::new("hana\u{0007}ko"),
                Err(UserNameError::ContainsControl)
            );
        }
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"Hanako\"").unwrap();
        assert_eq!(name.canonical(), "hanako");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Hanako\"");

        assert!(serde_json::from_str::<UserName>("\"ab\"").is_err());
    }
}
