//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available on the platform.
///
/// Admin bypasses every content protection check; Instructor access is
/// decided by course ownership; Student access is decided by enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Enrolls in courses and watches protected content.
    Student,
    /// Owns courses and their chapter/video tree.
    Instructor,
    /// Full platform administrator.
    Admin,
}

impl AccountRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role may own courses.
    pub fn is_instructor(&self) -> bool {
        matches!(self, Self::Instructor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = coursehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            _ => Err(coursehub_core::AppError::validation(format!(
                "Invalid account role: '{s}'. Expected one of: student, instructor, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_check() {
        assert!(AccountRole::Admin.is_admin());
        assert!(!AccountRole::Instructor.is_admin());
        assert!(!AccountRole::Student.is_admin());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<AccountRole>().unwrap(), AccountRole::Admin);
        assert_eq!(
            "STUDENT".parse::<AccountRole>().unwrap(),
            AccountRole::Student
        );
        assert!("moderator".parse::<AccountRole>().is_err());
    }
}
