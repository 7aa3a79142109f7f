//! Closed set of permission levels gating route access.

use std::fmt;
use std::str::FromStr;

/// Permission level attached to every user and carried in bearer tokens.
///
/// Wire names follow the deployment's vocabulary: `admin`, `perito`
/// (forensic examiner) and `assistente` (assistant).
///
/// # Examples
/// ```
/// use odonto_backend::domain::Role;
///
/// let role: Role = "perito".parse().expect("known role");
/// assert_eq!(role, Role::Examiner);
/// assert_eq!(role.as_str(), "perito");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full access, including destructive operations and user management.
    Admin,
    /// Forensic examiner.
    Examiner,
    /// Assistant to an examiner.
    Assistant,
}

/// Error raised when a role name is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be one of admin, perito, assistente (got '{value}')")]
pub struct UnknownRoleError {
    value: String,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Examiner, Role::Assistant];

    /// Stable wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Examiner => "perito",
            Self::Assistant => "assistente",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRoleError {
                value: s.to_owned(),
            })
    }
}
