use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Staff role stored in the `user_roles` table. A user is expected to hold
/// at most one of these; users without a row get no navigation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Doctor,
    Receptionist,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Doctor => "doctor",
            AppRole::Receptionist => "receptionist",
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(AppRole::Doctor),
            "receptionist" => Ok(AppRole::Receptionist),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
