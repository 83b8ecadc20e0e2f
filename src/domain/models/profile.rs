use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Player,
    Manager,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Player => "player",
            UserType::Manager => "manager",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(UserType::Player),
            "manager" => Ok(UserType::Manager),
            other => Err(format!("unknown user type '{other}'")),
        }
    }
}

impl TryFrom<String> for UserType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One per identity; `id` is the identity id.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub user_type: UserType,
}

impl Profile {
    pub fn is_manager(&self) -> bool {
        self.user_type == UserType::Manager
    }
}
