use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tag row as stored in `tags`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Shortest and longest accepted tag name, in characters.
pub const TAG_NAME_MIN: usize = 1;
pub const TAG_NAME_MAX: usize = 50;
