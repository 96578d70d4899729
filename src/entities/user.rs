//! User entity - An authentication principal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique login name
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    /// Argon2id PHC hash string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// `"admin"` or `"user"`
    pub role: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Users have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
