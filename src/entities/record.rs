//! Record entity - One submitted innovation activity.
//!
//! Each record names a person and department, the activity date, the number of
//! innovations, the points awarded and whether the innovation went into production.
//! Additional records are supplemental point grants; they carry the `YYYY-MM` month
//! they were granted for.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "records")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque unique identifier (UUID v4), assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Activity date
    pub date: Date,
    /// Department name, one of the configured departments
    pub department: String,
    /// Person credited with the activity, used verbatim as a grouping key
    pub person_name: String,
    /// Free-text description of the innovation
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Number of innovations; not counted in rankings for additional records
    pub quantity: i32,
    /// Points awarded
    pub points: i32,
    /// Whether the innovation was put into production use
    pub implemented: bool,
    /// Marks a supplemental point grant
    pub is_additional: bool,
    /// `YYYY-MM` month the grant was made for, set only for additional records
    pub month_for_points: Option<String>,
    /// When the record was created; defines listing order
    pub created_at: DateTimeUtc,
    /// When the record was last edited
    pub updated_at: DateTimeUtc,
}

/// Records have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
