//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod record;
pub mod user;

// Re-export specific types to avoid conflicts
pub use record::{Column as RecordColumn, Entity as Record, Model as RecordModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
