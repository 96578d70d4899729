//! User accounts and authentication.
//!
//! Authentication yields an [`AuthContext`] describing the acting principal. Every
//! mutating operation takes that context explicitly instead of reading ambient session
//! state, and admin-only operations check it with [`AuthContext::require_admin`].

use crate::{
    core::password,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{info, instrument, warn};

/// Username of the account seeded when no users exist.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage records and users
    Admin,
    /// Read-only access to records and reports
    User,
}

impl Role {
    /// The value stored in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(Error::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// The authenticated principal for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    /// Login name of the acting user
    pub username: String,
    /// Role of the acting user
    pub role: Role,
}

impl AuthContext {
    /// Fails with [`Error::PermissionDenied`] unless the principal is an admin.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            warn!(user = %self.username, action, "Admin-only action denied");
            Err(Error::PermissionDenied {
                action: action.to_string(),
            })
        }
    }
}

/// Public view of an account, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Login name
    pub username: String,
    /// Account role
    pub role: Role,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

impl TryFrom<user::Model> for UserInfo {
    type Error = Error;

    fn try_from(model: user::Model) -> Result<Self> {
        Ok(Self {
            role: model.role.parse()?,
            username: model.username,
            created_at: model.created_at,
        })
    }
}

/// Checks a username and password against the stored accounts.
///
/// Unknown usernames and wrong passwords both yield [`Error::AuthFailure`] after the
/// same hashing work.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<AuthContext> {
    let account = User::find_by_id(username.to_string()).one(db).await?;
    let stored_hash = account.as_ref().map(|a| a.password_hash.as_str());

    let matched = password::credentials_match(stored_hash, password, password::verify_password);
    let Some(account) = account.filter(|_| matched) else {
        info!("Login failed");
        return Err(Error::AuthFailure);
    };

    Ok(AuthContext {
        role: account.role.parse()?,
        username: account.username,
    })
}

/// Lists all accounts ordered by username. Admin only.
pub async fn list_users(db: &DatabaseConnection, ctx: &AuthContext) -> Result<Vec<UserInfo>> {
    ctx.require_admin("list users")?;

    User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?
        .into_iter()
        .map(UserInfo::try_from)
        .collect()
}

/// Creates a new account. Admin only.
#[instrument(skip(db, password), fields(actor = %ctx.username))]
pub async fn add_user(
    db: &DatabaseConnection,
    ctx: &AuthContext,
    username: &str,
    password: &str,
    role: Role,
) -> Result<UserInfo> {
    ctx.require_admin("add user")?;

    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username cannot be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("password cannot be empty"));
    }

    let password_hash = password::hash_password(password)?;

    let txn = db.begin().await?;
    if User::find_by_id(username.to_string())
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let created = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await
    .map_err(|e| duplicate_or_db(e, username))?;
    txn.commit().await?;

    info!(username, %role, "User added");
    UserInfo::try_from(created)
}

/// A primary-key clash from a concurrent add of the same name is a duplicate, not a
/// storage failure.
fn duplicate_or_db(err: DbErr, username: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateUsername {
            username: username.to_string(),
        },
        _ => Error::Database(err),
    }
}

/// Deletes an account. Admin only; the acting account cannot delete itself.
#[instrument(skip(db), fields(actor = %ctx.username))]
pub async fn delete_user(db: &DatabaseConnection, ctx: &AuthContext, username: &str) -> Result<()> {
    ctx.require_admin("delete user")?;

    if username == ctx.username {
        return Err(Error::SelfDeletionDenied);
    }

    let result = User::delete_by_id(username.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::UserNotFound {
            username: username.to_string(),
        });
    }

    info!(username, "User deleted");
    Ok(())
}

/// Seeds the default `admin` account when the users table is empty.
///
/// Returns true when an account was created.
pub async fn seed_default_admin(db: &DatabaseConnection, password: &str) -> Result<bool> {
    if User::find().count(db).await? > 0 {
        return Ok(false);
    }

    user::ActiveModel {
        username: Set(DEFAULT_ADMIN_USERNAME.to_string()),
        password_hash: Set(password::hash_password(password)?),
        role: Set(Role::Admin.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await?;

    warn!("No users found, seeded default '{DEFAULT_ADMIN_USERNAME}' account; change its password");
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_seed_default_admin_once() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(seed_default_admin(&db, "admin123").await?);
        assert!(!seed_default_admin(&db, "other").await?);

        let ctx = authenticate(&db, "admin", "admin123").await?;
        assert_eq!(ctx.role, Role::Admin);
        assert_eq!(ctx.username, "admin");

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_failure() -> Result<()> {
        let db = setup_test_db().await?;
        seed_default_admin(&db, "admin123").await?;

        let result = authenticate(&db, "admin", "wrong").await;
        assert!(matches!(result, Err(Error::AuthFailure)));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_is_same_auth_failure() -> Result<()> {
        let db = setup_test_db().await?;
        seed_default_admin(&db, "admin123").await?;

        let unknown = authenticate(&db, "nobody", "admin123").await.unwrap_err();
        let wrong = authenticate(&db, "admin", "nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_and_login() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_ctx();

        let info = add_user(&db, &admin, "zhang", "pw-1", Role::User).await?;
        assert_eq!(info.username, "zhang");
        assert_eq!(info.role, Role::User);

        let ctx = authenticate(&db, "zhang", "pw-1").await?;
        assert_eq!(ctx.role, Role::User);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_duplicate_username() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_ctx();

        add_user(&db, &admin, "zhang", "pw-1", Role::User).await?;
        let result = add_user(&db, &admin, "zhang", "pw-2", Role::Admin).await;
        assert!(matches!(
            result,
            Err(Error::DuplicateUsername { username }) if username == "zhang"
        ));

        // The original password still works
        authenticate(&db, "zhang", "pw-1").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_ctx();

        let result = add_user(&db, &admin, "   ", "pw", Role::User).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add_user(&db, &admin, "li", "", Role::User).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_regular_user_cannot_manage_users() -> Result<()> {
        let db = setup_test_db().await?;
        let viewer = user_ctx("viewer");

        let result = add_user(&db, &viewer, "li", "pw", Role::User).await;
        assert!(matches!(result, Err(Error::PermissionDenied { .. })));

        let result = delete_user(&db, &viewer, "admin").await;
        assert!(matches!(result, Err(Error::PermissionDenied { .. })));

        let result = list_users(&db, &viewer).await;
        assert!(matches!(result, Err(Error::PermissionDenied { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_self_denied() -> Result<()> {
        let db = setup_test_db().await?;
        seed_default_admin(&db, "admin123").await?;
        let admin = authenticate(&db, "admin", "admin123").await?;

        let result = delete_user(&db, &admin, "admin").await;
        assert!(matches!(result, Err(Error::SelfDeletionDenied)));

        // Account still exists
        authenticate(&db, "admin", "admin123").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_ctx();
        add_user(&db, &admin, "zhang", "pw-1", Role::User).await?;

        delete_user(&db, &admin, "zhang").await?;
        assert!(matches!(
            authenticate(&db, "zhang", "pw-1").await,
            Err(Error::AuthFailure)
        ));

        let result = delete_user(&db, &admin, "zhang").await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_sorted_without_hashes() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = admin_ctx();
        add_user(&db, &admin, "wang", "pw", Role::User).await?;
        add_user(&db, &admin, "chen", "pw", Role::Admin).await?;

        let users = list_users(&db, &admin).await?;
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["chen", "wang"]);

        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("argon2"));

        Ok(())
    }

    #[tokio::test]
    async fn test_primary_key_clash_maps_to_duplicate() -> Result<()> {
        let db = setup_test_db().await?;
        add_user(&db, &admin_ctx(), "zhang", "pw-1", Role::User).await?;

        // An insert that skipped the existence check, as a racing add would
        let err = user::ActiveModel {
            username: Set("zhang".to_string()),
            password_hash: Set("x".to_string()),
            role: Set(Role::User.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap_err();

        assert!(matches!(
            duplicate_or_db(err, "zhang"),
            Error::DuplicateUsername { username } if username == "zhang"
        ));
        Ok(())
    }

    #[test]
    fn test_other_db_errors_stay_database_errors() {
        let err = duplicate_or_db(DbErr::Custom("disk full".to_string()), "zhang");
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }
}
