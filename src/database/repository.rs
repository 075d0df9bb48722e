use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Account;
use crate::filter::Filter;

/// Table (or collection) that holds account documents.
pub const ACCOUNTS_TABLE: &str = "accounts";

/// Storage for account documents.
///
/// The password hash is stored beside the document and only surfaces through
/// the credential reads, so regular reads can never leak it.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with `DuplicateKey` when the email is already taken (case-insensitive).
    async fn insert(&self, account: &Account, password_hash: &str) -> Result<(), DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DatabaseError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError>;

    /// Elevated read: the account together with its password hash.
    async fn find_credentials(&self, email: &str) -> Result<Option<(Account, String)>, DatabaseError>;

    /// Elevated read of the hash alone.
    async fn find_password_hash(&self, id: Uuid) -> Result<Option<String>, DatabaseError>;

    /// Replace the stored document. Returns false when no account has this id.
    async fn replace(&self, account: &Account) -> Result<bool, DatabaseError>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Documents matching the filter, ordered and windowed.
    async fn select(&self, filter: &Filter) -> Result<Vec<Account>, DatabaseError>;

    /// Number of documents matching the filter conditions, ignoring the window.
    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}
