use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Account;
use crate::database::repository::AccountRepository;
use crate::filter::Filter;

struct StoredAccount {
    account: Account,
    password_hash: String,
}

/// In-process account store. Evaluates filters against serialized documents,
/// with the same semantics as the SQL the Postgres backend runs.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<Vec<StoredAccount>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_matches(stored: &StoredAccount, email: &str) -> bool {
    stored.account.email.to_lowercase() == email.to_lowercase()
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account, password_hash: &str) -> Result<(), DatabaseError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|s| email_matches(s, &account.email)) {
            return Err(DatabaseError::DuplicateKey("accounts_email_key".to_string()));
        }
        if accounts.iter().any(|s| s.account.id == account.id) {
            return Err(DatabaseError::DuplicateKey("accounts_pkey".to_string()));
        }
        accounts.push(StoredAccount {
            account: account.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|s| s.account.id == id).map(|s| s.account.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|s| email_matches(s, email)).map(|s| s.account.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<(Account, String)>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|s| email_matches(s, email))
            .map(|s| (s.account.clone(), s.password_hash.clone())))
    }

    async fn find_password_hash(&self, id: Uuid) -> Result<Option<String>, DatabaseError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|s| s.account.id == id).map(|s| s.password_hash.clone()))
    }

    async fn replace(&self, account: &Account) -> Result<bool, DatabaseError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|s| s.account.id != account.id && email_matches(s, &account.email)) {
            return Err(DatabaseError::DuplicateKey("accounts_email_key".to_string()));
        }
        match accounts.iter_mut().find(|s| s.account.id == account.id) {
            Some(stored) => {
                stored.account = account.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|s| s.account.id == id) {
            Some(stored) => {
                stored.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|s| s.account.id != id);
        Ok(accounts.len() != before)
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Account>, DatabaseError> {
        let accounts = self.accounts.read().await;
        let mut matched: Vec<(Value, &Account)> = Vec::new();
        for stored in accounts.iter() {
            let document = serde_json::to_value(&stored.account)?;
            if filter.matches(&document) {
                matched.push((document, &stored.account));
            }
        }
        matched.sort_by(|(a, _), (b, _)| filter.compare(a, b));

        let (offset, limit) = filter.window();
        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, account)| account.clone())
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        let accounts = self.accounts.read().await;
        let mut count = 0;
        for stored in accounts.iter() {
            if filter.matches(&serde_json::to_value(&stored.account)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {}
}
