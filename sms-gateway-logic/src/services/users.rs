use crate::{
    error::ServiceError,
    repository::UserStore,
    types::{User, UserId},
};
use std::sync::Arc;

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str) -> Result<User, ServiceError> {
        self.store.create(name).await
    }

    pub async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        self.store.get(id).await
    }

    /// Credits `amount`. A zero amount is a no-op reported as "no change";
    /// a negative amount is refused before the store is touched.
    pub async fn increase_balance(&self, id: UserId, amount: i64) -> Result<i64, ServiceError> {
        self.adjust_balance(id, amount, 1).await
    }

    /// Debits `amount` with the same sign rules; the store refuses a debit
    /// that would leave the balance negative.
    pub async fn decrease_balance(&self, id: UserId, amount: i64) -> Result<i64, ServiceError> {
        self.adjust_balance(id, amount, -1).await
    }

    async fn adjust_balance(
        &self,
        id: UserId,
        amount: i64,
        sign: i64,
    ) -> Result<i64, ServiceError> {
        if amount == 0 {
            return Ok(0);
        }
        if amount < 0 {
            return Err(ServiceError::InvalidBalance);
        }
        self.store.update_balance(id, sign * amount).await
    }
}
