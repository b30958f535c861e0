// src/auth/local.rs - accounts from the config file
use super::{Actor, AuthError, AuthProvider, AuthResult};
use crate::core::config::Account;
use futures::future::BoxFuture;
use futures::FutureExt;
use sha2::{Digest, Sha256};

const HASH_PREFIX: &str = "$sha256$";

pub struct LocalAuth {
    accounts: Vec<Account>,
    salt: String,
}

impl LocalAuth {
    pub fn new(accounts: Vec<Account>, salt: impl Into<String>) -> Self {
        Self {
            accounts,
            salt: salt.into(),
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn verify(&self, stored: &str, provided: &str) -> bool {
        let expected = match stored.strip_prefix(HASH_PREFIX) {
            Some(hex) => hex.to_lowercase(),
            None => hash_password(&self.salt, stored),
        };
        constant_time_eq(
            expected.as_bytes(),
            hash_password(&self.salt, provided).as_bytes(),
        )
    }

    fn authenticate(&self, email: &str, password: &str) -> AuthResult<Actor> {
        let email = email.trim();
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify(&account.password, password) {
            log::warn!("Failed sign-in for {}", account.email);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Actor::new(
            account.id.clone(),
            account.email.clone(),
            account.display_name.clone(),
        ))
    }
}

impl AuthProvider for LocalAuth {
    fn name(&self) -> &'static str {
        "local"
    }

    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, AuthResult<Actor>> {
        futures::future::ready(self.authenticate(email, password)).boxed()
    }
}

/// Hex SHA-256 of `salt:password`, the format accepted after `$sha256$`.
pub fn hash_password(salt: &str, password: &str) -> String {
    format!("{:x}", Sha256::digest(format!("{}:{}", salt, password).as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
