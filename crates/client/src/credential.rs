// Session credential
//
// In-memory copy of the persisted token, written through to the backing
// store. Persistence failures are logged and never block a state change:
// the in-memory value is authoritative for the life of the context.

use std::cell::RefCell;

use filehost_api_client::TokenSource;
use filehost_config::CredentialStore;

pub struct Credential {
    token: RefCell<Option<String>>,
    store: Box<dyn CredentialStore>,
}

impl Credential {
    /// Load whatever token the store holds from a previous run.
    pub fn restore(store: Box<dyn CredentialStore>) -> Self {
        let token = match store.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Failed to restore session token: {}", e);
                None
            }
        };
        Self { token: RefCell::new(token), store }
    }

    pub fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.token.borrow().is_some()
    }

    pub(crate) fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
        if let Err(e) = self.store.set(token) {
            log::warn!("Failed to persist session token: {}", e);
        }
    }

    pub(crate) fn clear(&self) {
        *self.token.borrow_mut() = None;
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear persisted session token: {}", e);
        }
    }
}

impl TokenSource for Credential {
    fn token(&self) -> Option<String> {
        self.get()
    }
}
