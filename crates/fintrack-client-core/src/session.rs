use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret as _, SecretString};

use fintrack_shared::user::{AuthProvider, Email};

/// Holds the bearer credential for the signed-in user.
///
/// Cheap to clone, all clones observe the same credential. Nothing here
/// decodes the credential, the backend is the only party that interprets it.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<Mutex<Option<SecretString>>>,
}

/// Immutable facts about the signed-in user kept for display purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub email: Email,
    pub provider: Option<AuthProvider>,
}

impl TokenStore {
    pub fn set(&self, token: SecretString) {
        *self.token.lock().expect("mutex poisoned") = Some(token);
    }

    pub fn clear(&self) {
        *self.token.lock().expect("mutex poisoned") = None;
    }

    pub fn is_present(&self) -> bool {
        self.token.lock().expect("mutex poisoned").is_some()
    }

    /// Copy of the credential for attaching to a request or persisting
    pub fn get(&self) -> Option<SecretString> {
        self.token.lock().expect("mutex poisoned").clone()
    }

    /// The raw credential as a string, only for writing to app storage
    pub fn expose_for_persistence(&self) -> Option<String> {
        self.token
            .lock()
            .expect("mutex poisoned")
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_credential() {
        // Arrange
        let store = TokenStore::default();
        let observer = store.clone();

        // Act
        store.set(SecretString::from("abc"));

        // Assert
        assert!(observer.is_present());

        // Act - clear through the clone
        observer.clear();

        // Assert
        assert!(!store.is_present());
        assert_eq!(store.get().map(|t| t.expose_secret().to_string()), None);
    }
}
