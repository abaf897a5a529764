//! Authenticated API session.

use alloy::primitives::Address;

/// Bearer token plus the last known point total for one address.
///
/// Created by a successful login and dropped at exit; never persisted.
#[derive(Clone)]
pub struct Session {
    address: Address,
    token: String,
    /// Last value returned by the profile endpoint.
    pub points: u64,
}

impl Session {
    pub fn new(address: Address, token: String) -> Self {
        Self {
            address,
            token,
            points: 0,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token is a credential; keep it out of debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("points", &self.points)
            .finish()
    }
}
