//! Explicit elevated-privilege capability.
//!
//! Reconciliation must create accounts and groups outside the acting
//! user's own permissions. Instead of an ambient sudo-style execution
//! mode, the privilege is a value threaded explicitly through every
//! store call that needs it.

/// Capability token for privileged identity-store operations.
///
/// Store methods that mutate state outside the acting user's own
/// permissions take a `&SystemAccess` parameter. The token carries no
/// data; its purpose is to make elevated execution visible in
/// signatures and at call sites.
#[derive(Debug, Clone, Copy)]
pub struct SystemAccess {
    _private: (),
}

impl SystemAccess {
    /// Acquires the elevated-privilege capability.
    ///
    /// Callers should acquire the token once per reconciliation run and
    /// scope it as narrowly as practical.
    #[must_use]
    pub const fn acquire() -> Self {
        Self { _private: () }
    }
}
