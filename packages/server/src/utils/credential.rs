//! How a submitted password is turned into the value kept in `users.password`.
//!
//! Credentials are stored verbatim. This is the only place that knows that, so
//! switching to a hashing scheme means changing [`stored_form`] alone.

/// Value persisted for a newly supplied password.
pub fn stored_form(password: &str) -> String {
    password.to_owned()
}
