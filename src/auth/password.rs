use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    /// Checked against when the login email is unknown, so both failure
    /// paths pay for one argon2 verification.
    static ref DUMMY_HASH: Option<String> = hash_password("krishimitra-no-such-user").ok();
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// Checks `plain` against the stored hash of a farmer's account.
///
/// `stored` is `None` when no account matched; the result is then always
/// `Ok(false)`. `Err` means the stored hash itself is unreadable, which is a
/// data problem rather than a wrong password.
pub fn verify_password(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    let Some(stored) = stored else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = check(plain, dummy);
        }
        return Ok(false);
    };
    check(plain, stored)
}

fn check(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash unreadable");
        anyhow::anyhow!("parse password hash: {e}")
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verify failed");
            Err(anyhow::anyhow!("verify password: {e}"))
        }
    }
}
