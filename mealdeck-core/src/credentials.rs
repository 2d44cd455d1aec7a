//! Sign-in and sign-up form checks, run before anything is sent.

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

pub fn validate_sign_up(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_sign_in(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}
