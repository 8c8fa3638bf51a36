//! User-facing messages
//!
//! The only two failure texts the UI ever shows. Causes go to the log.

use cat_breeds_lib::domain::DomainError;

pub const NO_INTERNET_MESSAGE: &str = "No internet connection";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, try again later";

pub fn user_message(err: &DomainError) -> &'static str {
    match err {
        DomainError::NoConnectivity => NO_INTERNET_MESSAGE,
        _ => GENERIC_ERROR_MESSAGE,
    }
}
