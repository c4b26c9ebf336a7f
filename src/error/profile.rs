//! Saved profile errors

use super::{DevsetupError, impl_error_constructors};

impl_error_constructors!({
    ProfileNotFound as not_found(id),
    ProfileInvalid as invalid(message),
});
