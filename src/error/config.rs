//! Settings file errors

use super::{DevsetupError, impl_error_constructors};

impl_error_constructors!({
    ConfigParseFailed as parse_failed(path, reason),
    ConfigInvalid as invalid(message),
});
