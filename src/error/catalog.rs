//! Tool catalog errors

use super::{DevsetupError, impl_error_constructors};

impl_error_constructors!({
    CatalogNotFound as not_found(path),
    CatalogParseFailed as parse_failed(path, reason),
    CatalogInvalid as invalid(message),
    DuplicateToolId as duplicate_id(id),
    InvalidPackageName as invalid_package(tool, package),
});
