//! Package backends
//!
//! A [`PackageBackend`] installs and removes OS packages. The operations
//! layer only talks to this trait, so it can be driven by a fake in tests.

pub mod apt;

pub use apt::AptBackend;

use crate::catalog::PackageSpec;
use crate::error::Result;
use crate::privilege::{Credential, OutputChunk};

pub trait PackageBackend {
    /// Package names to hand to the package manager, after overrides.
    fn effective_packages(&self, spec: &PackageSpec) -> Vec<String>;

    /// True when every package is installed. Needs no credential.
    fn is_installed(&self, packages: &[String]) -> bool;

    /// Install `packages`, streaming package-manager output to `on_chunk`.
    fn install(
        &self,
        packages: &[String],
        credential: &Credential,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<()>;

    fn remove(
        &self,
        packages: &[String],
        credential: &Credential,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<()>;
}
