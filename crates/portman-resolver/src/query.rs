//! The collaborator interface the resolver drives.
//!
//! Implementations answer "what does this package, with these features,
//! pull in?" for installs and "what must go with it?" for removals. How they
//! find out (running a package tool, reading a fixture) is their business.

use portman_core::package_ref::PackageRef;
use portman_util::errors::PortmanError;

/// Answer to an install dependency query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Installed already, with every requested feature.
    AlreadySatisfied,
    /// Installed with a feature set that conflicts with the request. The
    /// package must be removed and resolution restarted.
    FeatureConflict(PackageRef),
    /// Packages that must be installed before or alongside this one.
    Dependencies(Vec<PackageRef>),
}

/// Answer to a removal dependency query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Nothing to remove.
    NotInstalled,
    /// Packages that must be removed together with this one.
    Dependents(Vec<PackageRef>),
}

/// Install-side query: the dependencies of a package with its features.
pub trait DependencyQuery {
    /// Errors other than [`InstallOutcome::FeatureConflict`] abort resolution;
    /// use [`PortmanError::QueryFailed`] when the answer is unusable.
    fn query_install_deps(&mut self, package: &PackageRef) -> Result<InstallOutcome, PortmanError>;
}

/// Removal-side query: the installed packages that depend on a package.
pub trait RemovalQuery {
    fn query_removal_deps(&mut self, package: &PackageRef) -> Result<RemovalOutcome, PortmanError>;
}

impl<Q: DependencyQuery + ?Sized> DependencyQuery for &mut Q {
    fn query_install_deps(&mut self, package: &PackageRef) -> Result<InstallOutcome, PortmanError> {
        (**self).query_install_deps(package)
    }
}

impl<Q: RemovalQuery + ?Sized> RemovalQuery for &mut Q {
    fn query_removal_deps(&mut self, package: &PackageRef) -> Result<RemovalOutcome, PortmanError> {
        (**self).query_removal_deps(package)
    }
}
