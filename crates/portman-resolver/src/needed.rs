//! Minimum set of single-feature packages a project needs.
//!
//! Unlike [`crate::resolver`], this works from static port descriptions, one
//! feature at a time, so it needs no re-stating: `foo[a,b]` is simply
//! `foo[a]` plus `foo[b]`. The result is compared against what is installed
//! to find packages that can be pruned.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use portman_core::control::ControlFile;
use portman_core::package_ref::PackageRef;
use portman_util::errors::PortmanError;

/// Source of port descriptions.
pub trait PortCatalog {
    fn control(&mut self, name: &str) -> Result<ControlFile, PortmanError>;
}

/// Every single-feature package transitively required by `requested`.
///
/// Each port's description is loaded at most once. Fails with
/// [`PortmanError::UnknownFeature`] when a feature is not declared by its port.
pub fn needed_packages<C>(
    requested: &[PackageRef],
    catalog: &mut C,
) -> Result<BTreeSet<PackageRef>, PortmanError>
where
    C: PortCatalog + ?Sized,
{
    let mut needed: BTreeSet<PackageRef> = BTreeSet::new();
    let mut known: HashMap<PackageRef, Vec<PackageRef>> = HashMap::new();
    let mut loaded: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<PackageRef> = VecDeque::new();

    for single in requested.iter().flat_map(PackageRef::single_feature_refs) {
        if needed.insert(single.clone()) {
            queue.push_back(single);
        }
    }

    while let Some(single) = queue.pop_front() {
        if !known.contains_key(&single) && loaded.insert(single.name.clone()) {
            known.extend(catalog.control(&single.name)?.into_single_feature_map());
        }

        let deps = known
            .get(&single)
            .ok_or_else(|| PortmanError::UnknownFeature {
                package: single.to_string(),
            })?;

        for dep in deps {
            if needed.insert(dep.clone()) {
                queue.push_back(dep.clone());
            }
        }
    }

    tracing::debug!("{} single-feature packages needed", needed.len());
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapCatalog {
        ports: HashMap<&'static str, &'static str>,
        loads: Vec<String>,
    }

    impl PortCatalog for MapCatalog {
        fn control(&mut self, name: &str) -> Result<ControlFile, PortmanError> {
            self.loads.push(name.to_string());
            let content = self.ports.get(name).ok_or_else(|| PortmanError::Generic {
                message: format!("no port {name}"),
            })?;
            ControlFile::parse(content)
        }
    }

    fn catalog() -> MapCatalog {
        MapCatalog {
            ports: HashMap::from([
                (
                    "curl",
                    "Source: curl\nBuild-Depends: zlib\n\nFeature: ssl\nBuild-Depends: openssl\n",
                ),
                ("zlib", "Source: zlib\n"),
                ("openssl", "Source: openssl\nBuild-Depends: zlib\n"),
            ]),
            loads: Vec::new(),
        }
    }

    fn rendered(set: &BTreeSet<PackageRef>) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn expands_features_transitively() {
        let mut catalog = catalog();
        let needed =
            needed_packages(&[PackageRef::parse("curl[core,ssl]").unwrap()], &mut catalog).unwrap();
        assert_eq!(
            rendered(&needed),
            vec!["curl[core]", "curl[ssl]", "openssl[core]", "zlib[core]"]
        );
    }

    #[test]
    fn each_port_is_loaded_once() {
        let mut catalog = catalog();
        needed_packages(&[PackageRef::parse("curl[core,ssl]").unwrap()], &mut catalog).unwrap();
        let mut loads = catalog.loads.clone();
        loads.sort();
        assert_eq!(loads, vec!["curl", "openssl", "zlib"]);
    }

    #[test]
    fn undeclared_feature_is_an_error() {
        let mut catalog = catalog();
        let err = needed_packages(&[PackageRef::parse("curl[http2]").unwrap()], &mut catalog)
            .unwrap_err();
        assert!(matches!(err, PortmanError::UnknownFeature { package } if package == "curl[http2]"));
    }
}
