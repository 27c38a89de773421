//! Port CONTROL file parsing.
//!
//! Only the keys that matter for dependency discovery are read: `Source`,
//! `Feature`, `Build-Depends` and `Default-Features`. Lines that are not a
//! `key: value` pair are ignored, so multi-line descriptions pass through.

use std::collections::BTreeMap;

use portman_util::errors::PortmanError;

use crate::package_ref::{split_package_list, PackageRef, DEFAULT_FEATURE};

/// Per-feature requirements of one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile {
    /// Port name from the `Source:` field.
    pub source: String,
    /// Feature name to the single-feature references it requires.
    /// Always contains the `core` feature.
    pub features: BTreeMap<String, Vec<PackageRef>>,
}

impl ControlFile {
    pub fn parse(content: &str) -> Result<Self, PortmanError> {
        let mut source: Option<String> = None;
        let mut current = DEFAULT_FEATURE.to_string();
        let mut features: BTreeMap<String, Vec<PackageRef>> = BTreeMap::new();
        features.insert(current.clone(), Vec::new());

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }

            match key {
                "Source" => source = Some(value.to_string()),
                "Feature" => {
                    current = value.to_string();
                    features.entry(current.clone()).or_default();
                }
                "Build-Depends" => {
                    let deps = split_package_list(value)?
                        .iter()
                        .flat_map(PackageRef::single_feature_refs)
                        .collect::<Vec<_>>();
                    features.entry(current.clone()).or_default().extend(deps);
                }
                "Default-Features" => {
                    let name = source.clone().ok_or_else(|| PortmanError::Generic {
                        message: "CONTROL file lists Default-Features before Source".to_string(),
                    })?;
                    let defaults = value
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .filter(|f| !f.is_empty())
                        .map(|f| PackageRef::new(name.clone(), [f]))
                        .collect::<Vec<_>>();
                    features.entry(current.clone()).or_default().extend(defaults);
                }
                _ => {}
            }
        }

        let source = source.ok_or_else(|| PortmanError::Generic {
            message: "CONTROL file has no Source field".to_string(),
        })?;

        Ok(Self { source, features })
    }

    /// Requirements of one feature of this port, if the port declares it.
    pub fn requirements(&self, feature: &str) -> Option<&[PackageRef]> {
        self.features.get(feature).map(Vec::as_slice)
    }

    /// Flatten into `name[feature]` keyed requirements.
    pub fn into_single_feature_map(self) -> BTreeMap<PackageRef, Vec<PackageRef>> {
        let source = self.source;
        self.features
            .into_iter()
            .map(|(feature, deps)| (PackageRef::new(source.clone(), [feature]), deps))
            .collect()
    }
}
