//! Package references (`name[feature,...]`) and feature-set helpers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use portman_util::errors::PortmanError;
use serde::{Serialize, Serializer};

/// Feature implied by a bare package name.
pub const DEFAULT_FEATURE: &str = "core";

/// A package name plus the set of features requested of it.
///
/// The canonical text form is `name[feat1,feat2]` with features in sorted
/// order; a bare `name` means `name[core]`. Within one resolution the name
/// alone identifies the package; see [`PackageRef::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageRef {
    pub name: String,
    pub features: BTreeSet<String>,
}

impl PackageRef {
    pub fn new<I, S>(name: impl Into<String>, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// A reference carrying only the implicit `core` feature.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, [DEFAULT_FEATURE])
    }

    /// Parse `name` or `name[feat,...]`.
    ///
    /// Splits on the first `[`. Whitespace around features is ignored.
    /// `name[]` is rejected with [`PortmanError::EmptyFeatureList`].
    pub fn parse(input: &str) -> Result<Self, PortmanError> {
        let text = input.trim();
        let invalid = |reason: &str| PortmanError::InvalidPackageRef {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, rest) = match text.split_once('[') {
            Some((name, rest)) => (name, Some(rest)),
            None => (text, None),
        };

        if name.is_empty() {
            return Err(invalid("missing package name"));
        }
        if name.contains(|c: char| c.is_whitespace() || c == ']' || c == ',') {
            return Err(invalid("package name contains a separator"));
        }

        let Some(rest) = rest else {
            return Ok(Self::bare(name));
        };

        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| invalid("missing closing `]`"))?;
        if inner.contains(['[', ']']) {
            return Err(invalid("nested brackets"));
        }
        if inner.trim().is_empty() {
            return Err(PortmanError::EmptyFeatureList {
                package: text.to_string(),
            });
        }

        let mut features = BTreeSet::new();
        for feature in inner.split(',').map(str::trim) {
            if feature.is_empty() {
                return Err(invalid("empty feature name"));
            }
            features.insert(feature.to_string());
        }

        Ok(Self {
            name: name.to_string(),
            features,
        })
    }

    /// Identity key within a resolution run: the bare package name.
    pub fn key(&self) -> &str {
        &self.name
    }

    /// Whether both references name the same package, regardless of features.
    pub fn same_package(&self, other: &PackageRef) -> bool {
        self.name == other.name
    }

    /// Decompose into `(bare name, feature set)`.
    pub fn into_parts(self) -> (String, BTreeSet<String>) {
        (self.name, self.features)
    }

    /// One reference per feature: `foo[a,b]` becomes `foo[a]`, `foo[b]`.
    pub fn single_feature_refs(&self) -> Vec<PackageRef> {
        self.features
            .iter()
            .map(|feature| PackageRef::new(self.name.clone(), [feature.clone()]))
            .collect()
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(feature)?;
        }
        f.write_str("]")
    }
}

impl FromStr for PackageRef {
    type Err = PortmanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PackageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Append `[core]` to a bare name; leave names with a feature list untouched.
pub fn normalize_name(package: &str) -> String {
    if package.contains('[') {
        package.to_string()
    } else {
        format!("{package}[{DEFAULT_FEATURE}]")
    }
}

/// Strip the feature list: `foo[a,b]` becomes `foo`.
pub fn denormalize_name(package: &str) -> &str {
    package.split_once('[').map_or(package, |(name, _)| name)
}

/// Fold every request for the same name into one union feature set.
///
/// Only suitable for plain deduplication. An install order cannot be merged
/// this way because it lacks the graph needed to re-state widened packages.
pub fn merge_feature_requests<'a, I>(refs: I) -> BTreeMap<String, BTreeSet<String>>
where
    I: IntoIterator<Item = &'a PackageRef>,
{
    let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for r in refs {
        merged
            .entry(r.name.clone())
            .or_default()
            .extend(r.features.iter().cloned());
    }
    merged
}

/// [`merge_feature_requests`] rendered back into references, sorted by name.
pub fn deduplicate<'a, I>(refs: I) -> Vec<PackageRef>
where
    I: IntoIterator<Item = &'a PackageRef>,
{
    merge_feature_requests(refs)
        .into_iter()
        .map(|(name, features)| PackageRef { name, features })
        .collect()
}

/// Split a human-written package list such as `"zlib, curl[ssl,http2] fmt"`.
///
/// Commas and whitespace separate entries except inside brackets.
/// Parenthesised platform qualifiers like `(!uwp)` are skipped.
pub fn split_package_list(list: &str) -> Result<Vec<PackageRef>, PortmanError> {
    let mut refs = Vec::new();
    let mut current = String::new();
    let mut brackets = 0usize;
    let mut parens = 0usize;

    for c in list.chars() {
        match c {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            _ if parens > 0 => {}
            '[' => {
                brackets += 1;
                current.push(c);
            }
            ']' => {
                brackets = brackets.saturating_sub(1);
                current.push(c);
            }
            ',' if brackets == 0 => flush(&mut current, &mut refs)?,
            c if c.is_whitespace() && brackets == 0 => flush(&mut current, &mut refs)?,
            c => current.push(c),
        }
    }
    flush(&mut current, &mut refs)?;
    Ok(refs)
}

fn flush(current: &mut String, refs: &mut Vec<PackageRef>) -> Result<(), PortmanError> {
    if !current.is_empty() {
        refs.push(PackageRef::parse(current)?);
        current.clear();
    }
    Ok(())
}
