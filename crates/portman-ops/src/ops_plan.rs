//! Operation: resolve the project's packages without installing anything.

use serde::Serialize;

use portman_core::package_ref::PackageRef;
use portman_resolver::{resolve, DependencyQuery};
use portman_util::progress;

/// Output format for `portman plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanFormat {
    #[default]
    Plain,
    Json,
}

/// A resolved install order.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub requested: Vec<PackageRef>,
    /// Every package after all of its dependencies.
    pub install_order: Vec<PackageRef>,
}

impl Plan {
    pub fn render(&self, format: PlanFormat) -> miette::Result<String> {
        match format {
            PlanFormat::Plain => Ok(self
                .install_order
                .iter()
                .map(|p| format!("{p}\n"))
                .collect()),
            PlanFormat::Json => serde_json::to_string_pretty(self)
                .map(|s| s + "\n")
                .map_err(|e| {
                    portman_util::errors::PortmanError::Generic {
                        message: format!("Failed to serialize plan: {e}"),
                    }
                    .into()
                }),
        }
    }
}

/// Resolve `packages` through `query` into an install order.
pub fn plan<Q>(packages: &[PackageRef], query: &mut Q) -> miette::Result<Plan>
where
    Q: DependencyQuery + ?Sized,
{
    let step = progress::Step::start("Resolving", "dependency tree");
    let install_order = match resolve(packages, query) {
        Ok(order) => order,
        Err(e) => {
            step.fail("failed");
            return Err(e.into());
        }
    };
    step.ok(&progress::plural(install_order.len(), "package", "packages"));

    Ok(Plan {
        requested: packages.to_vec(),
        install_order,
    })
}
