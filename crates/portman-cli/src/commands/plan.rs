use miette::Result;

use portman_ops::ops_plan::{self, PlanFormat};
use portman_ops::{ops_bootstrap, Settings};
use portman_util::progress;

pub fn exec(settings: &Settings, json: bool) -> Result<()> {
    let format = if json { PlanFormat::Json } else { PlanFormat::Plain };

    let plan = if settings.packages.is_empty() {
        progress::status_warn("Empty", "no packages requested");
        ops_plan::Plan {
            requested: Vec::new(),
            install_order: Vec::new(),
        }
    } else {
        let mut vcpkg = ops_bootstrap::existing(settings)?;
        ops_plan::plan(&settings.packages, &mut vcpkg)?
    };

    print!("{}", plan.render(format)?);
    Ok(())
}
