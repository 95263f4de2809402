mod apply;
mod batch;
mod config;
mod naming;
mod planner;
mod rule;

pub use apply::{
    apply_plan, apply_plan_with_options, ApplyError, ApplyOptions, ApplyResult, RenameOperation,
};
pub use batch::{bulk_rename, bulk_rename_with_rule};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use naming::{format_counter, is_candidate_name, slice_original_name, target_name_for};
pub use planner::{compute_target_names, generate_plan, RenameCandidate, RenamePlan, RenameStats};
pub use rule::{NameSlice, RenameRule, RuleError};
