//! Request validation errors
//!
//! Raised before any privileged action is attempted.

use super::{DevsetupError, impl_error_constructors};

impl_error_constructors!({
    UnknownTool as unknown_tool(id),
    UnknownExtra as unknown_extra(tool, extra),
    ToolNotInstalled as not_installed(id),
    NoConfigManagement as no_config_management(tool),
    InvalidConfigName as invalid_config_name(name),
});
