//! The declared platform topology — two deployment units.
//!
//! The backend data-platform stack must deploy before the frontend stack:
//! the frontend imports the hosting bucket by export name, and the export
//! registry only carries names from stacks declared earlier.

pub mod backend;
pub mod frontend;

use crate::core::app::App;
use crate::core::types::{DeployContext, Environment};

pub const BACKEND_STACK_NAME: &str = "visual-search-backend";
pub const FRONTEND_STACK_NAME: &str = "visual-search-frontend";

/// Assemble the full two-stack app in deployment order.
pub fn platform_app(
    env: &Environment,
    ctx: &DeployContext,
    roster: &[&str],
) -> Result<App, String> {
    let mut app = App::new();
    app.add_stack(backend::backend_stack(env, ctx, roster)?);
    app.add_stack(frontend::frontend_stack(env)?);
    Ok(app)
}
