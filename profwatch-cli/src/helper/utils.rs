use anyhow::{anyhow, Result};
use tracing::debug;

use profwatch_api::API;

use crate::helper::ctx::Context;

pub fn build_api<'a>(ctx: &impl Context<'a>) -> Result<API> {
    let base_url = ctx.api_base_url();
    let api = API::try_with_options(base_url, ctx.timeout())
        .map_err(|e| anyhow!("failed to set up api client: {e}"))?;
    debug!("backend: {}", api.base_url());
    Ok(api)
}
