use clasp_resolver::DefaultProvider;
use miette::Result;

use crate::cli::ResolveOpts;

pub async fn exec(opts: &ResolveOpts) -> Result<()> {
    let (_, _, lib_map) = super::resolve(opts).await?;
    clasp_resolver::print_tree(&lib_map, &DefaultProvider);
    Ok(())
}
