use clasp_core::alias::ResolveArgs;
use clasp_resolver::{make_classpath, ClasspathArgs};
use clasp_util::fs::absolutize;
use miette::Result;

use crate::cli::ResolveOpts;

pub async fn exec(opts: &ResolveOpts) -> Result<()> {
    let (deps_file, args, lib_map) = super::resolve(opts).await?;

    // Alias `paths` replace the project's own; either way they resolve
    // against the manifest directory
    let source_paths = if args.paths.is_empty() {
        &deps_file.paths
    } else {
        &args.paths
    };
    let paths: Vec<String> = source_paths
        .iter()
        .map(|p| {
            absolutize(&deps_file.root, std::path::Path::new(p))
                .display()
                .to_string()
        })
        .collect();

    let classpath = make_classpath(&lib_map, &paths, &classpath_args(&args));
    println!("{classpath}");
    Ok(())
}

fn classpath_args(args: &ResolveArgs) -> ClasspathArgs {
    ClasspathArgs {
        extra_paths: args.extra_paths.clone(),
        classpath_overrides: args.classpath_overrides.clone(),
    }
}
