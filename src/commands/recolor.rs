//! Implementation of the `tintforge recolor` command.
//!
//! Runs one image through the palette recolorer outside the pipeline, which
//! is handy for previewing a color scheme before a full run.

use crate::cli::RecolorArgs;
use crate::codec::{encode_png, load_rgba};
use crate::config::Config;
use crate::context::load_project;
use crate::error::{ForgeError, Result};
use crate::fs::atomic_write;
use crate::palette::{RecolorMode, recolor, smooth};
use std::path::Path;

pub fn cmd_recolor(root: Option<&Path>, args: RecolorArgs) -> Result<()> {
    let (_, config) = load_project(root)?;
    let mode = recolor_file(&config, &args)?;

    println!(
        "Recolored {} -> {} (scheme {}, {})",
        args.input.display(),
        args.output.display(),
        args.scheme,
        match mode {
            RecolorMode::Direct => "direct",
            RecolorMode::Clustered { .. } => "clustered",
        }
    );
    Ok(())
}

/// Recolor `args.input` into `args.output`, returning the mode used.
fn recolor_file(config: &Config, args: &RecolorArgs) -> Result<RecolorMode> {
    let scheme = config
        .palettes()?
        .into_iter()
        .find(|scheme| scheme.name == args.scheme)
        .ok_or_else(|| {
            ForgeError::UserError(format!(
                "unknown color scheme '{}' (configured: {})",
                args.scheme,
                config.color_schemes.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;

    let mode = if args.direct {
        RecolorMode::Direct
    } else {
        config.recolor.recolor_mode()
    };

    let image = load_rgba(&args.input)?;
    let mut recolored = recolor(&image, &scheme, mode)?;
    if args.blur {
        recolored = smooth(&recolored, config.recolor.blur_radius);
    }

    atomic_write(&args.output, &encode_png(&recolored)?)?;
    Ok(mode)
}
