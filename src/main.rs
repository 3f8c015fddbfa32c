use anyhow::{bail, Context, Result};
use clap::Parser;
use quote_card::{
    download_png, render, FileDelivery, FontSource, RenderOptions, RenderState, Surface, Surfaces,
    NORMAL_WEIGHT,
};
use std::path::{Path, PathBuf};

const SURFACE_ID: &str = "card";

#[derive(Parser, Debug)]
#[command(name = "quote-card", about = "Render a quote card onto a background image")]
struct Args {
    /// Background image; the card is exported at its size
    #[arg(long)]
    background: PathBuf,

    /// Where to write the PNG
    #[arg(long, short)]
    out: PathBuf,

    /// JSON render options (camelCase keys, all optional)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Font to register as the bundled fallback
    #[arg(long)]
    bundled_font: Option<PathBuf>,

    /// Family name for --bundled-font
    #[arg(long, default_value = "Bundled")]
    bundled_family: String,

    /// Weight of --bundled-font
    #[arg(long, default_value_t = NORMAL_WEIGHT)]
    bundled_weight: u16,

    /// Custom font; implies useCustomFont
    #[arg(long)]
    font: Option<PathBuf>,

    /// Separator image drawn under the name (.svg or raster)
    #[arg(long)]
    separator: Option<PathBuf>,

    /// Character name, overrides the options file
    #[arg(long)]
    name: Option<String>,

    /// Body text, overrides the options file
    #[arg(long)]
    text: Option<String>,
}

/// Split `--out` into the directory to write into and the file name to write
fn split_out_path(out: &Path) -> Result<(PathBuf, String)> {
    let Some(filename) = out.file_name() else {
        bail!("--out must name a file: {}", out.display());
    };
    let Some(filename) = filename.to_str() else {
        bail!("--out file name is not valid UTF-8: {}", out.display());
    };
    let directory = out
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((directory, filename.to_string()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (directory, filename) = split_out_path(&args.out)?;

    let mut options = match &args.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options: {}", path.display()))?;
            RenderOptions::from_json(&json)
                .with_context(|| format!("failed to parse options: {}", path.display()))?
        }
        None => RenderOptions::default(),
    };
    if let Some(name) = args.name {
        options.character_name = name;
    }
    if let Some(text) = args.text {
        options.body_text = text;
    }

    let mut surfaces = Surfaces::new();
    surfaces.insert(Surface::new(SURFACE_ID));
    let mut state = RenderState::new();

    if let Some(path) = args.bundled_font {
        state
            .load_bundled_font(&args.bundled_family, FontSource::Path(path.clone()), args.bundled_weight)
            .with_context(|| format!("failed to load font: {}", path.display()))?;
    }
    if let Some(path) = args.font {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read font: {}", path.display()))?;
        state
            .load_font_from_bytes(&bytes, "Custom")
            .with_context(|| format!("failed to load font: {}", path.display()))?;
        options.use_custom_font = true;
    }
    if let Some(path) = args.separator {
        state
            .load_separator_image(&path)
            .with_context(|| format!("failed to load separator: {}", path.display()))?;
    }

    let background = std::fs::read(&args.background)
        .with_context(|| format!("failed to read background: {}", args.background.display()))?;
    state
        .set_background_image_from_bytes(&mut surfaces, SURFACE_ID, &background)
        .with_context(|| format!("failed to decode background: {}", args.background.display()))?;

    render(&state, &mut surfaces, SURFACE_ID, &options)?;

    let mut delivery = FileDelivery::new(directory);
    match download_png(&mut state, &surfaces, SURFACE_ID, Some(&filename), &mut delivery)? {
        Some(name) => log::info!("wrote {name}"),
        None => bail!("failed to encode the card as PNG"),
    }

    state.dispose_background();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_path_is_split_into_directory_and_name() {
        let (directory, filename) = split_out_path(Path::new("cards/aoi.png")).expect("splits");
        assert_eq!(directory, PathBuf::from("cards"));
        assert_eq!(filename, "aoi.png");

        let (directory, filename) = split_out_path(Path::new("aoi.png")).expect("splits");
        assert_eq!(directory, PathBuf::from(""));
        assert_eq!(filename, "aoi.png");
    }

    #[test]
    fn out_path_without_a_file_name_is_rejected() {
        assert!(split_out_path(Path::new("/")).is_err());
        assert!(split_out_path(Path::new("cards/..")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let out = Path::new(OsStr::from_bytes(b"cards/\xffaoi.png"));
        assert!(split_out_path(out).is_err());
    }
}
