//!
//! # Serpentine-Disk Layout Generator CLI
//!
//! Loads a parameter file, builds the disk layout, and writes the next numbered GDSII file.
//!

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdisk::utils::EnumStr;
use sdisk::{export, DiskLayout, DiskParams, Numbering, OutputDir, Style};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Serpentine-Disk Photomask Generator
#[derive(Parser)]
pub struct ProgramOptions {
    /// Disk Style. One of ("circular", "serpentine")
    #[arg(short, long, default_value = "circular", value_parser = parse_style)]
    style: Style,
    /// Parameter File (YAML, JSON, or TOML). Defaults are used if missing or invalid.
    #[arg(short, long, default_value = "params.yaml")]
    params: PathBuf,
    /// Output Directory
    #[arg(short, long, default_value = "layouts")]
    out: PathBuf,
    /// Output File-Name Prefix. Defaults to "csdisk" or "sdisk", per style.
    #[arg(long)]
    prefix: Option<String>,
    /// Regenerate the latest numbered output in place
    #[arg(short, long)]
    regenerate: bool,
    /// Skip writing the parameter record
    #[arg(long)]
    no_record: bool,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    init_logging(options.verbose);
    _main(&options)
}

/// Install a `fmt` subscriber, filtered by `RUST_LOG` when set
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Parse the `style` string into a [`Style`]
fn parse_style(s: &str) -> Result<Style, String> {
    Style::from_str(s).ok_or_else(|| {
        format!(
            "Invalid style: {}. Must be one of ({}).",
            s,
            Style::variants().join(", ")
        )
    })
}

pub fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let params = DiskParams::load(&options.params, options.style);
    let layout = DiskLayout::build(&params)?;

    let dir = OutputDir::create(&options.out)?;
    let prefix = match &options.prefix {
        Some(p) => p.as_str(),
        None => options.style.prefix(),
    };
    let numbering = match options.regenerate {
        true => Numbering::Latest,
        false => Numbering::Next,
    };
    let record = match options.no_record {
        true => None,
        false => Some(&params),
    };
    let exported = export(&layout, record, &dir, prefix, numbering)?;

    if options.verbose {
        let stats = sdiskgds::GdsLibrary::open(&exported.gds)?.stats();
        info!("{:?}", stats);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &std::path::Path, style: Style) -> ProgramOptions {
        ProgramOptions {
            style,
            params: dir.join("missing.yaml"),
            out: dir.join("layouts"),
            prefix: None,
            regenerate: false,
            no_record: false,
            verbose: false,
        }
    }

    #[test]
    fn it_generates_numbered_outputs() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let opts = options(dir.path(), Style::Circular);
        _main(&opts)?;
        _main(&opts)?;
        let out = dir.path().join("layouts");
        assert!(out.join("csdisk0.gds").exists());
        assert!(out.join("csdisk0.yml").exists());
        assert!(out.join("csdisk1.gds").exists());
        assert!(!out.join("csdisk2.gds").exists());
        Ok(())
    }

    #[test]
    fn it_regenerates_in_place() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let mut opts = options(dir.path(), Style::Serpentine);
        opts.no_record = true;
        _main(&opts)?;
        opts.regenerate = true;
        _main(&opts)?;
        let out = dir.path().join("layouts");
        assert!(out.join("sdisk0.gds").exists());
        assert!(!out.join("sdisk0.yml").exists());
        assert!(!out.join("sdisk1.gds").exists());
        Ok(())
    }

    #[test]
    fn it_parses_styles() {
        assert_eq!(parse_style("serpentine"), Ok(Style::Serpentine));
        assert!(parse_style("spiral").is_err());
        let opts = ProgramOptions::parse_from(["sdisk", "--style", "serpentine", "-r"]);
        assert_eq!(opts.style, Style::Serpentine);
        assert!(opts.regenerate);
        assert_eq!(opts.out, PathBuf::from("layouts"));
    }
}
