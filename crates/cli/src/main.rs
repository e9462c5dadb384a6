//! CLI tool for replacing hard-coded fonts in PowerPoint files with theme fonts.

mod audit_log;
mod process;

use anyhow::Result;
use clap::Parser;
use fontnorm_core::options::DEFAULT_MAX_GROUP_DEPTH;
use fontnorm_core::RewriteOptions;
use std::path::PathBuf;
use std::process::ExitCode;

/// Replace hard-coded fonts in PowerPoint files with the theme's heading and body fonts.
///
/// Each file is backed up next to itself, rewritten in place, and every change
/// is logged to `<name>.log`.
#[derive(Parser, Debug)]
#[command(name = "replace-fonts")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PowerPoint file(s) to rewrite (.pptx)
    files: Vec<PathBuf>,

    /// Preserve code fonts instead of replacing them with theme fonts
    #[arg(long)]
    code: bool,

    /// Code font kept as-is with --code
    #[arg(long, value_name = "NAME", default_value = "Consolas")]
    code_font: String,

    /// Code font rewritten to the code font with --code (repeatable; default: Courier New)
    #[arg(long = "replace-code-font", value_name = "NAME")]
    replace_code_fonts: Vec<String>,

    /// Maximum nesting of group shapes to follow
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_GROUP_DEPTH)]
    max_depth: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn rewrite_options(&self) -> RewriteOptions {
        let mut options = RewriteOptions::new()
            .with_preserve_code_fonts(self.code)
            .with_code_font(self.code_font.as_str())
            .with_max_group_depth(self.max_depth);
        if !self.replace_code_fonts.is_empty() {
            options = options.with_replaceable_code_fonts(self.replace_code_fonts.iter().cloned());
        }
        options
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    println!("replace-fonts - version {}", env!("CARGO_PKG_VERSION"));

    let options = args.rewrite_options();
    log::debug!("Rewrite options: {:?}", options);

    let failed = process::run_files(&args.files, &options, true);

    println!("All files were processed.");

    if failed > 0 {
        log::warn!("{} of {} files failed", failed, args.files.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
