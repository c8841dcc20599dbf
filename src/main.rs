use clap::Parser;
use obsidian_extract::prelude::*;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.is_dir() {
        return Err(format!("{} is not dir", path.display()));
    }

    Ok(path)
}

/// Export Obsidian notes and their media into a portable markdown tree
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Source directory containing markdown files
    #[arg(short, long, value_parser = parse_dir)]
    src: PathBuf,

    /// Source directory containing media files
    #[arg(short = 'm', long)]
    src_media: PathBuf,

    /// Goal directory to save processed files
    #[arg(short, long)]
    goal: PathBuf,

    /// Write notes under sanitized file names so that links between them resolve
    #[arg(long)]
    sanitize_names: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = ExportOptions::new(&args.src, &args.src_media, &args.goal);

    let notes = Exporter::new(&options)
        .sanitize_file_names(args.sanitize_names)
        .into_iter();

    for note in notes {
        match note {
            Ok(note) => println!("---> Processed {note}"),
            Err(error) => {
                eprintln!("Export failed: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
