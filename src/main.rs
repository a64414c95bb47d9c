// src/main.rs
use std::path::PathBuf;

use clap::Parser;
use transcript_extractor::document;
use transcript_extractor::extractors::CourseExtractor;
use transcript_extractor::storage::{ExtractionStats, StorageManager};
use transcript_extractor::utils::{self, AppError};

/// Command Line Interface for the transcript course extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transcript to read (PDF, or `.txt` with already-extracted text)
    input: PathBuf,

    /// Output directory for extracted courses
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Print the course JSON to stdout instead of saving it
    #[arg(short, long)]
    print: bool,

    /// Debug mode - save the transcript text and an annotated HTML view of every match
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let name = args
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| AppError::Config(format!("Invalid input path: {}", args.input.display())))?
        .to_string();

    // 3. Decode the document into one string
    let text = document::load_transcript_text(&args.input).await?;

    // 4. Scan and resolve
    let extractor = CourseExtractor::new();
    let matches = extractor.scan(&text);
    let stats = ExtractionStats {
        matches_found: matches.len(),
        excluded: matches.iter().filter(|m| m.excluded).count(),
    };

    if args.debug {
        let debug_dir = args.output_dir.join("debug");
        std::fs::create_dir_all(&debug_dir)?;

        let text_path = debug_dir.join(format!("{}_text.txt", name));
        std::fs::write(&text_path, &text)?;
        tracing::info!("Saved transcript text to: {}", text_path.display());

        let debug_html_path = debug_dir.join(format!("{}_annotated.html", name));
        if let Err(e) = utils::html_debug::create_debug_html(&text, &debug_html_path, &matches) {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }

    let courses = extractor.resolve(matches);

    if courses.is_empty() {
        tracing::warn!("No courses found in {}", args.input.display());
    }

    // 5. Emit results
    if args.print {
        let json = courses
            .to_json_pretty()
            .map_err(|e| AppError::Output(e.to_string()))?;
        println!("{}", json);
    } else {
        let storage = StorageManager::new(&args.output_dir)?;
        storage.save_courses(&name, &courses)?;
        if let Err(e) = storage.save_metadata(&name, &args.input, &courses, stats) {
            tracing::error!("Failed to save metadata: {}", e);
        }
    }

    tracing::info!(
        "Processing finished. Courses: {}, Matches: {}, Excluded: {}",
        courses.len(),
        stats.matches_found,
        stats.excluded
    );

    Ok(())
}
