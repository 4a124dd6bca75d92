use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use prospector_pal::analysis::RockAnalysis;
use prospector_pal::config::PalConfig;
use prospector_pal::error::PalError;
use prospector_pal::export::export_scan;
use prospector_pal::gallery::{GalleryStore, SavedScan};
use prospector_pal::normalize::EncodedImage;
use prospector_pal::session::ScanSession;
use prospector_pal::source::FileSource;
use prospector_pal::tips::tip_of_the_day;

/// Prospector's Pal: photograph a rock, learn what it is and what it's worth,
/// and keep the finds you care about in a local collection.
#[derive(Parser, Debug)]
#[command(name = "pal")]
#[command(about = "⛏️  Identify rocks & minerals from a photo and track your collection")]
#[command(
    long_about = "Identify rocks and minerals from a photo using a hosted generative vision model.
Saves the scans you choose to keep into a local gallery and exports their images as files."
)]
struct Cli {
    /// Gallery collection file
    #[arg(long, help = "Path of the gallery JSON file")]
    gallery: Option<PathBuf>,

    /// Where exported payload files land
    #[arg(long, help = "Directory for exported image files")]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify a rock or mineral from an image file
    Identify {
        /// Image to analyze (JPEG, PNG, WebP, ...)
        image: PathBuf,

        /// Save the result into the gallery (also exports the image)
        #[arg(long, help = "Save the scan into the gallery")]
        save: bool,

        /// Skip the export side effect when saving
        #[arg(long, help = "Don't export the image file on save")]
        no_export: bool,

        /// Use the offline mock analyzer instead of the hosted model
        #[arg(long, help = "Answer with a fixed offline result (no API key needed)")]
        mock: bool,
    },

    /// Work with the saved-scan collection
    Gallery {
        #[command(subcommand)]
        action: GalleryCommand,
    },

    /// Print a prospecting tip
    Tip,
}

#[derive(Subcommand, Debug)]
enum GalleryCommand {
    /// List saved scans, newest first
    List,
    /// Show one saved scan in full
    Show { id: String },
    /// Delete a saved scan by identifier
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PalConfig::from_env();
    if let Some(gallery) = cli.gallery {
        config.gallery_path = gallery;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export_dir = export_dir;
    }
    config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    match cli.command {
        Some(Command::Identify {
            image,
            save,
            no_export,
            mock,
        }) => identify(&config, image, save, no_export, mock).await,
        Some(Command::Gallery { action }) => gallery(&config, action).await,
        Some(Command::Tip) => {
            println!("💡 Prospector's Tip: {}", tip_of_the_day());
            Ok(())
        }
        None => {
            println!("⛏️  Prospector's Pal");
            println!("💡 Prospector's Tip: {}", tip_of_the_day());
            println!();
            println!("Try: pal identify <IMAGE>   (add --save to keep it in your collection)");
            Ok(())
        }
    }
}

/// Run one scan cycle and render the result. Any failure surfaces its
/// user-facing message and returns the process to idle.
async fn identify(
    config: &PalConfig,
    image: PathBuf,
    save: bool,
    no_export: bool,
    mock: bool,
) -> Result<()> {
    let analyzer = match config.analyzer(mock) {
        Ok(analyzer) => analyzer,
        Err(e) => return fail(e),
    };

    let mut session = match ScanSession::builder()
        .with_source(FileSource::new(&image, config.max_upload_bytes))
        .with_analyzer(analyzer)
        .with_normalizer(config.normalizer())
        .build()
    {
        Ok(session) => session,
        Err(e) => return fail(e),
    };

    println!("🔍 Analyzing specimen…");
    let outcome = match session.run().await {
        Ok(outcome) => outcome,
        Err(e) => return fail(e),
    };

    render_analysis(&outcome.analysis, outcome.image.width, outcome.image.height);

    if save {
        let mut store = GalleryStore::load(Box::new(config.storage())).await;
        let scan = match store.append(&outcome.image, outcome.analysis.clone()).await {
            Ok(scan) => scan,
            Err(e) => return fail(e),
        };
        println!("💾 Saved to collection as {}", scan.id);

        if !no_export {
            // Best effort: an export failure never fails the scan.
            match export_scan(
                &config.export_dir,
                &outcome.image,
                &outcome.analysis.name,
                scan.timestamp,
            )
            .await
            {
                Ok(path) => println!("📄 Exported {}", path.display()),
                Err(e) => eprintln!("warning: export failed: {}", e),
            }
        }
    }

    Ok(())
}

async fn gallery(config: &PalConfig, action: GalleryCommand) -> Result<()> {
    let mut store = GalleryStore::load(Box::new(config.storage())).await;

    match action {
        GalleryCommand::List => {
            if store.is_empty() {
                println!("Your collection is empty.");
                println!("Identified rocks you save will appear here.");
                return Ok(());
            }
            println!("My Collection ({} scans, newest first)", store.len());
            for scan in store.list() {
                println!(
                    "  {}  {}  {:.0}%  saved@{}ms",
                    scan.id, scan.analysis.name, scan.analysis.confidence, scan.timestamp
                );
            }
            Ok(())
        }
        GalleryCommand::Show { id } => match store.find(&id) {
            Some(scan) => {
                render_scan(scan);
                Ok(())
            }
            None => {
                eprintln!("No saved scan with id {}", id);
                std::process::exit(1);
            }
        },
        GalleryCommand::Delete { id } => {
            let removed = match store.delete(&id).await {
                Ok(removed) => removed,
                Err(e) => return fail(e),
            };
            if removed {
                println!("🗑  Deleted {}", id);
            } else {
                println!("No saved scan with id {} (nothing deleted)", id);
            }
            Ok(())
        }
    }
}

fn render_scan(scan: &SavedScan) {
    match EncodedImage::from_data_url(&scan.image_url) {
        Ok(image) => render_analysis(&scan.analysis, image.width, image.height),
        Err(_) => render_analysis(&scan.analysis, 0, 0),
    }
    println!("   id: {}  saved@{}ms", scan.id, scan.timestamp);
}

fn render_analysis(analysis: &RockAnalysis, width: u32, height: u32) {
    println!();
    println!("🪨 {} ({})", analysis.name, analysis.scientific_name);
    if width > 0 && height > 0 {
        println!("   Image: {}x{} JPEG", width, height);
    }
    println!("   Confidence: {:.0}%", analysis.confidence);
    println!("   {}", analysis.description);
    println!(
        "   Economic value: {} ({})",
        analysis.economic_value, analysis.economic_details
    );
    if analysis.contains_precious_metals {
        println!(
            "   Precious metal indicators: yes ({})",
            analysis.associated_metals.join(", ")
        );
    } else if analysis.associated_metals.is_empty() {
        println!("   Precious metal indicators: no");
    } else {
        println!(
            "   Precious metal indicators: no (associated: {})",
            analysis.associated_metals.join(", ")
        );
    }
    println!("   Could also be:");
    for alt in &analysis.alternatives {
        println!("     • {}: {} ({})", alt.name, alt.description, alt.wiki_url);
    }
    println!();
}

/// Surface a user-facing message and return to idle with a failure code.
fn fail(error: PalError) -> Result<()> {
    match error.user_message() {
        Some(message) => eprintln!("{}", message),
        None => eprintln!("{}", error),
    }
    std::process::exit(1);
}
