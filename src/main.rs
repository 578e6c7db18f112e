//! Command-line front end: file I/O around the detection core.

use clap::Parser;
use std::path::{Path, PathBuf};

use card_detector::image::io::{load_rgb_image, save_rgb_image, view_rgb, write_json_file};
use card_detector::render;
use card_detector::{detect_card, CardDetection, DetectorConfig};

#[derive(Parser)]
#[command(name = "card-detector")]
#[command(about = "Detect a standard ID-1 card in an image")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to save the JSON result. Prints to stdout when omitted.
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Path to save the annotated image.
    #[arg(long)]
    output_image: Option<PathBuf>,

    /// Directory to save intermediate stage images.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Max side length for processing.
    #[arg(long, default_value_t = 1200)]
    max_side: u32,

    /// Canny low threshold.
    #[arg(long, default_value_t = 50.0)]
    canny_low: f32,

    /// Canny high threshold.
    #[arg(long, default_value_t = 150.0)]
    canny_high: f32,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32, String> {
    let image = load_rgb_image(&cli.image)?;
    let config = DetectorConfig {
        max_side: cli.max_side,
        canny_low: cli.canny_low,
        canny_high: cli.canny_high,
        ..Default::default()
    };

    let result = detect_card(&view_rgb(&image), &config);
    let Some(result) = result else {
        eprintln!("No card detected.");
        return Ok(2);
    };

    emit_result(cli, &result)?;

    let font = render::load_system_font();
    if let Some(path) = &cli.output_image {
        let annotated = render::draw_detection(&image, &result, font.as_ref());
        save_rgb_image(&annotated, path)?;
    }

    if let Some(dir) = &cli.debug_dir {
        write_debug_artifacts(dir, &image, &config, font.as_ref())?;
    }

    Ok(0)
}

fn emit_result(cli: &Cli, result: &CardDetection) -> Result<(), String> {
    match &cli.output_json {
        Some(path) => write_json_file(path, result),
        None => {
            let json = serde_json::to_string_pretty(result)
                .map_err(|e| format!("Failed to serialize result: {e}"))?;
            println!("{json}");
            Ok(())
        }
    }
}

fn write_debug_artifacts(
    dir: &Path,
    image: &image::RgbImage,
    config: &DetectorConfig,
    font: Option<&ab_glyph::FontVec>,
) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;
    clear_debug_dir(dir)?;

    let artifacts = render::debug_artifacts(image, config, font);
    for (name, stage) in &artifacts.stages {
        save_rgb_image(stage, &dir.join(format!("{name}.png")))?;
    }

    let manifest = render::debug_manifest(config, artifacts.scale_factor);
    let manifest_path = dir.join("debug_meta.txt");
    std::fs::write(&manifest_path, manifest)
        .map_err(|e| format!("Failed to write {}: {e}", manifest_path.display()))?;

    println!("Debug artifacts written to {}", dir.display());
    Ok(())
}

/// Remove stale stage images so renumbered or absent stages never linger.
fn clear_debug_dir(dir: &Path) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read debug dir {}: {e}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_stage_png = path.extension().is_some_and(|ext| ext == "png");
        let is_manifest = path.file_name().is_some_and(|name| name == "debug_meta.txt");
        if is_stage_png || is_manifest {
            std::fs::remove_file(&path)
                .map_err(|e| format!("Failed to remove {}: {e}", path.display()))?;
        }
    }
    Ok(())
}
