mod system_player;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use motionscope_core::annotation::infrastructure::rectangle_annotator::RectangleAnnotator;
use motionscope_core::event_log::infrastructure::file_event_logger::FileEventLogger;
use motionscope_core::pipeline::analysis_session::AnalysisSession;
use motionscope_core::pipeline::detect_motion_use_case::{AnalysisReport, DetectMotionUseCase};
use motionscope_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use motionscope_core::playback::domain::video_display::VideoDisplay;
use motionscope_core::preprocessing::infrastructure::canonical_preprocessor::CanonicalPreprocessor;
use motionscope_core::shared::constants::VIDEO_EXTENSIONS;
use motionscope_core::shared::motion_config::{CoordinateMapping, MotionConfig};
use motionscope_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use motionscope_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

use system_player::SystemPlayer;

/// Frame-differencing motion detection for video files.
#[derive(Parser, Debug)]
#[command(name = "motionscope")]
struct Cli {
    /// Input video file.
    input: Option<PathBuf>,

    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mean difference a frame must exceed to count as motion.
    #[arg(long)]
    activity_threshold: Option<f64>,

    /// Per-pixel difference above which a pixel is moving.
    #[arg(long)]
    pixel_threshold: Option<f32>,

    /// Smallest contour area (canonical pixels²) kept as a motion region.
    #[arg(long)]
    min_area: Option<f64>,

    /// Frame rate of the motion video.
    #[arg(long)]
    fps: Option<u32>,

    /// Where to write the motion video.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Event log to append to.
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Rescale rectangles to the native resolution before drawing.
    #[arg(long)]
    scale_annotations: bool,

    /// Preprocessing threads (0 = all cores).
    #[arg(long)]
    workers: Option<usize>,

    /// Open the motion video in the system player when done.
    #[arg(long)]
    play: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let input = validate(&cli)?;
    let config = build_config(&cli)?;

    let session = AnalysisSession::new(input, config);
    let config = session.config();
    let mut use_case = DetectMotionUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(CanonicalPreprocessor::new(
            config.canonical_width,
            config.canonical_height,
            config.blur_kernel_size,
        )),
        Box::new(RectangleAnnotator::new(
            config.highlight_color,
            config.stroke_width,
        )),
        Box::new(FileEventLogger::new(session.event_log_path())),
        Box::new(StdoutPipelineLogger::default()),
    );

    let report = use_case.execute(&session)?;
    print_report(&report);

    if cli.play {
        match &report.output_path {
            Some(path) => {
                let mut player = SystemPlayer::new();
                player.load(path);
                player.play()?;
            }
            None => log::warn!("Nothing to play: no motion video was written"),
        }
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("Source:        {}", report.source.display());
    println!("Frames:        {}", report.total_frames);
    println!("Motion frames: {}", report.motion_frames);
    for detection in &report.analysis.detections {
        println!(
            "  frame {:5}  activity {:10.2}  regions {}",
            detection.index,
            detection.activity,
            detection.regions.len()
        );
    }
    match &report.output_path {
        Some(path) => println!("Motion video:  {}", path.display()),
        None => println!("No significant motion detected."),
    }
}

/// Checks the input path and returns it.
fn validate(cli: &Cli) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input = cli.input.clone().ok_or("No video selected")?;
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if !is_supported_video(&input) {
        log::warn!(
            "{} does not have a known video extension ({}); trying anyway",
            input.display(),
            VIDEO_EXTENSIONS.join(", ")
        );
    }
    Ok(input)
}

/// Loads the config file (or defaults) and applies flag overrides.
fn build_config(cli: &Cli) -> Result<MotionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => MotionConfig::load(path)?,
        None => MotionConfig::default(),
    };
    if let Some(v) = cli.activity_threshold {
        config.activity_threshold = v;
    }
    if let Some(v) = cli.pixel_threshold {
        config.pixel_threshold = v;
    }
    if let Some(v) = cli.min_area {
        config.min_region_area = v;
    }
    if let Some(v) = cli.fps {
        config.fps = v;
    }
    if let Some(v) = &cli.output {
        config.output_path = v.clone();
    }
    if let Some(v) = &cli.event_log {
        config.event_log_path = v.clone();
    }
    if let Some(v) = cli.workers {
        config.preprocess_workers = v;
    }
    if cli.scale_annotations {
        config.coordinate_mapping = CoordinateMapping::Scaled;
    }
    config.validate()?;
    Ok(config)
}

fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
