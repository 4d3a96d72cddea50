//! Relief CLI - turn images into printable relief meshes.
//!
//! Usage: relief <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `relief --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use relief::algo::relief::{build_relief_with_progress, ReliefOptions};
use relief::algo::validate::MeshReport;
use relief::algo::Progress;
use relief::io::{self, image as acquire};

#[derive(Parser)]
#[command(name = "relief")]
#[command(author, version, about = "Image to relief mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize and crop an image to a centered frame
    Crop {
        /// Input image file
        input: PathBuf,

        /// Output image file
        output: PathBuf,

        /// Frame width in pixels
        #[arg(long, default_value = "500")]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value = "500")]
        height: u32,
    },

    /// Write grayscale depth maps of an image
    Depth {
        /// Input image file
        input: PathBuf,

        /// Output depth map file
        output: PathBuf,

        /// Also write a smoothed depth map to this file
        #[arg(long)]
        smooth: Option<PathBuf>,

        /// Blur radius of the smoothed depth map
        #[arg(long, default_value = "5.0")]
        blur: f32,

        /// Also write a strongly smoothed depth map to this file
        #[arg(long)]
        supersmooth: Option<PathBuf>,

        /// Strength of the strong smoothing (2 to 100)
        #[arg(long, default_value = "50")]
        strength: u32,
    },

    /// Generate a relief mesh from an image
    Generate {
        /// Input image file
        input: PathBuf,

        /// Output mesh file (.stl or .obj)
        output: PathBuf,

        /// Height of full white above z = 0
        #[arg(short = 's', long, default_value = "10.0")]
        height_scale: f64,

        /// Thickness of the base plate below z = 0 (0 for an open surface)
        #[arg(short, long, default_value = "2.0")]
        base_height: f64,

        /// Crop and resize the image to WIDTHxHEIGHT first
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        /// Gaussian blur radius applied before meshing
        #[arg(long, default_value = "0.0")]
        blur: f32,

        /// Write ASCII STL instead of binary
        #[arg(long)]
        ascii: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Display mesh information
    Info {
        /// Input STL file
        input: PathBuf,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse().map_err(|e| format!("invalid width: {}", e))?;
    let h = h.trim().parse().map_err(|e| format!("invalid height: {}", e))?;
    Ok((w, h))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Crop {
            input,
            output,
            width,
            height,
        } => {
            cmd_crop(&input, &output, width, height)?;
        }

        Commands::Depth {
            input,
            output,
            smooth,
            blur,
            supersmooth,
            strength,
        } => {
            cmd_depth(
                &input,
                &output,
                smooth.as_deref(),
                blur,
                supersmooth.as_deref(),
                strength,
            )?;
        }

        Commands::Generate {
            input,
            output,
            height_scale,
            base_height,
            size,
            blur,
            ascii,
            sequential,
        } => {
            let framing = acquire::AcquireOptions {
                size,
                blur_radius: blur,
            };
            let options = ReliefOptions::default()
                .with_height_scale(height_scale)
                .with_base_height(base_height)
                .with_parallel(!sequential);
            cmd_generate(&input, &output, &framing, &options, ascii)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only ever move forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_crop(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let img = acquire::open(input)?;
    println!("Loaded: {} ({}x{})", input.display(), img.width(), img.height());

    let cropped = acquire::crop_center(&img, width, height)?;
    acquire::save_image(&cropped, output)?;
    println!("Saved: {} ({}x{})", output.display(), width, height);

    Ok(())
}

fn cmd_depth(
    input: &Path,
    output: &Path,
    smooth: Option<&Path>,
    blur: f32,
    supersmooth: Option<&Path>,
    strength: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject a bad radius before anything is written.
    if smooth.is_some() {
        acquire::AcquireOptions::default().with_blur(blur).validate()?;
    }

    let img = acquire::open(input)?;
    let depth = acquire::to_depth(&img);
    acquire::save_gray(&depth, output)?;
    println!("Depth map: {}", output.display());

    if let Some(path) = smooth {
        acquire::save_gray(&acquire::smooth(&depth, blur)?, path)?;
        println!("Smooth depth map (radius {}): {}", blur, path.display());
    }

    if let Some(path) = supersmooth {
        let radius = acquire::supersmooth_radius(strength);
        acquire::save_gray(&acquire::smooth(&depth, radius)?, path)?;
        println!("Super-smooth depth map (radius {}): {}", radius, path.display());
    }

    Ok(())
}

fn cmd_generate(
    input: &Path,
    output: &Path,
    framing: &acquire::AcquireOptions,
    options: &ReliefOptions,
    ascii: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let map = acquire::load_heightmap(input, framing)?;
    println!("Heightmap: {}x{}", map.width(), map.height());

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Building relief (height scale {}, base height {}, {})...",
        options.height_scale, options.base_height, mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let relief = build_relief_with_progress(&map, options, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} triangles", relief.mesh.num_triangles());
    if !relief.is_watertight() {
        println!("Warning: base height is 0, the mesh is an open surface and not a closed solid");
    }

    if ascii {
        io::stl::save_ascii(&relief.mesh, output)?;
    } else {
        io::save(&relief.mesh, output)?;
    }
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!("File: {}", input.display());
    println!("{}", MeshReport::new(&mesh));
    Ok(())
}
