use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{Rgb, RgbImage};
use rand::Rng;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for exportkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy, build and test the whole workspace
    Ci,
    /// Write sample inputs for manual runs of append, compare and denoise
    Fixtures {
        #[arg(long, value_name = "DIR", default_value = "target/fixtures")]
        out: PathBuf,

        /// Share of pixels replaced by salt-and-pepper noise, in percent
        #[arg(long, default_value_t = 5)]
        noise: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => ci(),
        Commands::Fixtures { out, noise } => fixtures(&out, noise),
    }
}

fn ci() -> Result<()> {
    run_command("cargo", &["fmt", "--all", "--check"])?;
    run_command(
        "cargo",
        &[
            "clippy",
            "--all-targets",
            "--all-features",
            "--",
            "-D",
            "warnings",
            "-A",
            "clippy::needless_range_loop",
        ],
    )?;
    run_command("cargo", &["build", "--all-features"])?;
    run_command("cargo", &["test", "--workspace", "--all-features"])?;
    Ok(())
}

/// clean.png: RGB gradient, noisy.png: clean.png with impulse noise,
/// sample.csv: header plus three rows.
fn fixtures(out: &Path, noise: u32) -> Result<()> {
    anyhow::ensure!(noise <= 100, "noise must be a percentage, got {}", noise);
    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let clean = RgbImage::from_fn(256, 192, |x, y| {
        Rgb([x as u8, (y * 255 / 191) as u8, ((x + y) / 2) as u8])
    });
    let mut noisy = clean.clone();
    let mut rng = rand::rng();
    noisy.pixels_mut().for_each(|pixel| {
        if rng.random_ratio(noise, 100) {
            let value = if rng.random_bool(0.5) { 0 } else { 255 };
            *pixel = Rgb([value; 3]);
        }
    });

    clean.save(out.join("clean.png"))?;
    noisy.save(out.join("noisy.png"))?;
    std::fs::write(out.join("sample.csv"), "colA,colB\n1,2\n3,4\n5,6\n")?;

    println!("fixtures written to {}", out.display());
    Ok(())
}

fn run_command(cmd: &str, args: &[&str]) -> Result<()> {
    use std::process::Command;
    let status = Command::new(cmd).args(args).status()?;
    if !status.success() {
        anyhow::bail!("Command failed: {} {}", cmd, args.join(" "));
    }
    Ok(())
}
