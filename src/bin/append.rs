use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exportkit::{csv_append::LabelPair, logging};

#[derive(Parser, Debug)]
#[command(
    name = "append",
    version,
    about = "Concatenates a similar CSV layout to a file"
)]
struct Cli {
    /// Path to an intermediate file to append
    #[arg(value_name = "data")]
    data: PathBuf,

    /// Path to the output file
    #[arg(value_name = "path")]
    path: PathBuf,

    /// The extra header name to append
    #[arg(value_name = "appendHeader", allow_hyphen_values = true)]
    append_header: String,

    /// The extra data to append under a new header
    #[arg(value_name = "appendData", allow_hyphen_values = true)]
    append_data: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let labels = LabelPair::new(cli.append_header, cli.append_data);
    exportkit::csv_append::append(&cli.data, &cli.path, &labels).with_context(|| {
        format!(
            "failed to append {} to {}",
            cli.data.display(),
            cli.path.display()
        )
    })?;
    Ok(())
}
