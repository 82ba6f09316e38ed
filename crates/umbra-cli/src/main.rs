use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "umbra")]
#[command(about = "Shadow overlay inspection tools for RAM dumps")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll a RAM dump and print the committed game state
    Inspect {
        /// RAM dump file
        dump: PathBuf,

        /// Configuration JSON (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Layout profile JSON (retail layout when omitted)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Number of poll ticks to run against the dump
        #[arg(long, default_value_t = 64)]
        polls: u64,
    },

    /// Render the procedural shadow blob to a PGM image
    Blob {
        /// Texture edge length in pixels
        #[arg(long, default_value_t = 64)]
        size: u32,

        /// Shadow opacity in [0, 1]
        #[arg(long, default_value_t = 0.7)]
        intensity: f32,

        /// Output file (binary PGM, alpha channel)
        #[arg(short, long, default_value = "blob.pgm")]
        output: PathBuf,
    },

    /// Hexdump a region of a RAM dump through the bounds-checked accessor
    Hexdump {
        /// RAM dump file
        dump: PathBuf,

        /// Start address (hex, with or without 0x prefix)
        #[arg(long, default_value = "0x0")]
        addr: String,

        /// Number of bytes to dump
        #[arg(long, default_value_t = 256)]
        len: usize,

        /// Include an ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("umbra=info".parse()?))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Inspect {
            dump,
            config,
            profile,
            polls,
        } => commands::inspect::run(&dump, config.as_deref(), profile.as_deref(), polls),
        Command::Blob {
            size,
            intensity,
            output,
        } => commands::blob::run(size, intensity, &output),
        Command::Hexdump {
            dump,
            addr,
            len,
            ascii,
        } => {
            let address = commands::hex_utils::parse_hex_address(&addr)?;
            commands::hexdump::run(&dump, address, len, ascii)
        }
    }
}
