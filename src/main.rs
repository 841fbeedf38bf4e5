use clap::{ArgAction, Parser, Subcommand};
use fca::archive::{decode, encode, inspect, DecodeOptions, EncodeOptions};
use fca::identity::IdentityTable;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fca", about = "The FCA figure container format CLI")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files and directories into an .fca archive
    Encode {
        #[arg(short, long)]
        output: PathBuf,
        /// Input file(s) to include
        #[arg(long, num_args = 1..)]
        input_files: Vec<PathBuf>,
        /// Input directory(ies) to walk recursively
        #[arg(long, num_args = 1..)]
        input_dirs: Vec<PathBuf>,
        /// Skip walked files whose path relative to their input directory contains this string
        #[arg(short, long)]
        exclude: Option<String>,
    },
    /// Extract every record of an .fca archive
    Decode {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        /// Omit the .bin extension on resolved figure names
        #[arg(long)]
        pro: bool,
        /// Identity database JSON (defaults to ./amiibo_database.json)
        #[arg(short, long, env = "FCA_DATABASE")]
        database: Option<PathBuf>,
    },
    /// List archive records
    List {
        input: PathBuf,
    },
    /// Show archive summary
    Info {
        input: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (_, 0)    => "info",
        (_, 1)    => "debug",
        _         => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {

        // ── Encode ───────────────────────────────────────────────────────────
        Commands::Encode { output, input_files, input_dirs, exclude } => {
            if input_files.is_empty() && input_dirs.is_empty() {
                return Err("Provide at least one of --input-files or --input-dirs".into());
            }
            let opts = EncodeOptions { exclude };
            let count = encode(&output, &input_files, &input_dirs, &opts)?;
            println!("Created: {} ({} files)", output.display(), count);
        }

        // ── Decode ───────────────────────────────────────────────────────────
        Commands::Decode { input, output_dir, pro, database } => {
            let table = IdentityTable::load(database.as_deref());
            let opts = DecodeOptions { use_pro_naming: pro };
            let count = decode(&input, &output_dir, &opts, &table)?;
            println!("Extracted {} files to: {}", count, output_dir.display());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input } => {
            let records = inspect(&input)?;
            println!("Archive: {}", input.display());
            println!("{:>5}  {:<18} {:>10}  {:<32}  Identity",
                     "#", "Type", "Size", "MD5");
            for r in &records {
                let identity = r.identity
                    .as_ref()
                    .map(|k| format!("{}-{}", k.head, k.tail))
                    .unwrap_or_else(|| "-".into());
                println!("{:>5}  {:<18} {:>10}  {:<32}  {}",
                         r.index, r.file_type.display_name(), r.size, r.md5, identity);
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let records = inspect(&input)?;
            let mut by_type: BTreeMap<u8, (String, usize)> = BTreeMap::new();
            for r in &records {
                by_type
                    .entry(r.file_type.code())
                    .or_insert_with(|| (r.file_type.display_name(), 0))
                    .1 += 1;
            }
            let payload: u64 = records.iter().map(|r| r.size as u64).sum();
            let archive_size = std::fs::metadata(&input)?.len();

            println!("── FCA Archive ──────────────────────────────────────────");
            println!("  Path           {}", input.display());
            println!("  Format version {}", fca::header::VERSION);
            println!("  Archive size   {} B", archive_size);
            println!("  Records        {}", records.len());
            println!("  Payload        {} B", payload);
            println!("  Types ({}):", by_type.len());
            for (code, (name, count)) in &by_type {
                println!("    {:>3}  {:<18} {}", code, name, count);
            }
        }
    }

    Ok(())
}
