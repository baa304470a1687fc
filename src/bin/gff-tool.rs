//! Thin CLI glue around the `gff-toolkit` library: convert a single file between
//! its binary, JSON, and `.ndugff` forms.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gff_toolkit::{binary, dsl, erf, json, Document, Result};

#[derive(Parser)]
#[command(name = "gff-tool", version, about = "Convert Aurora-derived GFF game assets between binary, JSON, and DSL forms")]
struct Cli {
    /// Raise log verbosity; repeatable (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Converts a single file between binary GFF, `.json`, and `.ndugff` forms,
    /// dispatching on each path's extension.
    ///
    /// Batch directory walking and the key/bif recipe exporter are not
    /// implemented here; this binary only ever touches the two paths it is given.
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// Lists the resources inside an ERF-family archive (`.erf`/`.hak`/`.mod`/`.nwm`).
    ListErf {
        archive: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    pretty_env_logger::formatted_builder().filter_level(level).init();

    let result = match cli.command {
        Command::Convert { input, output } => convert(&input, &output),
        Command::ListErf { archive } => list_erf(&archive),
    };
    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    let doc = read_document(input)?;
    write_document(&doc, output)
}

fn list_erf(path: &Path) -> Result<()> {
    let mut file = BufReader::new(File::open(path)?);
    let archive = erf::read(&mut file)?;
    for name in archive.names() {
        println!("{name}");
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<Document> {
    let mut file = BufReader::new(File::open(path)?);
    match extension(path).as_str() {
        "json" => {
            let value: serde_json::Value = serde_json::from_reader(&mut file)?;
            json::from_json(&value)
        }
        "ndugff" => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            dsl::parse(&text)
        }
        _ => binary::read(&mut file),
    }
}

fn write_document(doc: &Document, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    match extension(path).as_str() {
        "json" => {
            let value = json::to_json(doc);
            serde_json::to_writer_pretty(&mut file, &value)?;
            Ok(())
        }
        "ndugff" => {
            let text = dsl::write(doc);
            file.write_all(text.as_bytes())?;
            Ok(())
        }
        _ => binary::write(doc, &mut file),
    }
}

fn extension(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase()
}
