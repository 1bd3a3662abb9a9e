//! ipgeo: CLI tool for looking up addresses in IP range files.

use clap::{Args, Parser, Subcommand};
use ipgeo::{Meta, Store, StoreConfig, StoreOptions};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipgeo")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Resolve IP addresses to location and ISP metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Range data file, may be repeated; read in the order given
    #[arg(short, long)]
    data: Vec<PathBuf>,

    /// YAML options file listing data files
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up addresses (read from stdin when none are given)
    Lookup {
        #[command(flatten)]
        data: DataArgs,

        /// Print one JSON object per address
        #[arg(long)]
        json: bool,

        /// Addresses to resolve
        addrs: Vec<String>,
    },

    /// Load the data files and print table statistics
    Stats {
        #[command(flatten)]
        data: DataArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lookup { data, json, addrs } => lookup(&data, json, &addrs),
        Commands::Stats { data, json } => stats(&data, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load(args: &DataArgs) -> Result<Store, Box<dyn std::error::Error>> {
    let mut files = match args.config {
        Some(ref path) => StoreOptions::from_file(path)?.files,
        None => Vec::new(),
    };
    files.extend(args.data.iter().cloned());

    let mut store = Store::new();
    store.load_data(StoreConfig::new(files))?;
    Ok(store)
}

fn lookup(args: &DataArgs, json: bool, addrs: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let store = load(args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if addrs.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let addr = line.trim();
            if !addr.is_empty() {
                print_result(&mut out, addr, store.search_str(addr).map(|m| &**m), json)?;
            }
        }
    } else {
        for addr in addrs {
            print_result(&mut out, addr, store.search_str(addr).map(|m| &**m), json)?;
        }
    }

    Ok(())
}

fn print_result(
    out: &mut impl Write,
    addr: &str,
    meta: Option<&Meta>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let value = serde_json::json!({ "address": addr, "meta": meta });
        writeln!(out, "{}", value)?;
    } else {
        match meta {
            Some(meta) => writeln!(out, "{}\t{}", addr, meta.to_line())?,
            None => writeln!(out, "{}\tnot found", addr)?,
        }
    }
    Ok(())
}

fn stats(args: &DataArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = load(args)?;
    let stats = store.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!("Files:          {}", stats.files);
        println!("Lines:          {}", stats.lines);
        println!("Skipped:        {}", stats.skipped);
        println!("Out of order:   {}", stats.out_of_order);
        println!("IPv4 ranges:    {}", stats.v4_entities);
        println!("IPv6 ranges:    {}", stats.v6_entities);
        println!("Distinct meta:  {}", stats.metas);
    }

    Ok(())
}
