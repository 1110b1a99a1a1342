use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vanish_wipe::drives::DiskEnumerator;
use vanish_wipe::{JobTracker, WipeEngine, WipeJob, WipeOptions, DEFAULT_BLOCK_SIZE};

#[derive(Parser)]
#[command(name = "vanish")]
#[command(about = "Secure data wiping tool for files, directory trees and raw devices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available disks and partitions
    List {
        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Overwrite a device, partition or directory tree with random data
    Wipe {
        /// Device path (e.g. /dev/sdb, /dev/sda1) or directory path
        target: String,

        /// Number of overwrite passes
        #[arg(short, long, default_value_t = 3)]
        passes: u32,

        /// Write block size in bytes
        #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => cmd_list(json),
        Commands::Wipe {
            target,
            passes,
            block_size,
        } => cmd_wipe(target, passes, block_size),
    }
}

fn cmd_list(json: bool) -> Result<()> {
    let entries = DiskEnumerator::list_all();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "=== Available Disks & Partitions ===".bold());
    for entry in entries {
        if let Some(error) = entry.error {
            println!("{}", error.red());
            continue;
        }
        println!(
            "{:<16} {:>10}  {:<6} {}",
            entry.name,
            entry.size.unwrap_or_default(),
            entry.kind.unwrap_or_default(),
            entry.mountpoint.unwrap_or_default()
        );
    }
    println!("====================================");
    Ok(())
}

fn cmd_wipe(target: String, passes: u32, block_size: usize) -> Result<()> {
    println!(
        "\n{} This will ERASE all data on {}",
        "[!] WARNING:".red().bold(),
        target.bold()
    );
    print!("Type 'YES' to confirm: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if input.trim() != "YES" {
        println!("{}", "[-] Aborted.".yellow());
        return Ok(());
    }

    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));
    let job = WipeJob::with_options(target, WipeOptions { passes, block_size });
    let worker = engine.submit(job)?;

    // Stream job log lines as the worker makes progress.
    let mut printed = 0;
    loop {
        let status = tracker.status();
        for line in &status.logs[printed..] {
            print_log_line(line);
        }
        printed = status.logs.len();
        if !status.running {
            break;
        }
        thread::sleep(Duration::from_millis(200));
    }

    worker
        .join()
        .map_err(|_| anyhow!("wipe worker panicked"))?;
    Ok(())
}

fn print_log_line(line: &str) {
    if line.starts_with("[-]") {
        println!("{}", line.red());
    } else if line.starts_with("[!]") {
        println!("{}", line.yellow().bold());
    } else {
        println!("{}", line);
    }
}
