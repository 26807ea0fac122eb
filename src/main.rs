//! virtmem - demand-paged virtual memory simulator.
//!
//! Usage: virtmem <npages> <nframes> <rand|fifo|custom> <sort|scan|focus>
//!
//! Options:
//!   --seed <u64>    Seed for the Random policy and randomized workloads
//!   --store <path>  Backing store file (created/resized at open)
//!
//! Exits 0 after printing the per-page table dump and a fault/IO summary;
//! exits 1 on any configuration error.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;

use virtmem::constants::{DEFAULT_SEED, DEFAULT_STORE_PATH};
use virtmem::engine::PagingEngine;
use virtmem::policy::{PolicyKind, ReplacementPolicy as _};
use virtmem::store::BackingStore;
use virtmem::vm::VirtualMemory;
use virtmem::workload::WorkloadKind;

const USAGE: &str = "use: virtmem <npages> <nframes> <rand|fifo|custom> <sort|scan|focus>";

#[derive(Parser)]
#[command(name = "virtmem", about = "demand-paged virtual memory simulator")]
struct Cli {
    /// Number of virtual pages
    npages: usize,
    /// Number of physical frames
    nframes: usize,
    /// Replacement policy: rand, fifo, or custom (clock)
    policy: PolicyKind,
    /// Workload to run: sort, scan, or focus
    workload: WorkloadKind,
    /// Seed for the Random policy and the randomized workloads
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Backing store file
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("virtmem: {e}");
        eprintln!("{USAGE}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let store = BackingStore::open(&cli.store, cli.npages)
        .map_err(|e| format!("couldn't open backing store {}: {e}", cli.store.display()))?;
    let policy = cli.policy.build(cli.nframes, cli.seed);

    println!("page replacement = {}", policy.name());

    let engine = PagingEngine::new(cli.npages, cli.nframes, store, policy)?;
    let mut vm = VirtualMemory::new(engine);

    let result = cli.workload.run(&mut vm, cli.seed);
    vm.flush();

    print!("{}", vm.engine().page_report());

    let stats = vm.engine().stats();
    println!("workload result = {result}");
    println!(
        "faults: {} major, {} minor; disk: {} reads, {} writes",
        stats.major_faults, stats.minor_faults, stats.disk_reads, stats.disk_writes
    );

    Ok(())
}
