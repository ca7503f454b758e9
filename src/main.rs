use anyhow::{Context, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use fastcase::cli::Cli;
use fastcase::harness;
use fastcase::kernel::{self, Backend};
use fastcase::source::{Buffer, BufferSource, FileSource, SyntheticSource, write_file};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let source: Box<dyn BufferSource> = match (&cli.input_file, cli.generate) {
        (Some(path), None) => Box::new(FileSource { path: path.clone() }),
        (None, Some(len)) => Box::new(SyntheticSource {
            len,
            alpha: cli.alpha,
            seed: cli.seed,
        }),
        // clap's input group enforces exactly one of -i / -n.
        _ => unreachable!("argument parsing allowed an invalid input combination"),
    };

    let bytes = source.produce()?;
    println!("Input: {} ({} bytes)", source.describe(), bytes.len());

    let mut buffer = match cli.align {
        Some(align) => Buffer::aligned(&bytes, align),
        None => Buffer::from_vec(bytes),
    };

    let backend = if cli.scalar {
        Backend::Scalar
    } else {
        Backend::detect()
    };
    tracing::debug!(
        backend = backend.name(),
        lane_width = backend.lane_width(),
        "selected conversion backend"
    );

    let striped = match cli.jobs {
        Some(jobs) if jobs > 1 => {
            rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
                .context("failed to size the worker pool")?;
            true
        }
        _ => false,
    };

    let mode = cli.mode;
    let report = harness::measure(buffer.as_mut_slice(), mode, backend, |buf| {
        if striped {
            kernel::convert_parallel(buf, mode, backend);
        } else {
            kernel::convert_with(backend, buf, mode);
        }
    });
    print!("{report}");

    if let Some(out) = &cli.out {
        write_file(out, buffer.as_slice())?;
        println!("Wrote {} ({} bytes)", out.display(), buffer.len());
    }

    Ok(())
}
