use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use scaling_bench::harness::{BenchConfig, Profile, SamplingEngine};
use scaling_bench::output::{ConsoleProgress, Sink};
use scaling_bench::suites;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in benchmarks.
    List,

    /// Print a benchmark's sizes and candidates as JSON.
    Describe {
        #[arg(value_name = "SLUG")]
        slug: String,
    },

    /// Run benchmarks and write one JSON report per benchmark.
    Run {
        /// Benchmarks to run; all of them when omitted.
        #[arg(value_name = "SLUG")]
        slugs: Vec<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "scaling-bench")]
#[command(about = "Compare implementations across growing input sizes (JSON output)")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick, global = true)]
    profile: ProfileArg,

    /// Seed for input generators.
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Where to write reports: a directory (one `<slug>.json` per benchmark)
    /// or a file. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Suppress the progress line on stderr.
    #[arg(long, short, default_value_t = false, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scaling_bench=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let cfg = BenchConfig {
        profile: args.profile.into(),
        seed: args.seed,
    };

    match &args.cmd {
        Command::List => {
            for bench in suites::all(&cfg)? {
                println!("{:<10} {}", bench.slug(), bench.title());
            }
        }
        Command::Describe { slug } => {
            let bench = suites::find(&cfg, slug)?;
            println!("{}", bench.to_json()?);
        }
        Command::Run { slugs } => {
            let mut benches = if slugs.is_empty() {
                suites::all(&cfg)?
            } else {
                slugs
                    .iter()
                    .map(|slug| suites::find(&cfg, slug))
                    .collect::<Result<Vec<_>, _>>()?
            };

            let sink = Sink::from_out(args.out.as_deref());
            if benches.len() > 1 && matches!(sink, Sink::File(_)) {
                anyhow::bail!("--out must be a directory when running more than one benchmark");
            }

            let engine = SamplingEngine::from_config(&cfg);
            for bench in &mut benches {
                let slug = bench.slug().to_string();
                let outcome = if args.quiet {
                    bench.run_quiet(&engine)
                } else {
                    let progress = ConsoleProgress::start(bench.title(), bench.info().sizes.len());
                    let outcome =
                        bench.run(&engine, &mut |index, size| progress.on_size_start(index, size));
                    match outcome {
                        Ok(result) => {
                            progress.finish();
                            Ok(result)
                        }
                        Err(e) => {
                            progress.abandon();
                            Err(e)
                        }
                    }
                };
                let result = outcome.with_context(|| format!("benchmark '{slug}' failed"))?;

                if let Some(path) = sink.write(&slug, &result)? {
                    eprintln!("Report saved: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
