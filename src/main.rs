//! Command line front end: one subcommand per experiment, each writing its
//! charts next to the input data unless `--out` says otherwise.

extern crate benchviz;
extern crate chrono;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate structopt;

use benchviz::*;
use benchviz::experiment::{self, Plot};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "benchviz")]
#[structopt(about = "Charts for HPC benchmark results.")]
struct Opt {
    /// TOML file overriding figure and snapshot defaults.
    #[structopt(short = "s", long = "setting", global = true)]
    setting: Option<PathBuf>,

    /// Output directory. Defaults to the directory of the input file.
    #[structopt(short = "o", long = "out", global = true)]
    out: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Strong and weak scaling of the built-in stencil runs.
    Scaling,

    /// Sequential vs parallel prime counting (results.csv).
    Primes {
        #[structopt(help = "Input CSV")]
        input: PathBuf,
    },

    /// Summation kernels by optimization level; built-in data without input.
    Pipeline {
        #[structopt(help = "Input CSV")]
        input: Option<PathBuf>,
    },

    /// Memory-bound vs compute-bound kernels.
    Bound {
        #[structopt(help = "Input CSV")]
        input: PathBuf,
    },

    /// Schedule and collapse clauses, one chart per schedule kind.
    Schedule {
        #[structopt(help = "Input CSV")]
        input: PathBuf,

        /// The run shared the machine with a disturbing load.
        #[structopt(short = "d", long = "disturbance")]
        disturbance: bool,
    },

    /// Animated middle slice of a raw snapshot dump.
    Snapshots {
        #[structopt(help = "Binary snapshot file")]
        input: PathBuf,

        /// Caption prefix of every frame.
        #[structopt(short = "t", long = "title", default_value = "Fluid perturbation")]
        title: String,
    },

    /// MPI ping-pong latency.
    Pingpong {
        #[structopt(help = "Input CSV")]
        input: PathBuf,
    },

    /// MPI collectives; the built-in reference table without input.
    Collective {
        #[structopt(help = "Input CSV")]
        input: Option<PathBuf>,

        /// Baseline degree, or `lowest`.
        #[structopt(short = "b", long = "baseline", default_value = "2")]
        baseline: Baseline,
    },

    /// OMP_PROC_BIND policies.
    Affinity {
        #[structopt(help = "Input CSV")]
        input: PathBuf,

        /// Baseline degree, or `lowest`.
        #[structopt(short = "b", long = "baseline", default_value = "1")]
        baseline: Baseline,
    },

    /// Convergence of the pi approximation.
    Pi {
        #[structopt(help = "Input CSV")]
        input: PathBuf,
    },
}

fn main() {
    if let Err(e) = init_logger() {
        eprintln!("failed to initialize logger: {}", e);
    }

    let opt = Opt::from_args();
    if let Err(ref e) = run(opt) {
        error!("{}", e);
        let stderr = &mut ::std::io::stderr();
        writeln!(stderr, "error: {}", e).ok();
        for cause in e.iter().skip(1) {
            writeln!(stderr, "caused by: {}", cause).ok();
        }
        process::exit(1);
    }
}

fn init_logger() -> ::std::result::Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        let t = chrono::Utc::now();
        writeln!(
            buf,
            "{} {} {}: {}",
            t.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.module_path().unwrap_or("-"),
            record.args()
        )
    });
    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };
    builder.try_init()
}

fn run(opt: Opt) -> Result<()> {
    let setting = match opt.setting {
        Some(ref path) => Setting::init(path)?,
        None => Setting::default(),
    };
    let out = opt.out;
    let out_for = |input: Option<&Path>| -> PathBuf {
        match (out.clone(), input.and_then(|p| p.parent())) {
            (Some(dir), _) => dir,
            (None, Some(dir)) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    };

    let (plots, dir) = match opt.cmd {
        Command::Scaling => (experiment::scalability::builtin()?, out_for(None)),
        Command::Primes { input } => {
            (experiment::primes::plots(&Table::from_path(&input)?)?, out_for(Some(&input)))
        }
        Command::Pipeline { input } => match input {
            Some(input) => (
                experiment::pipeline::plots(&Table::from_path(&input)?)?,
                out_for(Some(&input)),
            ),
            None => (experiment::pipeline::builtin()?, out_for(None)),
        },
        Command::Bound { input } => {
            (experiment::bound::plots(&Table::from_path(&input)?)?, out_for(Some(&input)))
        }
        Command::Schedule { input, disturbance } => (
            experiment::schedule::plots(&Table::from_path(&input)?, disturbance)?,
            out_for(Some(&input)),
        ),
        Command::Snapshots { input, title } => {
            let series = SnapshotSeries::open(&input, &setting.snapshot)?;
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "snapshots".to_string());
            let path = out_for(Some(&input)).join(format!("{}.gif", stem));
            return render_snapshots(&series, &title, &setting.figure, &path);
        }
        Command::Pingpong { input } => {
            (experiment::pingpong::plots(&Table::from_path(&input)?)?, out_for(Some(&input)))
        }
        Command::Collective { input, baseline } => match input {
            Some(input) => (
                experiment::collective::plots(&Table::from_path(&input)?, baseline)?,
                out_for(Some(&input)),
            ),
            None => (experiment::collective::builtin(baseline)?, out_for(None)),
        },
        Command::Affinity { input, baseline } => (
            experiment::affinity::plots(&Table::from_path(&input)?, baseline)?,
            out_for(Some(&input)),
        ),
        Command::Pi { input } => {
            (experiment::pi::plots(&Table::from_path(&input)?)?, out_for(Some(&input)))
        }
    };

    save(&plots, &dir, &setting)
}

fn save(plots: &[Plot], dir: &Path, setting: &Setting) -> Result<()> {
    experiment::save_all(plots, dir, &setting.figure)?;
    info!("{} charts written to {:?}", plots.len(), dir);
    Ok(())
}
