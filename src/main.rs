use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zscript::{Archive, ArchiveSet, DeclarationCompiler, Session, SessionOptions};

/// Parse and check the ZScript in a set of archives.
#[derive(Debug, Parser)]
#[command(name = "zscript", version, about)]
struct Cli {
    /// Archive directories, in load order. The first is the core archive.
    #[arg(required = true)]
    archives: Vec<PathBuf>,

    /// Write each manifest's syntax tree to <OUT_DIR>/<manifest>.ast.
    #[arg(long, alias = "dumpast")]
    dump_ast: bool,

    /// Directory for syntax tree dumps.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zscript=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let mut archives = ArchiveSet::new();
    for dir in &cli.archives {
        match Archive::from_dir(dir) {
            Ok(archive) => {
                archives.add(archive);
            }
            Err(error) => {
                tracing::error!("{error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let options = SessionOptions {
        dump_ast: cli.dump_ast,
        dump_dir: cli.out_dir,
    };
    let mut session = Session::new(&archives, DeclarationCompiler::new(), options);
    match session.parse_scripts() {
        Ok(reports) => {
            let stats = session.compiler().stats();
            tracing::info!(
                manifests = reports.len(),
                types = stats.types,
                constants = stats.constants,
                enumerators = stats.enumerators,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
