use clap::Parser;
use fhash::{FileHasher, Options, SignatureAlgorithm, Tolerance, E};
use log::debug;
use std::{env, path::PathBuf, process::ExitCode};

/// Prints signatures of a file or of the files of a folder
#[derive(Parser, Debug)]
#[command(name = "fhash", version, about)]
struct Cli {
    /// File or folder to hash. Current folder by default
    path: Option<PathBuf>,

    /// Read nested folders
    #[arg(short, long)]
    recursive: bool,

    /// md5, sha1, sha256, sha512 or blake3
    #[arg(short, long, default_value = "md5")]
    algorithm: SignatureAlgorithm,

    /// Skip files which cannot be read instead of stopping on the first error
    #[arg(long)]
    tolerant: bool,

    /// Number of hashing threads
    #[arg(long)]
    threads: Option<usize>,

    /// Print a signature of the whole folder as well
    #[arg(long)]
    tree: bool,

    /// Debug output
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> Result<ExitCode, E> {
    let path = match cli.path {
        Some(path) => path,
        None => env::current_dir().map_err(|err| E::from_io(".", err))?,
    };
    if path.is_file() {
        let entry = FileHasher::new(&path).hash(cli.algorithm)?;
        println!("{}  {}", entry.signature, entry.path.display());
        return Ok(ExitCode::SUCCESS);
    }
    let mut opt = Options::from(&path)?;
    opt.recursive(cli.recursive);
    if cli.tolerant {
        opt.tolerance(Tolerance::LogErrors);
    }
    if let Some(threads) = cli.threads {
        opt.threads(threads);
    }
    let (signatures, incomplete) = match opt.hasher().hash(cli.algorithm) {
        Ok(signatures) => (signatures, None),
        Err(E::PartialFailure(report)) => {
            let report = *report;
            for (path, err) in report.failures.iter() {
                eprintln!("{}: {err}", path.display());
            }
            let summary = report.to_string();
            (report.signatures, Some(summary))
        }
        Err(err) => return Err(err),
    };
    for (path, signature) in &signatures {
        println!("{signature}  {}", path.display());
    }
    if cli.tree {
        println!(
            "{}  {}",
            signatures.digest(cli.algorithm)?,
            path.display()
        );
    }
    debug!("{} files hashed", signatures.len());
    if let Some(summary) = incomplete {
        eprintln!("Incomplete result: {summary}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
