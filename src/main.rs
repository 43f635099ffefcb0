use anyhow::{Context, Result, bail};
use clap::Parser;
mod auth;
use serde::Serialize;
use ssh_keydgen::{
    Algorithm, CostParams, KeySpec, Keydgen, Seeder, Storage, default_key_path,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct CostArgs {
    /// PBKDF2 rounds per block (default: 1000)
    #[arg(long, env = "KEYDGEN_ROUNDS")]
    rounds: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "time", env = "KEYDGEN_TIME")]
    time_cost: Option<u32>,

    /// Argon2 memory cost in KiB (default: 16384)
    #[arg(long = "memory", env = "KEYDGEN_MEMORY")]
    mem_cost_kib: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "threads", env = "KEYDGEN_THREADS")]
    parallelism: Option<u32>,
}

impl CostArgs {
    fn to_cost_params(&self) -> Result<CostParams> {
        let default = CostParams::default();

        Ok(CostParams::new(
            self.rounds.unwrap_or(default.rounds()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.parallelism.unwrap_or(default.parallelism()),
        )?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "ssh-keydgen")]
#[command(version, about = "Deterministic authentication key generation.")]
struct Cli {
    /// Type of key to create: dsa, ecdsa, rsa or ed25519
    #[arg(short = 't', long = "type", default_value = "ed25519")]
    key_type: String,

    /// Number of bits in the key (dsa: 1024, 2048, 3072; rsa: any size the rsa crate accepts)
    #[arg(short, long, default_value_t = 2048)]
    bits: u32,

    /// Elliptic curve for ecdsa keys: 256, 384 or 521
    #[arg(short, long, default_value_t = 256)]
    curve: u32,

    /// Output file for the private key; the public key goes to <FILE>.pub
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Comment for the public key line
    #[arg(short = 'C', long, default_value = "")]
    comment: String,

    /// Overwrite existing key files
    #[arg(long)]
    force: bool,

    /// Print the keys instead of writing files
    #[arg(long, conflicts_with = "file")]
    stdout: bool,

    /// Print a JSON report instead of human readable output
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    cost: CostArgs,
}

/// JSON output format.
#[derive(Serialize)]
struct KeyReport {
    algorithm: String,
    size: u32,
    fingerprint: String,
    public_key: String,
    /// Only set with --stdout, where no file holds the private key.
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key_path: Option<PathBuf>,
    reads: u64,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_storage(path: Option<PathBuf>, algorithm: Algorithm) -> Result<Storage> {
    let path = match path {
        Some(p) => p,
        None => default_key_path(algorithm).context("could not determine home directory")?,
    };
    Ok(Storage::new(path))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(&args.log_level);

    // reject bad input before asking for the passphrase
    let algorithm: Algorithm = args.key_type.parse()?;
    let spec = KeySpec::from_parts(algorithm, args.bits, args.curve);
    let cost = args.cost.to_cost_params()?;

    let storage = if args.stdout {
        None
    } else {
        let private = resolve_storage(args.file.clone(), algorithm)?;
        if !args.force {
            for file in [&private, &private.public_companion()] {
                if file.exists() {
                    bail!("{} already exists", file.path().display());
                }
            }
        }
        Some(private)
    };

    let passphrase = auth::read_passphrase()?;
    let mut rng = Seeder::from_passphrase(&passphrase, cost)?;
    drop(passphrase);

    eprintln!("Generating public/private {algorithm} key pair.");
    let mut keydgen = Keydgen::new(spec).with_comment(args.comment.clone());
    let fingerprint = keydgen.generate(&mut rng)?.fingerprint()?;
    info!(reads = rng.reads(), "seeder drained");

    let private_pem = keydgen.marshal_private_key()?;
    let public_line = keydgen.marshal_public_key()?;

    let mut paths = None;
    match &storage {
        None if !args.json => {
            print!("{}", *private_pem);
            print!("{public_line}");
        }
        None => {}
        Some(private) => {
            let public = private.public_companion();
            private
                .save(private_pem.as_bytes())
                .with_context(|| format!("failed to write {}", private.path().display()))?;
            public
                .save(public_line.as_bytes())
                .with_context(|| format!("failed to write {}", public.path().display()))?;
            paths = Some((private.path().clone(), public.path().clone()));
        }
    }

    if args.json {
        let report = KeyReport {
            algorithm: algorithm.to_string(),
            size: spec.size(),
            fingerprint,
            public_key: public_line.trim_end().to_string(),
            private_key: storage.is_none().then(|| private_pem.to_string()),
            private_key_path: paths.as_ref().map(|(private, _)| private.clone()),
            public_key_path: paths.as_ref().map(|(_, public)| public.clone()),
            reads: rng.reads(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some((private, public)) = &paths {
        println!(
            "Your identification has been saved in {}",
            private.display()
        );
        println!("Your public key has been saved in {}", public.display());
        println!("The key fingerprint is:");
        println!("{fingerprint} {}", keydgen.comment());
    }

    Ok(())
}
