//! Command-line demo: deal a secret, pick `k` random shares, recover it.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use num::BigInt;
use rand::rngs::OsRng;
use secret_sharing_scheme::{default_prime, SecretSharingScheme, Share};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sss", about = "Shamir's Secret Sharing Scheme", long_about = None)]
struct Args {
    /// Number of individuals
    #[arg(short = 'n', default_value_t = 50)]
    n: usize,

    /// Number of individuals necessary to obtain the key
    #[arg(short = 'k', default_value_t = 20)]
    k: usize,

    /// The secret key
    #[arg(short = 'K', default_value_t = BigInt::from(1337))]
    secret: BigInt,

    /// The prime used for the field
    #[arg(short = 'p', default_value_t = default_prime())]
    prime: BigInt,

    /// Verbose mode
    #[arg(short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn join(values: impl Iterator<Item = BigInt>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

fn print_submitted(shares: &[Share]) {
    println!("submitted:");
    println!("public keys: [{}]", join(shares.iter().map(|s| s.public_key.clone())));
    println!("private keys: [{}]", join(shares.iter().map(|s| s.secret_key.clone())));
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("#### Shamir's Secret Sharing Scheme ####\n");
    println!("p={}", args.prime);
    println!("K={} (the key)\n", args.secret);
    println!("#########################################\n");

    let scheme = SecretSharingScheme::new(args.k, args.n, args.prime)
        .context("cannot set up the scheme")?;
    let rng = &mut OsRng;
    let shares = scheme
        .generate_shares(&args.secret, rng)
        .context("share generation failed")?;

    if args.verbose {
        println!("Distributed public keys:\n[{}]", join(shares.public_keys().iter().cloned()));
        println!("Distributed secret keys:\n[{}]\n", join(shares.secret_keys().iter().cloned()));
    }

    let chosen = shares.choose(rng);
    if args.verbose {
        print_submitted(&chosen);
    }

    let recovered = scheme
        .recover_secret(&chosen)
        .context("secret recovery failed")?;
    println!("recovered K={}", recovered);

    Ok(())
}
