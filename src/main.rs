//! Dictionary builder CLI.
//!
//! Hand-rolled argument parsing (no clap dependency) to keep the tool
//! small and boot fast.
//!
//! # Grammar
//!
//! ```text
//! fcf-build -i <wordlist> -o <blob> [-n lower|none]
//! fcf-build --help | -h
//! ```
//!
//! Exit code 0 on success; 1 on unreadable input, parse failure, or write
//! failure, with a one-line diagnostic on stderr.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process;

use fcfilter_rs::{DictBuilder, Normalizer};

struct BuildConfig {
    input: PathBuf,
    output: PathBuf,
    normalizer: Normalizer,
}

fn main() {
    let config = parse_args();

    let text = match fs::read_to_string(&config.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: read {}: {err}", config.input.display());
            process::exit(1);
        }
    };

    let mut builder = DictBuilder::new(config.normalizer);
    builder.add_wordlist(&text);
    if builder.word_count() == 0 {
        eprintln!(
            "warning: {} contains no entries; writing an empty dictionary",
            config.input.display()
        );
    }

    // Serialize fully before touching the output path, so a failed run
    // leaves the destination absent rather than half-written.
    let blob = builder.build().to_bytes();
    if let Err(err) = fs::write(&config.output, &blob) {
        eprintln!("error: write {}: {err}", config.output.display());
        process::exit(1);
    }

    eprintln!(
        "wrote {} ({} words, {} bytes)",
        config.output.display(),
        builder.word_count(),
        blob.len()
    );
}

fn parse_args() -> BuildConfig {
    let mut args = env::args_os();
    let _exe = args.next();

    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut normalizer = Normalizer::Lowercase;

    while let Some(arg) = args.next() {
        let Some(flag) = arg.to_str() else {
            eprintln!("error: non-UTF-8 argument");
            process::exit(1);
        };
        match flag {
            "-i" | "--input" => input = Some(PathBuf::from(take_value(&mut args, flag))),
            "-o" | "--output" => output = Some(PathBuf::from(take_value(&mut args, flag))),
            "-n" | "--normalize" => {
                normalizer = parse_normalize_mode(&take_value(&mut args, flag));
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            _ => {
                if let Some(rest) = flag.strip_prefix("--input=") {
                    input = Some(PathBuf::from(rest));
                } else if let Some(rest) = flag.strip_prefix("--output=") {
                    output = Some(PathBuf::from(rest));
                } else if let Some(rest) = flag.strip_prefix("--normalize=") {
                    normalizer = parse_normalize_mode(&OsString::from(rest));
                } else {
                    eprintln!("error: unknown argument '{flag}'");
                    print_usage();
                    process::exit(1);
                }
            }
        }
    }

    let Some(input) = input else {
        eprintln!("error: -i/--input is required");
        print_usage();
        process::exit(1);
    };
    let Some(output) = output else {
        eprintln!("error: -o/--output is required");
        print_usage();
        process::exit(1);
    };

    BuildConfig {
        input,
        output,
        normalizer,
    }
}

fn take_value(args: &mut env::ArgsOs, flag: &str) -> OsString {
    match args.next() {
        Some(value) => value,
        None => {
            eprintln!("error: {flag} requires a value");
            print_usage();
            process::exit(1);
        }
    }
}

/// `lower` enables case-folding; any other mode disables normalization.
fn parse_normalize_mode(mode: &OsString) -> Normalizer {
    if mode.to_str() == Some("lower") {
        Normalizer::Lowercase
    } else {
        Normalizer::None
    }
}

fn print_usage() {
    eprintln!(
        "usage: fcf-build -i <wordlist> -o <blob> [OPTIONS]

OPTIONS:
    -i, --input <file>       Source word list (one word per line, or
                             comma-separated; '#' starts a comment)
    -o, --output <file>      Destination dictionary blob
    -n, --normalize <mode>   'lower' to case-fold (default); any other
                             value builds a case-sensitive dictionary
    -h, --help               Show this help"
    );
}
