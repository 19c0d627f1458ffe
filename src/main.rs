//! # bag2arff
//!
//! Converts Doc-Attribute matrices (Bag files) into sparse ARFF files usable by Weka.
//!
//! ```sh
//! bag2arff 0.1.0
//! Doc-Attribute matrix to Arff file (Weka) converter.
//!
//! USAGE:
//!     bag2arff [OPTIONS] --input <input> --output <output>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! OPTIONS:
//!     -i, --input <input>                       input directory of Doc-Attribute files
//!         --log <log>                           display log during the process: y, [N]
//!     -o, --output <output>                     output directory to save the Arff files
//!         --print_features <print-features>     print features in Doc-Attribute header: [Y], n
//!         --token <token>                       special token to split classes (e.g.: 1st-2nd)
//! ```
//!
//! Progress is logged with `--log`, other log levels can be set with `RUST_LOG`.
use bag2arff::processing::{self, Config};
use log::LevelFilter;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

const BANNER: &str = "Doc-Attribute matrix to Arff file (Weka) converter
==================================================";
const RULE: &str = "..................................................";

fn init_logger(log: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if log {
        builder.filter_module("bag2arff", LevelFilter::Info);
    }
    builder.init();
}

fn main() {
    let opt = cli::Bag2Arff::from_args();
    let config = Config::from(opt);
    init_logger(config.log);
    debug!("config\n{:#?}", config);

    println!("\n{}\n", BANNER);

    match processing::run(&config) {
        Ok(summary) => {
            println!("> Log:\n{}\n{}\n{}", RULE, summary, RULE);
        }
        Err(e) => {
            error!("{:?}", e);
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
