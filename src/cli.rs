//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use bag2arff::processing::Config;
use structopt::StructOpt;

/// Parse yes/no like values.
fn parse_bool(v: &str) -> Result<bool, String> {
    match v.to_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err(format!("invalid boolean value: '{}'", v)),
    }
}

fn validate_bool(v: String) -> Result<(), String> {
    parse_bool(&v).map(|_| ())
}

fn validate_token(v: String) -> Result<(), String> {
    if v.is_empty() {
        Err("split token can't be empty".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bag2arff",
    about = "Doc-Attribute matrix to Arff file (Weka) converter."
)]
/// Converts every Bag file of a directory.
///
/// ```sh
/// bag2arff --token - --input out/Bag/txt/ --output out/Bag/arff/
/// ```
///
/// Boolean options can be given without a value (meaning `true`),
/// or with one of `y/yes/t/true/1` or `n/no/f/false/0`.
pub struct Bag2Arff {
    #[structopt(
        short = "i",
        long = "input",
        parse(from_os_str),
        help = "input directory of Doc-Attribute files"
    )]
    pub input: PathBuf,
    #[structopt(
        short = "o",
        long = "output",
        parse(from_os_str),
        help = "output directory to save the Arff files"
    )]
    pub output: PathBuf,
    #[structopt(
        long = "token",
        validator = validate_token,
        help = "special token to split classes (e.g.: 1st-2nd)"
    )]
    pub token: Option<String>,
    #[structopt(
        long = "print_features",
        validator = validate_bool,
        help = "print features in Doc-Attribute header: [Y], n"
    )]
    pub print_features: Option<Option<String>>,
    #[structopt(
        long = "log",
        validator = validate_bool,
        help = "display log during the process: y, [N]"
    )]
    pub log: Option<Option<String>>,
}

/// absent → `default`, flag only → `true`.
///
/// Values went through [validate_bool] already.
fn flag(value: &Option<Option<String>>, default: bool) -> bool {
    match value {
        None => default,
        Some(None) => true,
        Some(Some(v)) => parse_bool(v).unwrap_or(default),
    }
}

impl Bag2Arff {
    pub fn log(&self) -> bool {
        flag(&self.log, false)
    }

    pub fn print_features(&self) -> bool {
        flag(&self.print_features, true)
    }
}

impl From<Bag2Arff> for Config {
    fn from(opt: Bag2Arff) -> Config {
        let log = opt.log();
        let print_features = opt.print_features();
        Config {
            src: opt.input,
            dst: opt.output,
            token: opt.token,
            print_features,
            log,
        }
    }
}
