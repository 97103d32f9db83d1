//! Command-line options.
//!
//! Usage: bulwark [--manual] [--headless-ticks N] [--seed N]
//!                [--difficulty easy|normal|hard] [--profile PATH] [--config PATH]

use std::path::PathBuf;

use bulwark_core::enums::Difficulty;

pub const DEFAULT_PROFILE_PATH: &str = "bulwark_profile.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Autopilot plays unless `--manual`, in which case JSON player
    /// commands are read from stdin, one per line.
    pub autopilot: bool,
    /// Run this many ticks flat out instead of in real time.
    pub headless_ticks: Option<u64>,
    pub seed: u64,
    pub difficulty: Difficulty,
    pub profile_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            autopilot: true,
            headless_ticks: None,
            seed: 42,
            difficulty: Difficulty::Normal,
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            config_path: None,
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--autopilot" => options.autopilot = true,
            "--manual" => options.autopilot = false,
            "--headless-ticks" => {
                let ticks = value(&mut args, &arg)?;
                options.headless_ticks = Some(
                    ticks
                        .parse()
                        .map_err(|_| format!("invalid tick count: {ticks}"))?,
                );
            }
            "--seed" => {
                let seed = value(&mut args, &arg)?;
                options.seed = seed.parse().map_err(|_| format!("invalid seed: {seed}"))?;
            }
            "--difficulty" => options.difficulty = parse_difficulty(&value(&mut args, &arg)?)?,
            "--profile" => options.profile_path = PathBuf::from(value(&mut args, &arg)?),
            "--config" => options.config_path = Some(PathBuf::from(value(&mut args, &arg)?)),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s.to_ascii_lowercase().as_str() {
        "easy" => Ok(Difficulty::Easy),
        "normal" => Ok(Difficulty::Normal),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(format!("unknown difficulty: {s}")),
    }
}
