// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dryad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dryad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dryad CLI entrypoint.
//!
//! Runs the interactive TUI with the built-in demo map. `--config` points at
//! a JSON preferences file; diagnostic logging goes to stderr and is
//! controlled via `DRYAD_LOG` (tracing env-filter syntax).

use std::error::Error;
use std::path::Path;

use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>]\n\nStarts the interactive mind-map TUI.\n\n--config loads JSON preferences (check_spelling, spell_locale, map_pan_button,\nmap_wheel_zoom, map_double_click_zoom). Without it the defaults apply.\n\nDRYAD_LOG controls diagnostics on stderr (e.g. DRYAD_LOG=dryad=debug)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config_path.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config_path = Some(path);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DRYAD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "dryad".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let config = match &options.config_path {
            Some(path) => dryad::config::load_config(Path::new(path))?,
            None => dryad::config::AppConfig::default(),
        };

        dryad::tui::run(config)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("dryad: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_config_path() {
        let options = parse_options(["--config".to_owned(), "prefs.json".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.config_path.as_deref(), Some("prefs.json"));
    }

    #[test]
    fn rejects_missing_config_value() {
        parse_options(["--config".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_config_flags() {
        parse_options(
            [
                "--config".to_owned(),
                "a.json".to_owned(),
                "--config".to_owned(),
                "b.json".to_owned(),
            ]
            .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
        parse_options(["positional".to_owned()].into_iter()).unwrap_err();
    }
}
