use std::path::PathBuf;

use clap::Parser;

use cx::config::{Config, DEFAULT_CONFIG_FILE};
use cx::{OutputFormat, TransformOptions};

#[derive(Parser, Debug)]
#[command(name = "cx")]
#[command(about = "Rewrite C sources: drop pragmas, hoist loop declarations, expand loop and default-value sugar")]
pub struct Cli {
    /// Input file (stdin when omitted)
    #[arg(short = 'x', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only filter directive lines, leave everything else untouched (C++ input)
    #[arg(long, visible_alias = "cplusplus")]
    pub shallow: bool,

    /// Delete `#pragma NAME` lines (repeatable)
    #[arg(long = "no-pragma", value_name = "NAME")]
    pub no_pragma: Vec<String>,

    /// Delete `#include "..."` lines
    #[arg(long)]
    pub no_quote_includes: bool,

    /// Print the numeric s-expression dump instead of source
    #[arg(long)]
    pub sexp: bool,

    /// Keep declarations inside for-loop headers
    #[arg(long)]
    pub no_hoist: bool,

    /// Keep `//` comments
    #[arg(long)]
    pub keep_line_comments: bool,

    /// Project configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log filter, e.g. `debug` or `cx=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Merge the flags over the configuration file.
    pub fn transform_options(&self, config: Config) -> TransformOptions {
        let mut options = TransformOptions::from(config);
        let settings = &mut options.settings;

        for name in &self.no_pragma {
            if !settings.no_pragmas.contains(name) {
                settings.no_pragmas.push(name.clone());
            }
        }
        settings.no_quote_includes |= self.no_quote_includes;
        if self.no_hoist {
            settings.hoist_for_decls = false;
        }
        if self.keep_line_comments {
            settings.strip_line_comments = false;
        }
        if self.sexp {
            options.format = OutputFormat::Sexp;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_extend_config() {
        let cli = Cli::parse_from([
            "cx",
            "--no-pragma",
            "omp",
            "--no-pragma",
            "acc",
            "--no-hoist",
            "--sexp",
        ]);
        let mut config = Config::default();
        config.transform.no_pragmas = vec!["omp".to_string()];

        let options = cli.transform_options(config);
        assert_eq!(options.settings.no_pragmas, vec!["omp", "acc"]);
        assert!(!options.settings.hoist_for_decls);
        assert!(options.settings.strip_line_comments);
        assert_eq!(options.format, OutputFormat::Sexp);
    }

    #[test]
    fn test_io_flags() {
        let cli = Cli::parse_from(["cx", "-x", "in.c", "-o", "out.c", "--cplusplus"]);
        assert_eq!(cli.input, Some(PathBuf::from("in.c")));
        assert_eq!(cli.output, Some(PathBuf::from("out.c")));
        assert!(cli.shallow);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }
}
