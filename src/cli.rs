use clap::Parser;

use crate::error::{Error, ErrorKind};
use crate::io::is_http_url;

#[derive(Parser, Debug)]
#[command(name = "runpck")]
#[command(version)]
#[command(about = "Extract PCK game archives, including extended .pkx/.pck pairs", long_about = None)]
#[command(after_help = "Examples:\n  \
  runpck configs.pck                  extract into ./configs.files\n  \
  runpck models.pkx -d out            extract an extended pair (models.pck is read too)\n  \
  runpck -l gfx.pck '*.dds'           list DDS entries\n  \
  runpck -p configs.pck 'data\\\\*.txt'  send matching entries to stdout")]
pub struct Cli {
    /// PCK/PKX file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Entries to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// Companion file holding the first part of an extended archive
    /// (default: FILE with .pck when FILE ends in .pkx)
    #[arg(short = 'e', value_name = "FILE")]
    pub extension: Option<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely/show archive info
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir (default: <archive stem>.files)
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        is_http_url(&self.file)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.is_very_quiet() {
            "error"
        } else if self.is_quiet() {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Whether an entry (by normalized name) passes the FILES and `-x` filters.
    pub fn selects(&self, name: &str) -> bool {
        if !self.files.is_empty() {
            let matches = self.files.iter().any(|f| {
                let f = crate::pck::normalize_name(f);
                if has_glob_chars(&f) {
                    glob_match(&f, name)
                } else {
                    let basename = name.rsplit('/').next().unwrap_or(name);
                    name == f || basename == f
                }
            });
            if !matches {
                return false;
            }
        }

        !self.exclude.iter().any(|x| {
            let x = crate::pck::normalize_name(x);
            name.contains(&x) || glob_match(&x, name)
        })
    }
}

/// Whether extraction moves on to the next entry after `err`.
///
/// Only data that fails to inflate is isolated to its entry; every other
/// error ends the run.
pub fn skips_failed_entry(err: &Error) -> bool {
    err.kind() == ErrorKind::Compression
}

/// Check if a pattern contains glob wildcard characters.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}
