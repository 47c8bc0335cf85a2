use clap::ValueEnum;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub const LOG_FILE_NAME: &str = "locusalign.log";

/// Logging levels offered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Verbosity {
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARN")]
    Warn,
    #[value(name = "CRITICAL")]
    Critical,
}

impl Verbosity {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Critical => LevelFilter::Error,
        }
    }
}

/// Copies every log line to stderr and to a log file
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Install the global logger. `RUST_LOG` still overrides the chosen level.
pub fn init(verbosity: Verbosity, log_dir: Option<&Path>) -> io::Result<()> {
    let default_level = verbosity.level_filter().to_string().to_lowercase();
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp_secs();

    if let Some(dir) = log_dir {
        let file = File::create(dir.join(LOG_FILE_NAME))?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    }
    builder.try_init().map_err(io::Error::other)
}

/// `text` centered in a 65-column rule of `=`
pub fn banner(text: &str) -> String {
    format!("{:=^65}", format!(" {} ", text))
}
