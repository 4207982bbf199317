use std::fs::{self, File};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Default filter when logging to a file and `RUST_LOG` is unset.
const FILE_LOG_FILTER: &str = "info";

/// Installs the global logger.
///
/// The terminal UI owns the screen, so records go to `log_file` when one is
/// given. Without a file, logging stays off unless `RUST_LOG` asks for it.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::options().create(true).append(true).open(path)?;

            let mut builder = Builder::from_env(Env::default().default_filter_or(FILE_LOG_FILTER));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("off")),
    };

    builder.format_timestamp_millis();
    if let Err(error) = builder.try_init() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists, error));
    }

    Ok(())
}
