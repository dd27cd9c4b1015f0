use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Route `log` output to `path`, appending.
///
/// The TUI owns stdout/stderr, so records never go to the terminal. If the file
/// cannot be opened logging is discarded rather than failing startup. Returns
/// false when a logger was already installed; that logger stays in place.
pub fn init(path: &Path, default_filter: &str) -> bool {
    let target = match open_log(path) {
        Ok(file) => Target::Pipe(Box::new(file)),
        Err(_) => Target::Pipe(Box::new(io::sink())),
    };

    match Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(target)
        .format_timestamp_millis()
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            log::debug!("keeping existing logger, {} not used: {err}", path.display());
            false
        }
    }
}

fn open_log(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
