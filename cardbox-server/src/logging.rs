use env_logger::{Env, Target};
use log::SetLoggerError;
use std::io::Write;

/// Install the process logger. Defaults to `info`; `RUST_LOG` overrides.
/// Lines carry a millisecond timestamp, the level and the dotted log target.
pub fn init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args().to_string().replace('\n', "\\n")
            )
        })
        .try_init()
}
