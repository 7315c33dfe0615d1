use chrono::{DateTime, Local};
use log::Level;
use std::io::Write;

/// Format of the timestamp on every log line, in local time.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Install the logger.
///
/// Lines look like `Info : 01/03/2024 10:00:00 : Running speedtest`. The filter defaults to
/// `info` and can be changed with `RUST_LOG`.
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(record.level(), &Local::now(), record.args())
            )
        })
        .try_init()
}

pub fn format_line(
    level: Level,
    time: &DateTime<Local>,
    message: impl std::fmt::Display,
) -> String {
    format!(
        "{} : {} : {}",
        level_name(level),
        time.format(TIMESTAMP_FORMAT),
        message
    )
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "Error",
        Level::Warn => "Warn",
        Level::Info => "Info",
        Level::Debug => "Debug",
        Level::Trace => "Trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn line_has_level_time_and_message() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();

        assert_eq!(
            format_line(Level::Info, &time, "Running speedtest"),
            "Info : 01/03/2024 09:05:07 : Running speedtest"
        );
        assert_eq!(
            format_line(Level::Error, &time, "Speedtest failed"),
            "Error : 01/03/2024 09:05:07 : Speedtest failed"
        );
    }
}
