use snafu::prelude::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unknown severity `{input}`, expect all|info|warning|error|exception|none|always"))]
    ParseSeverity { input: String },
    #[snafu(display("Invalid color `{input}`, expect `#rrggbb` or a color name"))]
    ParseColor { input: String },
    #[snafu(display("Unknown markup `{input}`, expect plain|rich|ansi"))]
    ParseMarkup { input: String },
    #[snafu(display("Invalid switch `{input}`, expect on|off"))]
    ParseToggle { input: String },
    #[snafu(display("Invalid color entry `{entry}`, expect `Identity=color`"))]
    InvalidEntry { entry: String },
    #[snafu(display("Invalid setting {key}: {source}"))]
    Setting {
        key: String,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },
    #[snafu(display("{source}"))]
    Command { source: clap::Error },
    #[snafu(display("Not a log command: {input}"))]
    NotACommand { input: String },
    #[snafu(display("Failed to set logger: {source}"))]
    SetLogger { source: log::SetLoggerError },
    #[snafu(display("A global logger is already installed"))]
    AlreadyInstalled,
}
