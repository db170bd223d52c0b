//! CLI styling and formatting.
//!
//! Defines ANSI colors and formatting for the CLI help output.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Help theme, green on the terminal's default background.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// After-help section with environment variables documentation.
pub const AFTER_HELP: &str = r#"ENVIRONMENT VARIABLES
    CONTACT_RELAY_ENDPOINT       Override the EmailJS send endpoint
    CONTACT_RELAY_SERVICE_ID     EmailJS service id
    CONTACT_RELAY_TEMPLATE_ID    EmailJS template id
    CONTACT_RELAY_PUBLIC_KEY     EmailJS public key
    CONTACT_RELAY_ACCESS_TOKEN   EmailJS private access token
    CONTACT_RECIPIENT_EMAIL      Address messages are sent to
    CONTACT_RECIPIENT_NAME       Name messages are addressed to
    CONTACT_LOG_LEVEL            Log verbosity (error, warn, info, debug, trace)
    NO_COLOR                     Disable colored output

PATHS
    Config    ~/.contact-terminal/config.toml"#;
