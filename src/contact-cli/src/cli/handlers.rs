//! Command dispatch and execution handlers.

use anyhow::Result;
use std::io::{self, Write};

use super::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::session::run_terminal;
use crate::terminal::AnsiTerminal;

/// Dispatch a CLI command to its handler and return the process exit code.
pub async fn dispatch_command(cli: Cli) -> Result<i32> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env();

    match cli.command {
        None => {
            let pacing = config.pacing(cli.session.instant, cli.session.char_delay_ms);
            let output = AnsiTerminal::detect(cli.color);
            run_terminal(&config, output, pacing, cli.session.dry_run).await
        }
        Some(Commands::Config) => {
            let mut stdout = io::stdout().lock();
            write_config_summary(&config, &mut stdout)?;
            Ok(0)
        }
    }
}

/// Print the resolved configuration. Secrets only show whether they are set.
pub fn write_config_summary(config: &AppConfig, out: &mut impl Write) -> io::Result<()> {
    fn show(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("(not set)")
    }
    fn secret(value: &Option<String>) -> &'static str {
        if value.as_deref().is_some_and(|v| !v.is_empty()) {
            "(set)"
        } else {
            "(not set)"
        }
    }

    let relay = &config.relay;
    writeln!(out, "[relay]")?;
    writeln!(
        out,
        "  endpoint      {}",
        relay
            .endpoint
            .as_deref()
            .unwrap_or(contact_relay::DEFAULT_ENDPOINT)
    )?;
    writeln!(out, "  service_id    {}", show(&relay.service_id))?;
    writeln!(out, "  template_id   {}", show(&relay.template_id))?;
    writeln!(out, "  public_key    {}", secret(&relay.public_key))?;
    writeln!(out, "  access_token  {}", secret(&relay.access_token))?;
    match relay.timeout_secs {
        Some(secs) => writeln!(out, "  timeout       {secs}s")?,
        None => writeln!(out, "  timeout       (none)")?,
    }

    writeln!(out, "[recipient]")?;
    writeln!(out, "  email         {}", show(&config.recipient.email))?;
    writeln!(out, "  name          {}", show(&config.recipient.name))?;

    let pacing = config.pacing(false, None);
    writeln!(out, "[pacing]")?;
    writeln!(out, "  char_delay    {}ms", pacing.char_delay.as_millis())?;
    writeln!(out, "  pauses        {}", pacing.pauses)?;

    if let Err(err) = config.relay_config() {
        writeln!(out)?;
        writeln!(out, "warning: {err}")?;
    }
    Ok(())
}
