//! `fltstat` - CLI for flightstatus
//!
//! This binary looks up flight status from the configured provider and
//! inspects the local configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use flightstatus::cli::{
    render_flight, render_flight_json, Cli, Command, ConfigCommand, OutputFormat, TrackCommand,
};
use flightstatus::{init_logging, Config, FlightStatusClient};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Track(track) => handle_track(&config, &track).await,
        Command::Token(token) => {
            handle_token(&config, token.json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(config_cmd) => {
            handle_config(&config, config_cmd)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn handle_track(config: &Config, cmd: &TrackCommand) -> anyhow::Result<ExitCode> {
    let client = FlightStatusClient::from_config(config)?;

    let (flight, airports) = if cmd.airports {
        match client
            .track_flight_with_airports(&cmd.airline_code, &cmd.flight_number)
            .await?
        {
            Some(enriched) => (Some(enriched.flight), Some(enriched.airports)),
            None => (None, None),
        }
    } else {
        (
            client
                .track_flight(&cmd.airline_code, &cmd.flight_number)
                .await?,
            None,
        )
    };

    let Some(flight) = flight else {
        match cmd.format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Plain => println!(
                "No status found for {}{}",
                cmd.airline_code, cmd.flight_number
            ),
        }
        // Distinguishes "no data" from a failed lookup for scripts
        return Ok(ExitCode::from(3));
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", render_flight_json(&flight, airports.as_ref())?),
        OutputFormat::Plain => print!("{}", render_flight(&flight, airports.as_ref())),
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_token(config: &Config, json: bool) -> anyhow::Result<()> {
    let client = FlightStatusClient::from_config(config)?;
    client.authenticate().await?;
    let credential = client
        .cached_credential()
        .await
        .context("token exchange succeeded but no credential was cached")?;

    if json {
        let value = serde_json::json!({
            "token_type": credential.token_type(),
            "token": credential.masked_token(),
            "expires_at": credential.expires_at(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Token type:  {}", credential.token_type());
        println!("Token:       {}", credential.masked_token());
        println!(
            "Valid until: {} (includes {}s safety margin)",
            credential.expires_at().format("%Y-%m-%d %H:%M:%S UTC"),
            config.auth.expiry_margin_secs
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let endpoints = config.provider.endpoints();
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Provider]");
                println!("  Token endpoint:     {}", endpoints.token_url);
                println!("  Status endpoint:    {}", endpoints.status_url);
                println!("  Routes endpoint:    {}", endpoints.routes_url);
                println!(
                    "  Client id:          {}",
                    config.provider.client_id.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Client secret:      {}",
                    if config.provider.client_secret.is_some() {
                        "(set)"
                    } else {
                        "(not set)"
                    }
                );
                println!();
                println!("[Auth]");
                println!("  Expiry margin (s):  {}", config.auth.expiry_margin_secs);
                println!();
                println!("[HTTP]");
                match config.request_timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
                println!("  User agent:         {}", config.http.user_agent);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(loaded) => match loaded.provider.credentials() {
                    Ok(_) => println!("Configuration is valid."),
                    Err(e) => println!("Configuration is valid, but: {e}"),
                },
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
