use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guide_agents::TravelAgent;
use guide_core::{classify_intent, extract_place, ChatInput};
use guide_observability::{init_cli_tracing, AppMetrics};
use guide_providers::{
    HttpProviders, NominatimGeocoder, OpenMeteoWeather, OverpassPlaces, ProviderConfig,
};

type CliAgent = TravelAgent<NominatimGeocoder, OpenMeteoWeather, OverpassPlaces>;

#[derive(Debug, Parser)]
#[command(name = "guide")]
#[command(about = "Travel guide: weather and sights for a place named in plain English")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer one message and exit.
    Ask {
        message: String,
        /// Print the full outcome (place, coordinates, intent, fetched data) as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive prompt; `exit` or `quit` leaves.
    Chat,
    /// Show which place would be extracted, without any network calls.
    Extract { message: String },
    /// Show the detected intent flags, without any network calls.
    Intent { message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_cli_tracing("guide");
    let cli = Cli::parse();

    match cli.command {
        Command::Ask { message, json } => {
            let agent = build_agent()?;
            let outcome = agent.handle_chat(ChatInput::new(message)).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.reply);
            }
        }
        Command::Chat => run_chat(build_agent()?).await?,
        Command::Extract { message } => match extract_place(&message) {
            Some(place) => println!("{place}"),
            None => println!("(none)"),
        },
        Command::Intent { message } => {
            let intent = classify_intent(&message);
            println!("{}", serde_json::to_string_pretty(&intent)?);
        }
    }

    Ok(())
}

async fn run_chat(agent: CliAgent) -> Result<()> {
    println!("Travel guide chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let outcome = agent.handle_chat(ChatInput::new(message)).await;
        println!("\n{}\n", outcome.reply);
    }

    Ok(())
}

fn build_agent() -> Result<CliAgent> {
    let config = ProviderConfig::from_env();
    let http = HttpProviders::from_config(&config).context("failed to set up providers")?;

    Ok(TravelAgent::new(
        Arc::new(http.geocoder),
        Arc::new(http.weather),
        Arc::new(http.places),
        AppMetrics::shared(),
        config.call_timeout(),
    ))
}
