use std::collections::BTreeMap;

use anyhow::anyhow;
use clap::Parser;
use server::{
    config::Config,
    firebase::FirebaseAdmin,
    init_tracing,
    messaging::{Notification, send_push},
};
use tracing::info;

/// Send a push notification to one or more devices.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    title: String,

    #[arg(long)]
    body: String,

    #[arg(long)]
    image: Option<String>,

    /// Data payload entry, repeatable
    #[arg(long = "data", value_name = "KEY=VALUE", value_parser = parse_pair)]
    data: Vec<(String, String)>,

    #[arg(required = true)]
    tokens: Vec<String>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let config = Config::load()?;
    let admin = FirebaseAdmin::shared(&config).await?;

    let notification = Notification {
        title: args.title,
        body: args.body,
        image: args.image,
    };
    let data: BTreeMap<String, String> = args.data.into_iter().collect();

    info!("Sending to {} device(s)", args.tokens.len());
    let outcome = send_push(admin.as_ref(), &args.tokens, &notification, &data).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.success {
        Ok(())
    } else {
        Err(anyhow!(outcome.error.unwrap_or_default()))
    }
}
