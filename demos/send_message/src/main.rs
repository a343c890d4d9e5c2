//! Send Message Demo
//!
//! Loads `instabot.toml` (or `--config`), then sends one message, prints a
//! user's profile, or manages the account's ice breakers.
//!
//! # Usage
//!
//! ```bash
//! INSTABOT_CLIENT__ACCESS_TOKEN=... cargo run --package send-message-demo -- send <IGSID> "Hello!"
//! cargo run --package send-message-demo -- send <IGSID> --image https://example.test/cat.png
//! cargo run --package send-message-demo -- send <COMMENT_ID> --private-reply "Thanks!"
//! cargo run --package send-message-demo -- profile <IGSID>
//! cargo run --package send-message-demo -- ice-breakers set "What are your hours?=HOURS" "Where are you?=LOCATION"
//! cargo run --package send-message-demo -- ice-breakers get
//! cargo run --package send-message-demo -- ice-breakers delete
//! ```

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use instabot::{Client, IceBreaker, InstaBot, Message};
use instabot_runtime::ConfigLoader;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Talk to the Instagram Messaging API")]
struct Args {
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one message.
    Send {
        /// Instagram-scoped user id, or a comment id with `--private-reply`.
        target: String,

        /// Text to send.
        text: Option<String>,

        /// Send an image by URL instead of text.
        #[arg(long, conflicts_with = "text")]
        image: Option<String>,

        /// Send the heart sticker.
        #[arg(long, conflicts_with_all = ["text", "image"])]
        sticker: bool,

        /// Reply privately to the comment `target`.
        #[arg(long)]
        private_reply: bool,
    },
    /// Print a user's profile.
    Profile { target: String },
    /// Manage the questions shown when a conversation starts.
    #[command(subcommand)]
    IceBreakers(IceBreakerCommand),
}

#[derive(Debug, Subcommand)]
enum IceBreakerCommand {
    /// Replace the ice breakers with `question=payload` pairs.
    Set {
        #[arg(required = true, value_parser = parse_ice_breaker)]
        ice_breakers: Vec<IceBreaker>,
    },
    /// List the current ice breakers.
    Get,
    /// Remove all ice breakers.
    Delete,
}

fn parse_ice_breaker(s: &str) -> Result<IceBreaker> {
    let (question, payload) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("expected `question=payload`, got `{s}`"))?;
    if question.is_empty() || payload.is_empty() {
        bail!("question and payload must both be non-empty");
    }
    Ok(IceBreaker::new(question, payload))
}

fn message(text: Option<&str>, image: Option<&str>, sticker: bool) -> Result<Message> {
    Ok(match (text, image, sticker) {
        (Some(text), _, _) => Message::text(text),
        (_, Some(url), _) => Message::image(url),
        (_, _, true) => Message::sticker(),
        _ => bail!("nothing to send: pass a text, --image or --sticker"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().file(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    instabot_runtime::init_from_config(&config.logging);

    let client = Client::new(config.client)?;

    match args.command {
        Command::Send {
            target,
            text,
            image,
            sticker,
            private_reply,
        } => {
            let message = message(text.as_deref(), image.as_deref(), sticker)?;
            let sent = if private_reply {
                client.send_private_reply(&target, &message).await?
            } else {
                client.send_message(&target, &message).await?
            };
            info!(recipient_id = %sent.recipient_id, message_id = %sent.message_id, "sent");
        }
        Command::Profile { target } => {
            let profile = client.get_user_profile(&target).await?;
            info!(
                name = %profile.name,
                followers = profile.follower_count,
                verified = profile.is_verified_user,
                "profile"
            );
        }
        Command::IceBreakers(IceBreakerCommand::Set { ice_breakers }) => {
            let response = client.set_ice_breakers(&ice_breakers).await?;
            info!(result = %response.result, count = ice_breakers.len(), "ice breakers set");
        }
        Command::IceBreakers(IceBreakerCommand::Get) => {
            let response = client.get_ice_breakers().await?;
            for ice_breaker in response.ice_breakers() {
                info!(payload = %ice_breaker.payload, "{}", ice_breaker.question);
            }
        }
        Command::IceBreakers(IceBreakerCommand::Delete) => {
            let response = client.delete_ice_breakers().await?;
            info!(result = %response.result, "ice breakers deleted");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ice_breaker() {
        let ib = parse_ice_breaker("Is 2+2=4?=MATH").unwrap();
        assert_eq!(ib, IceBreaker::new("Is 2+2=4?", "MATH"));

        assert!(parse_ice_breaker("no separator").is_err());
        assert!(parse_ice_breaker("=PAYLOAD").is_err());
    }

    #[test]
    fn test_ice_breakers_subcommand() {
        let args = Args::try_parse_from([
            "send-message-demo",
            "ice-breakers",
            "set",
            "Hours?=HOURS",
            "Where?=LOCATION",
        ])
        .unwrap();
        let Command::IceBreakers(IceBreakerCommand::Set { ice_breakers }) = args.command else {
            panic!("expected ice-breakers set");
        };
        assert_eq!(ice_breakers.len(), 2);
        assert_eq!(ice_breakers[1].payload, "LOCATION");

        assert!(Args::try_parse_from(["send-message-demo", "ice-breakers", "set"]).is_err());
    }
}
