//! Webhook Demo
//!
//! Decodes a webhook payload, logs every messaging event by kind and, with
//! `--echo`, answers text messages through the Graph API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package webhook-demo -- payload.json
//! curl -s https://example.test/hook | cargo run --package webhook-demo
//! INSTABOT_CLIENT__ACCESS_TOKEN=... cargo run --package webhook-demo -- --echo payload.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use instabot::{
    Client, Event, FlatEvent, InstaBot, Message, MessagingEvent, QuickReply, TextMessageEvent,
};
use instabot_runtime::{ConfigLoader, LoggingBuilder};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(about = "Decode an Instagram webhook payload")]
struct Args {
    /// Payload file; stdin when omitted.
    payload: Option<PathBuf>,

    /// Reply to text messages with their own text.
    #[arg(long)]
    echo: bool,

    /// Configuration file, used with `--echo`.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

async fn read_payload(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
    }
}

fn log_event(event: &MessagingEvent) {
    let sender = &event.sender.id;
    match event.event() {
        Event::TextMessage(text) => info!("[{sender}] text: {}", text.text),
        Event::QuickReply(reply) => info!("[{sender}] quick reply: {}", reply.payload),
        Event::MessageReply(reply) => {
            info!("[{sender}] reply to {}: {}", reply.reply_to_mid, reply.text)
        }
        Event::ImageMessage(media)
        | Event::AudioMessage(media)
        | Event::VideoMessage(media)
        | Event::FileMessage(media) => info!("[{sender}] {}: {}", media.kind, media.url),
        Event::StoryMention(mention) => info!("[{sender}] mentioned us: {}", mention.story.url),
        Event::StoryReply(reply) => info!("[{sender}] story reply: {}", reply.text),
        Event::Share(share) => info!("[{sender}] shared {}", share.url),
        Event::Reaction(reaction) if reaction.reaction.is_unreact() => {
            info!("[{sender}] removed reaction on {}", reaction.reaction.mid)
        }
        Event::Reaction(reaction) => info!(
            "[{sender}] reacted {} on {}",
            reaction.reaction.reaction, reaction.reaction.mid
        ),
        Event::PostBack(postback) => info!("[{sender}] postback: {}", postback.postback.payload),
        Event::MessageSeen(seen) => info!("[{sender}] seen {}", seen.mid),
        Event::Deleted(deleted) => info!("[{sender}] deleted {}", deleted.mid),
        other => info!("[{sender}] {}", other.kind()),
    }
}

async fn echo(client: &Client, event: &MessagingEvent) {
    let Some(text) = TextMessageEvent::from_event(event) else {
        return;
    };

    let reply = Message::text_with_quick_replies(
        format!("echo: {}", text.text),
        [QuickReply::text("Again", "ECHO_AGAIN")],
    );
    match client.send_message(&text.sender.id, &reply).await {
        Ok(sent) => info!(message_id = %sent.message_id, "echoed"),
        Err(e) => error!("Failed to send echo reply: {e}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Without --echo no token is needed, so logging is configured by hand.
    let client = if args.echo {
        let loader = match &args.config {
            Some(path) => ConfigLoader::new().file(path),
            None => ConfigLoader::new(),
        };
        let config = loader.load()?;
        instabot_runtime::init_from_config(&config.logging);
        Some(Client::new(config.client)?)
    } else {
        LoggingBuilder::new().directive("instabot=debug").init();
        None
    };

    let payload = read_payload(args.payload.as_ref()).await?;
    let webhook = instabot::decode(&payload).context("invalid webhook payload")?;
    info!(object = %webhook.object, entries = webhook.entries.len(), "webhook decoded");

    for event in webhook.events() {
        log_event(event);
        if let Some(client) = &client {
            echo(client, event).await;
        }
    }

    Ok(())
}
