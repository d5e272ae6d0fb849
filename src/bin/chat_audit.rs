//! One-shot audit of a chat's message senders.
//!
//! Reads the chat document and its message subcollection and reports,
//! without mutating anything, every message whose sender is missing or not
//! in the participant list.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use rentline::adapters::FirestoreChatStore;
use rentline::application::{AuditChatCommand, AuditChatHandler, ChatAuditReport};
use rentline::config::AppConfig;
use rentline::domain::chat::MessageFinding;

#[derive(Debug, Parser)]
#[command(name = "chat-audit")]
#[command(about = "Audit a chat's messages for missing or unknown senders")]
struct Args {
    /// Chat document id
    chat_id: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    // Usage errors exit 1 like every other failure; --help and --version
    // are not failures.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args.chat_id).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("chat-audit: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(chat_id: &str) -> Result<ChatAuditReport, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.firestore.validate()?;

    let store = Arc::new(FirestoreChatStore::new(config.firestore));
    let handler = AuditChatHandler::new(store);
    let report = handler
        .handle(AuditChatCommand {
            chat_id: chat_id.to_string(),
        })
        .await?;
    Ok(report)
}

fn print_report(report: &ChatAuditReport) {
    println!(
        "chat {}: {} participants, {} messages",
        report.chat_id,
        report.participants.len(),
        report.message_count
    );

    for finding in &report.findings {
        match finding {
            MessageFinding::MissingSender { message_id } => {
                println!("  message {}: sender missing", message_id);
            }
            MessageFinding::UnknownSender {
                message_id,
                sender_id,
            } => {
                println!(
                    "  message {}: sender {} not in participants",
                    message_id, sender_id
                );
            }
        }
    }

    if report.is_valid() {
        println!("chat {}: all messages valid", report.chat_id);
    } else {
        println!(
            "chat {}: {} invalid message(s)",
            report.chat_id,
            report.findings.len()
        );
    }
}
