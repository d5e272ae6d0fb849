//! One-shot repair of a chat's participant fields.
//!
//! Normalizes the participant list (falling back to the legacy key when the
//! list is unusable), recomputes the canonical key and writes both fields
//! back. Safe to re-run; a second pass is a no-op write.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use rentline::adapters::FirestoreChatStore;
use rentline::application::{RepairChatCommand, RepairChatHandler, RepairChatResult};
use rentline::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "chat-repair")]
#[command(about = "Repair a chat's participant list and canonical key")]
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
        Ok(result) => {
            print_result(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("chat-repair: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(chat_id: &str) -> Result<RepairChatResult, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.firestore.validate()?;

    let store = Arc::new(FirestoreChatStore::new(config.firestore));
    let handler = RepairChatHandler::new(store);
    let result = handler
        .handle(RepairChatCommand {
            chat_id: chat_id.to_string(),
        })
        .await?;
    Ok(result)
}

fn print_result(result: &RepairChatResult) {
    println!(
        "chat {}: participants [{}], key {}",
        result.chat_id,
        result.participants.join(", "),
        result.participants_key
    );
    if result.reconstructed_from_key {
        println!("  participant list rebuilt from legacy key");
    }
    if result.changed {
        println!("  fields updated");
    } else {
        println!("  already consistent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn missing_chat_id_is_a_stderr_usage_error() {
        let err = Args::try_parse_from(["chat-repair"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.use_stderr());
    }

    #[test]
    fn chat_id_argument_parses() {
        let args = Args::try_parse_from(["chat-repair", "c1"]).unwrap();
        assert_eq!(args.chat_id, "c1");
    }
}
