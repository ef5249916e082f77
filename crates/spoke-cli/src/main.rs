//! spoke: terminal chat front-end for the bicycle-sales assistant.
//!
//! Reads user lines from stdin, forwards each to the completion backend
//! through a `ChatSession`, and prints the reply. The transcript lives in
//! memory for the lifetime of the process.

use std::io::{BufRead, Write};

use clap::Parser;

use spoke_chat::{prompts, ChatError, ChatSession, OpenAiClient, Role, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "spoke", version, about = "Bicycle sales chat assistant")]
struct Args {
    /// Model identifier to request.
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature (0..=2).
    #[arg(long)]
    temperature: Option<f64>,

    /// Maximum tokens per assistant reply.
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Transcript character budget before old exchanges are evicted.
    #[arg(long)]
    context_budget: Option<usize>,

    /// System prompt override.
    #[arg(long)]
    system: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn build_config(args: &Args) -> Result<SessionConfig, ChatError> {
    let system = args
        .system
        .clone()
        .unwrap_or_else(prompts::sales_system_prompt);

    let mut config = SessionConfig::from_env(system)?;
    if let Some(ref model) = args.model {
        config = config.with_model(model.clone());
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        config = config.with_max_reply_tokens(max_tokens);
    }
    if let Some(budget) = args.context_budget {
        config = config.with_context_budget(budget);
    }
    Ok(config)
}

fn print_history(history: &[spoke_chat::Message]) {
    for msg in history {
        let tag = match msg.role {
            Role::System => "[system]",
            Role::User => "[you]",
            Role::Assistant => "[assistant]",
        };
        println!("{tag} {}", msg.content);
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let directive = args.log_level.as_deref().unwrap_or("spoke=warn");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .init();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("spoke: {e}");
            std::process::exit(1);
        }
    };

    let client = OpenAiClient::new(config.api_key.clone());
    let mut session = match ChatSession::new(config, client) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("spoke: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("spoke v{} ready", env!("CARGO_PKG_VERSION"));

    println!("Bicycle sales assistant. /history shows the transcript, /clear starts over, /quit exits.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("spoke: stdin error: {e}");
                break;
            }
        }

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.reset();
                println!("Chat history cleared.");
            }
            "/history" => print_history(&session.history()),
            "" => continue,
            text => match session.submit(text).await {
                Ok(reply) => println!("{reply}"),
                // Transcript is unchanged on failure; the user can retry.
                Err(e) => eprintln!("Error fetching response: {e}"),
            },
        }
    }
}
