use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use shared_config::AppConfig;

#[derive(Parser)]
#[command(name = "mindwell", about = "MindWell booking client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the therapist directory, optionally filtered
    Therapists {
        /// Exact specialization to filter by
        #[arg(long)]
        specialization: Option<String>,
        /// Keep only therapists available on this weekday
        #[arg(long)]
        day: Option<String>,
    },
    /// Show a therapist's offerable days, or times for one day
    Slots {
        #[arg(long)]
        therapist: String,
        #[arg(long)]
        day: Option<String>,
    },
    /// List your appointments
    Appointments,
    /// Book an appointment
    Book {
        #[arg(long)]
        therapist: String,
        /// Weekday name, e.g. "Monday"
        #[arg(long)]
        day: String,
        /// Slot start time, e.g. "09:30"
        #[arg(long)]
        time: String,
        /// "Video Call", "In-Person", or "Phone Call"
        #[arg(long, default_value = "Video Call")]
        session_type: String,
    },
    /// Clear the stored session
    Logout,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let cli = Cli::parse();

    match cli.command {
        Command::Therapists {
            specialization,
            day,
        } => commands::therapists(&config, specialization, day).await,
        Command::Slots { therapist, day } => commands::slots(&config, &therapist, day).await,
        Command::Appointments => commands::appointments(&config).await,
        Command::Book {
            therapist,
            day,
            time,
            session_type,
        } => commands::book(&config, &therapist, &day, &time, &session_type).await,
        Command::Logout => commands::logout(&config),
    }
}
