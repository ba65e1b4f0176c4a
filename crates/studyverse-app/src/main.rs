use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;

use studyverse_infrastructure::config::AppConfig;
use studyverse_infrastructure::logging::init_logger;
use studyverse_lib::presentation::commands;
use studyverse_lib::presentation::error::CommandError;
use studyverse_lib::presentation::state::AppState;

/// StudyVerse client: activity, session and chatroom commands
#[derive(Parser, Debug)]
#[command(name = "studyverse", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the activity overview (365-day calendar and streaks)
    Activity {
        /// User to show; defaults to the signed-in user
        user_id: Option<String>,

        /// Only print current and longest streak
        #[arg(long)]
        streaks: bool,
    },
    /// Log in and remember the session
    Login { email: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Ask for a password reset email
    ResetPassword { email: String },
    /// Set a new password with the token from the reset email
    UpdatePassword { token: String, password: String },
    /// List chatrooms
    Rooms,
    /// Create a chatroom
    CreateRoom {
        name: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Print the messages and participants of a room
    Messages { room_id: String },
    /// Send a message to a room
    Send { room_id: String, text: String },
    /// Print the log directory
    LogDir,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(state: &AppState, command: Command) -> Result<(), CommandError> {
    match command {
        Command::Activity { user_id, streaks } => {
            if streaks {
                print_json(&commands::get_activity_streaks(state, user_id).await?)
            } else {
                print_json(&commands::get_activity_overview(state, user_id).await?)
            }
        }
        Command::Login { email, password } => {
            print_json(&commands::login(state, email, password).await?)
        }
        Command::Logout => commands::logout(state).await,
        Command::Whoami => match commands::current_session(state).await? {
            Some(session) => print_json(&session),
            None => Err(CommandError::not_authenticated("Not logged in")),
        },
        Command::Register {
            name,
            email,
            password,
        } => commands::register(state, name, email, password).await,
        Command::ResetPassword { email } => commands::reset_password(state, email).await,
        Command::UpdatePassword { token, password } => {
            commands::update_password(state, token, password).await
        }
        Command::Rooms => print_json(&commands::list_chatrooms(state).await?),
        Command::CreateRoom { name, image } => {
            commands::create_chatroom(state, name, image).await
        }
        Command::Messages { room_id } => {
            print_json(&commands::get_room_activity(state, room_id).await?)
        }
        Command::Send { room_id, text } => {
            print_json(&commands::send_chat_message(state, room_id, text).await?)
        }
        Command::LogDir => print_json(&commands::get_log_dir()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logger(&config.log_dir(), config.log_level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&state, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::warn!(code = e.code, "Command failed: {}", e.message);
            match serde_json::to_string_pretty(&e) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}
