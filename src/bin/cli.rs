use clap::{Parser, Subcommand};
use std::sync::Arc;
use todo_backend::{
    config::AppConfig,
    db,
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "CLI tool for managing the todo backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables if they do not exist
    Migrate,

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user and all of their todos
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn confirm_password(prompt: &str) -> anyhow::Result<(String, String)> {
    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    Ok((password, confirm))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    let user_command = match cli.command {
        Commands::Migrate => {
            // Closes the pool whether or not creation succeeded
            if db::migrate(pool).await.is_err() {
                std::process::exit(1);
            }
            return Ok(());
        }
        Commands::User { command } => command,
    };

    db::init_schema(&pool).await?;

    // Initialize services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    match user_command {
        UserCommands::Create {
            email,
            name,
            password,
        } => {
            let password = if let Some(pw) = password {
                pw
            } else {
                let (password, password_confirm) = confirm_password("Password")?;
                if password != password_confirm {
                    eprintln!("❌ Passwords do not match");
                    std::process::exit(1);
                }
                password
            };

            let request = CreateUserRequest {
                email,
                password,
                name,
            };

            match user_service.create_user(request).await {
                Ok(user) => {
                    println!("✅ User created successfully!");
                    println!("  ID: {}", user.id);
                    println!("  Email: {}", user.email);
                    println!("  Name: {}", user.name);
                }
                Err(err) => {
                    eprintln!("❌ Failed to create user: {}", err);
                    std::process::exit(1);
                }
            }
        }

        UserCommands::List { limit, offset } => {
            match user_service.list_users(Some(limit), Some(offset)).await {
                Ok(users) => {
                    if users.is_empty() {
                        println!("No users found.");
                    } else {
                        println!(
                            "{:<5} {:<40} {:<25} {:<20}",
                            "ID", "Email", "Name", "Created"
                        );
                        println!("{}", "-".repeat(90));
                        for user in users {
                            println!(
                                "{:<5} {:<40} {:<25} {:<20}",
                                user.id,
                                user.email,
                                user.name,
                                user.created_at.format("%Y-%m-%d %H:%M:%S")
                            );
                        }
                    }
                }
                Err(err) => {
                    eprintln!("❌ Failed to list users: {}", err);
                    std::process::exit(1);
                }
            }
        }

        UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
            Ok(Some(user)) => match user_service.delete_user(user.id).await {
                Ok(()) => {
                    println!("✅ User '{}' and their todos deleted", email);
                }
                Err(err) => {
                    eprintln!("❌ Failed to delete user: {}", err);
                    std::process::exit(1);
                }
            },
            Ok(None) => {
                eprintln!("❌ User '{}' not found", email);
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("❌ Failed to find user: {}", err);
                std::process::exit(1);
            }
        },
    }

    pool.close().await;
    Ok(())
}
