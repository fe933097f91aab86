use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finboard::client::{
    api::DEFAULT_BASE_URL,
    guard::{after_auth, Page},
    require_anonymous, require_session,
    session::token_cookie,
    ApiClient, ClientError, TokenStore,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "finboard-cli", about = "Finboard account CLI")]
struct Cli {
    #[arg(long, env = "FINBOARD_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "FINBOARD_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and store its token.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FINBOARD_PASSWORD")]
        password: String,
    },
    /// Log in and store the token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FINBOARD_PASSWORD")]
        password: String,
    },
    /// Show the logged-in user.
    Me,
    /// Forget the stored token.
    Logout,
    /// Report whether a session is stored, and print it as a cookie.
    Status,
    Health,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        if let ClientError::Api { errors, .. } = &e {
            for fe in errors {
                eprintln!("  {}: {}", fe.field, fe.message);
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let store = cli
        .token_file
        .map(TokenStore::new)
        .unwrap_or_else(TokenStore::default_location);
    let client = ApiClient::new(cli.base_url);

    match cli.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            require_anonymous(&store, Page::Signup)?;
            let res = client.signup(&name, &email, &password).await?;
            store.set_token(&res.token)?;
            eprintln!("{} -> {}", res.message, after_auth().path());
            print_json(&res.user)
        }
        Command::Login { email, password } => {
            require_anonymous(&store, Page::Login)?;
            let res = client.login(&email, &password).await?;
            store.set_token(&res.token)?;
            eprintln!("{} -> {}", res.message, after_auth().path());
            print_json(&res.user)
        }
        Command::Me => {
            let token = require_session(&store)?;
            let res = client.with_token(Some(token)).me().await?;
            print_json(&res.user)
        }
        Command::Logout => {
            if let Err(e) = client.logout().await {
                eprintln!("server logout failed: {e}");
            }
            store.remove_token()?;
            eprintln!("logged out");
            Ok(())
        }
        Command::Status => {
            match store.token()? {
                Some(token) => {
                    println!("logged in ({})", store.path().display());
                    println!("{}", token_cookie(&token));
                }
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Health => print_json(&client.health().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
