use std::env;

use server::{auth::issue_token, config::Config};
use uuid::Uuid;

const USAGE: &str = "usage: tester [user-id] [email]";

fn main() {
    let mut args = env::args().skip(1);

    let user_id = match args.next().map(|raw| raw.parse::<Uuid>()) {
        Some(Ok(user_id)) => user_id,
        Some(Err(e)) => {
            eprintln!("Invalid user id: {e}\n{USAGE}");
            std::process::exit(2);
        }
        None => Uuid::new_v4(),
    };
    let email = args.next().unwrap_or_else(|| "tester@example.com".to_string());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match issue_token(&config.jwt_secret, user_id, &email, config.token_ttl_hours) {
        Ok(token) => {
            println!("User id: {user_id}");
            println!("Authorization: Bearer {token}");
        }
        Err(e) => {
            eprintln!("Failed to mint token: {e}");
            std::process::exit(1);
        }
    }
}
