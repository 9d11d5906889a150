use server::error::StartupError;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    server::start_server().await
}
