use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    certificate_verifier::run().await
}
