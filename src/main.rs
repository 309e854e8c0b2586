use git_to_text::cli::{run, Cli};
use git_to_text::contract::DigestError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    git_to_text::init_tracing();

    let cli = Cli::parse_args();
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(()) => {
            tracing::info!("CLI completed successfully");
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            match e.downcast_ref::<DigestError>() {
                Some(err) if err.is_fetch() => eprintln!("{err}"),
                _ => eprintln!("[ERROR] {e:#}"),
            }
            std::process::exit(1);
        }
    }
}
