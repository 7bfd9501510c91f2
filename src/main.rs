use std::env;

use tracing_subscriber::EnvFilter;

use matchcast::cli;

/// Logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchcast=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {err}");
    }
}

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
