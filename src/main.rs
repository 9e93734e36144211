// src/main.rs

use timebound::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("timebound: {err:?}");
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("timebound: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
