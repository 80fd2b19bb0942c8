// src/main.rs

use procmux::errors::FATAL_EXIT_CODE;
use procmux::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("procmux error: {err:?}");
        std::process::exit(FATAL_EXIT_CODE);
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("procmux error: {err}");
            err.exit_code()
        }
    };

    std::process::exit(code);
}
