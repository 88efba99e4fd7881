use clap::Parser;
use rivo_bench::{init_logging, run, Cli};

fn main() {
    init_logging();
    let cli = Cli::parse();

    let output = run(&cli).and_then(|snapshot| Ok(serde_json::to_string_pretty(&snapshot)?));
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "bench failed");
            std::process::exit(1);
        }
    }
}
