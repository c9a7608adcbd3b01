use anyhow::Result;
use clap::Parser;
use tracing::error;

use report_query::{answer, answer_json, answer_json_structured, answer_structured, Args, Config};

fn main() -> Result<()> {
    let args = Args::parse();
    report_query::utils::setup_logging(args.verbose);

    let config = Config::from_args(&args);

    let output = match (&args.criteria, args.json) {
        (Some(raw), false) => answer_json(&config, raw),
        (Some(raw), true) => answer_json_structured(&config, raw),
        (None, false) => answer(&config, &args.to_criteria()),
        (None, true) => answer_structured(&config, &args.to_criteria()),
    };

    println!("{}", output);

    if output.starts_with("Error") {
        error!(action = "exit", component = "cli", "Query failed");
        std::process::exit(1);
    }
    Ok(())
}
