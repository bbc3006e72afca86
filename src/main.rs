use clap::{Parser, Subcommand};

mod cmd;
mod core;
mod utils;

#[derive(Parser, Debug)]
#[command(
    name = "salc",
    version,
    author,
    about = "Calculate Shanghai take-home salary under cumulative income tax withholding"
)]
struct Opts {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Month-by-month take-home table with annual totals
    Calc(cmd::calc::CalcCommand),
    /// Annual totals, contributions and breakdown
    Summary(cmd::summary::SummaryCommand),
    /// Generate an HTML report with charts
    Html(cmd::html_report::HtmlCommand),
    /// Annual totals for many scenarios from a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Show contribution limits, rates and tax brackets
    Policy(cmd::policy::PolicyCommand),
    /// Print input/output formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Html(html) => html.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Policy(policy) => policy.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}

/// RUST_LOG takes precedence over -v
fn init_logging(verbose: u8) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = match verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            };
            builder.parse_filters(level);
        }
    }
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
