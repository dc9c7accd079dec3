mod logging;

#[cfg(all(feature = "line", not(feature = "tui")))]
mod line_mode;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{bail, Result};
use rpncalc::config::Config;
use rpncalc::display::{format_number, split_details};
use rpncalc::session::{split_assignment, Entry, Session};
use tracing::info;

const USAGE: &str = "usage: rpncalc \"<expression>\" [name=value ...]";

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        info!("starting interactive mode");
        return run_interactive(&config);
    }

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    run_once(&config, &args)
}

/// One-shot mode: `name=value` arguments are bound first, everything else
/// is joined into the expression.
fn run_once(config: &Config, args: &[String]) -> Result<()> {
    let mut session = Session::new();
    let mut expression = Vec::new();

    for arg in args {
        if split_assignment(arg).is_some() {
            session.run(arg, false)?;
        } else {
            expression.push(arg.as_str());
        }
    }

    if expression.is_empty() {
        bail!("no expression given\n{}", USAGE);
    }

    let joined = expression.join(" ");
    let (details, input) = split_details(&joined);

    match session.run(input, details || config.details)? {
        Entry::Evaluation(eval) => {
            for name in &eval.defaulted {
                eprintln!("warning: '{}' is unbound, using 0", name);
            }
            if let Some(postfix) = &eval.postfix {
                println!("RPN: {}", postfix);
                for (i, step) in eval.steps.iter().enumerate() {
                    println!("Step {}: {} = {}", i + 1, step.operation, format_number(step.result));
                }
            }
            println!("{}", format_number(eval.value));
        }
        Entry::Assignment { name, value } => println!("{} = {}", name, format_number(value)),
        Entry::Listing(bindings) => {
            for (name, value) in bindings {
                println!("{} = {}", name, format_number(value));
            }
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive(config: &Config) -> Result<()> {
    tui_mode::run_tui(config)
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run_interactive(config: &Config) -> Result<()> {
    line_mode::run_line(config)
}

#[cfg(not(any(feature = "tui", feature = "line")))]
fn run_interactive(_config: &Config) -> Result<()> {
    bail!("built without an interactive mode\n{}", USAGE)
}
