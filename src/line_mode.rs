use std::io::{self, Write};

use anyhow::Result;
use rpncalc::calc_engine::format_expression;
use rpncalc::config::Config;
use rpncalc::display::{format_number, split_details};
use rpncalc::session::{split_assignment, Entry, Session, VariableSource};
use termion::{color, input::TermRead, style};

fn read_input() -> io::Result<Option<String>> {
    // Stdin has an inherent read_line, so call the termion one explicitly
    TermRead::read_line(&mut io::stdin())
}

/// Asks on the terminal for each unbound variable, like the prompt-per-
/// variable flow of a classic console calculator.
struct TerminalPrompter;

impl VariableSource for TerminalPrompter {
    fn value_for(&mut self, name: &str) -> io::Result<f64> {
        loop {
            print!("  Value for {}{}{}: ", style::Bold, name, style::Reset);
            io::stdout().flush()?;

            let line = read_input()?
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))?;
            match line.trim().parse::<f64>() {
                Ok(value) => return Ok(value),
                Err(_) => println!("  Invalid number, please try again"),
            }
        }
    }
}

fn print_help() {
    println!("Operators: + - * / ^ (^ groups right: 2^3^2 = 512)");
    println!("Functions: sin(x), cos(x), sqrt(x), angles in radians");
    println!("Variables: unknown names are asked for before evaluation");
    println!("Commands:  name = expr, vars, clear, details <expr>, help, quit");
}

fn print_error(input: &str, error: &dyn std::fmt::Display) {
    println!(
        "  {} = {}Error: {}{}\n",
        input,
        color::Fg(color::Red),
        error,
        color::Fg(color::Reset)
    );
}

fn print_entry(entry: &Entry) {
    match entry {
        Entry::Assignment { name, value } => {
            println!("  {} = {}\n", name, format_number(*value));
        }
        Entry::Listing(bindings) => {
            if bindings.is_empty() {
                println!("  no variables bound");
            }
            for (name, value) in bindings {
                println!("  {} = {}", name, format_number(*value));
            }
            println!();
        }
        Entry::Evaluation(eval) => {
            let shown = format_expression(&eval.expression).unwrap_or_else(|_| eval.expression.clone());
            println!(
                "  {} = {}{}{}",
                shown,
                color::Fg(color::Green),
                format_number(eval.value),
                color::Fg(color::Reset)
            );

            if let Some(postfix) = &eval.postfix {
                println!("  RPN: {}", postfix);
                for (i, step) in eval.steps.iter().enumerate() {
                    println!("  Step {}: {} = {}", i + 1, step.operation, format_number(step.result));
                }
            }
            for name in &eval.defaulted {
                println!(
                    "  {}warning:{} '{}' is unbound, using 0",
                    color::Fg(color::Yellow),
                    color::Fg(color::Reset),
                    name
                );
            }
            println!();
        }
    }
}

pub fn run_line(config: &Config) -> Result<()> {
    println!("Rust Console Calculator");
    print_help();
    println!();

    let mut session = Session::new();
    let mut prompter = TerminalPrompter;

    loop {
        print!("Expression: ");
        io::stdout().flush()?;

        let Some(line) = read_input()? else {
            println!();
            return Ok(());
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                return Ok(());
            }
            "clear" | "reset" => {
                session.clear();
                println!("Variables cleared\n");
                continue;
            }
            "vars" => {
                print_entry(&session.listing());
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        let (details, expression) = split_details(input);
        if expression.is_empty() {
            println!("Please enter a valid expression after 'details'");
            continue;
        }

        let target = split_assignment(expression).map_or(expression, |(_, rhs)| rhs);
        if let Err(e) = session.resolve(target, &mut prompter) {
            print_error(expression, &e);
            continue;
        }

        match session.run(expression, details || config.details) {
            Ok(entry) => print_entry(&entry),
            Err(e) => print_error(expression, &e),
        }
    }
}
