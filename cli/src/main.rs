mod error_formatter;
mod formatter;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use error_formatter::ExpressionFailure;
use formatter::Formatter;
use formula::evaluator::datetime::parse_date;
use formula::{Engine, Value, Variables};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formula")]
#[command(about = "Evaluate typed formulas from the command line.")]
#[command(
    long_about = "Formula compiles expressions such as `$price * 2 > 10 ? \"high\" : \"low\"` to RPN and evaluates them.\nThe CLI evaluates an expression with variable bindings, shows its tokens and RPN, and lists the built-in functions."
)]
#[command(version)]
struct Cli {
    /// Log pipeline events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print its value
    ///
    /// Variables are bound with NAME=VALUE pairs. Values are read as a number,
    /// a boolean, a date (YYYY-MM-DD or RFC 3339) or otherwise as text.
    Eval {
        /// The expression to evaluate
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Variable bindings (format: name=value)
        ///
        /// Examples: x=10, flag=true, start=2024-01-31, name=Ada
        variables: Vec<String>,
        /// Print the full calculation result as JSON
        #[arg(short, long)]
        json: bool,
        /// Print the expression tree with the value of every evaluated node
        #[arg(short, long)]
        ast: bool,
    },
    /// Show the tokens and the RPN of an expression
    Tokens {
        /// The expression to tokenize
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// List the registered functions and their signatures
    Functions,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Eval {
            expression,
            variables,
            json,
            ast,
        } => eval_command(expression, variables, *json, *ast),
        Commands::Tokens { expression } => tokens_command(expression),
        Commands::Functions => functions_command(),
    };

    if let Err(e) = result {
        if let Some(failure) = e.downcast_ref::<ExpressionFailure>() {
            eprintln!("{}", error_formatter::format_error(failure));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn eval_command(expression: &str, bindings: &[String], json: bool, ast: bool) -> Result<()> {
    let variables = parse_variables(bindings)?;
    tracing::debug!(bindings = variables.len(), "parsed variable bindings");
    let engine = Engine::new();
    let formatter = Formatter::default();

    let compiled = match engine.compile(expression) {
        Ok(compiled) => compiled,
        Err(error) if json => {
            let result = engine.calculate_with(expression, &variables);
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Err(ExpressionFailure::new(expression, error).into());
        }
        Err(error) => return Err(ExpressionFailure::new(expression, error).into()),
    };
    let result = compiled.calculate(Some(&variables));

    if json {
        let output = if ast {
            let tree = compiled.ast(Some(&variables)).ok();
            serde_json::json!({ "result": result, "ast": tree })
        } else {
            serde_json::to_value(&result)?
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if ast {
        if let Ok(tree) = compiled.ast(Some(&variables)) {
            print!("{}", formatter.format_ast(&tree));
        }
    }

    let value = result
        .into_result()
        .map_err(|error| ExpressionFailure::new(expression, error))?;
    if !json {
        println!("{}", formatter.format_value(&value));
    }
    Ok(())
}

fn tokens_command(expression: &str) -> Result<()> {
    let engine = Engine::new();
    let compiled = engine
        .compile(expression)
        .map_err(|error| ExpressionFailure::new(expression, error))?;

    let formatter = Formatter::default();
    print!(
        "{}",
        formatter.format_tokens(compiled.tokens(), compiled.rpn())
    );
    Ok(())
}

fn functions_command() -> Result<()> {
    let engine = Engine::new();
    let formatter = Formatter::default();
    print!("{}", formatter.format_functions(engine.environment()));
    Ok(())
}

/// Parse `name=value` bindings into caller variables
fn parse_variables(bindings: &[String]) -> Result<Variables> {
    let mut variables = Variables::new();
    for binding in bindings {
        let (name, raw) = binding
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid variable binding '{}', expected NAME=VALUE", binding))?;
        let name = name.trim().trim_start_matches('$');
        if name.is_empty() {
            return Err(anyhow!("Variable binding '{}' has no name", binding));
        }
        variables.insert(name.to_string(), parse_value(raw.trim()));
    }
    Ok(variables)
}

fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => {
            if let Ok(n) = raw.parse::<f64>() {
                Value::Number(n)
            } else if let Some(date) = parse_date(raw) {
                Value::Date(date)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_kinds() {
        assert_eq!(parse_value("2.5"), Value::Number(2.5));
        assert_eq!(parse_value("-3"), Value::Number(-3.0));
        assert_eq!(parse_value("true"), Value::Boolean(true));
        assert!(matches!(parse_value("2024-01-31"), Value::Date(_)));
        assert!(matches!(
            parse_value("2024-01-31T08:00:00+01:00"),
            Value::Date(_)
        ));
        assert_eq!(parse_value("Ada"), Value::from("Ada"));
    }

    #[test]
    fn test_parse_variables() {
        let vars = parse_variables(&["$x=1".to_string(), "name = Ada".to_string()]).unwrap();
        assert_eq!(vars.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(vars.get("name"), Some(&Value::from("Ada")));

        assert!(parse_variables(&["oops".to_string()]).is_err());
        assert!(parse_variables(&["=1".to_string()]).is_err());
    }
}
