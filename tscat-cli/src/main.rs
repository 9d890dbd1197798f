use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::filter::LevelFilter;

use tscat_cli::{
    config::{Config, SystemEnv, load_config, resolve_locale},
    inputs::{load_catalogs, read_catalogs},
    resolve::{ResolveArgs, Rounding, explain, resolve_message},
    stats::print_stats,
    validate::run_validate,
    view::print_view,
};

#[derive(Parser, Debug)]
#[command(name = "tscat", author, version, about, long_about = None)]
struct Args {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ./tscat.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View the contexts and messages of catalogs.
    View {
        /// Catalog files or glob patterns
        #[arg(short, long, num_args = 1..)]
        input: Vec<String>,

        /// Only show the catalog for this language
        #[arg(short, long)]
        lang: Option<String>,

        /// Display full value without truncation (even in terminal)
        #[arg(long)]
        full: bool,
    },

    /// Count messages by status and report completion.
    Stats {
        /// Catalog files or glob patterns
        #[arg(short, long, num_args = 1..)]
        input: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that catalogs load and lint their plural forms and placeholders.
    Validate {
        /// Catalog files or glob patterns
        #[arg(short, long, num_args = 1..)]
        input: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Fail on lint issues too
        #[arg(long)]
        strict: bool,
    },

    /// Resolve one message through the fallback chain.
    Resolve {
        /// Catalog files or glob patterns (defaults to `catalogs` in the config)
        #[arg(short, long, num_args = 1..)]
        input: Vec<String>,

        /// Locale to resolve for
        #[arg(long)]
        locale: Option<String>,

        /// Context name
        #[arg(long)]
        context: String,

        /// Source text
        #[arg(long)]
        source: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,

        /// Count used to pick a plural form
        #[arg(long)]
        count: Option<f64>,

        /// How a fractional count is rounded
        #[arg(long, value_enum, default_value_t = Rounding::Floor)]
        rounding: Rounding,

        /// Print the outcome and diagnostics to stderr
        #[arg(long)]
        explain: bool,

        /// Values for %1, %2, ...
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Convert a catalog between TS and JSON.
    Convert {
        /// The input file to process
        #[arg(short, long)]
        input: String,
        /// The output file to write the results to
        #[arg(short, long)]
        output: String,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let env = SystemEnv;
    match args.commands {
        Commands::View { input, lang, full } => {
            let inputs = read_catalogs(&input, lang.as_deref())?;
            print_view(&inputs, lang.as_deref(), full)
        }
        Commands::Stats { input, json } => {
            let inputs = read_catalogs(&input, None)?;
            print_stats(&inputs, json)
        }
        Commands::Validate {
            input,
            json,
            strict,
        } => {
            let inputs = load_catalogs(&input)?;
            let summary = run_validate(&inputs, json)?;
            if summary.failed(strict) {
                return Err(format!(
                    "validation failed ({} load failure(s), {} lint issue(s))",
                    summary.load_failures, summary.lint_issues
                ));
            }
            Ok(())
        }
        Commands::Resolve {
            input,
            locale,
            context,
            source,
            comment,
            count,
            rounding,
            explain: show_explanation,
            args: values,
        } => {
            let config: Config = load_config(args.config.as_deref(), &env)?;
            let request = ResolveArgs {
                inputs: input,
                locale: resolve_locale(locale.as_deref(), &config, &env),
                context,
                source,
                comment,
                count,
                rounding,
                args: values,
            };
            let resolution = resolve_message(&request, &config)?;
            println!("{}", resolution.text);
            if show_explanation {
                eprintln!("locale: {}", request.locale);
                for line in explain(&resolution) {
                    eprintln!("{}", line);
                }
            }
            Ok(())
        }
        Commands::Convert { input, output } => {
            tscat::convert(&input, &output).map_err(|e| e.to_string())?;
            println!("✅ Converted {} -> {}", input, output);
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
