use clap::Parser;

use truth_table::{Engine, EngineConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Propositional expression, e.g. "(A -> B) <-> (not B -> not A)".
    #[arg(value_name = "EXPR")]
    expression: String,

    /// Maximum number of distinct variables.
    #[clap(long, value_name = "INT", default_value = "20")]
    max_variables: usize,

    /// Maximum number of tokens after rewriting `->` and `<->`.
    #[clap(long, value_name = "INT", default_value_t = truth_table::token::MAX_TOKENS)]
    max_tokens: usize,

    /// Evaluate rows in parallel (requires the `parallel` feature).
    #[clap(long)]
    parallel: bool,

    /// Print the table as JSON.
    #[clap(long)]
    json: bool,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let engine = Engine::new(EngineConfig {
        max_variables: args.max_variables,
        parallel: args.parallel,
        max_tokens: args.max_tokens,
        ..EngineConfig::default()
    });

    let time_total = std::time::Instant::now();
    let program = engine.parse(&args.expression)?;
    log::info!("postfix: {}", program);

    let table = engine.truth_table(&args.expression)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", table);
        println!();
        if table.is_tautology() {
            println!("tautology");
        } else if table.is_contradiction() {
            println!("contradiction");
        } else {
            println!("satisfiable in {} of {} rows", table.count_satisfying(), table.len());
        }
    }

    log::info!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
