use clap::Parser;
use onedice::{Config, Int, OneDice, Outcome, RollError, Variables};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "onedice", version, about = "Roll OneDice expressions")]
struct Cli {
    /// Expression to roll once; starts an interactive session when omitted
    expr: Option<String>,

    /// Seed for the random source, for reproducible rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Faces of a `d` written without a right operand
    #[arg(short, long, default_value_t = onedice::common::DEFAULT_FACES)]
    faces: Int,

    /// Variable available as {NAME}. Repeatable.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, Int)>,
}

fn parse_var(s: &str) -> Result<(String, Int), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found {:?}", s))?;
    let value = value.trim().parse().map_err(|e| format!("{}: {}", value, e))?;
    Ok((name.trim().to_owned(), value))
}

struct Session {
    rng: StdRng,
    config: Config,
    vars: Variables,
}

impl Session {
    fn roll(&mut self, expr: &str) -> Result<Outcome, RollError> {
        let mut dice = OneDice::new(expr, self.vars.clone())
            .with_config(self.config)
            .with_roller(&mut self.rng);
        dice.roll()
    }

    fn print(&mut self, expr: &str) {
        match self.roll(expr) {
            Ok(out) => {
                let meta: Vec<_> = out.meta.iter().map(ToString::to_string).collect();
                println!("Value: {}", out.value);
                println!("Meta: [{}]", meta.join(", "));
                println!("Detail: {}", out.detail);
            }
            Err(why) => eprintln!("Error: {}", why),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut session = Session {
        rng: match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        },
        config: Config::with_default_faces(cli.faces),
        vars: cli.vars.into_iter().collect(),
    };

    if let Some(expr) = cli.expr {
        session.print(&expr);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut history: Vec<String> = Vec::new();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }
        if !line.is_empty() {
            if history.last().map(String::as_str) != Some(line) {
                history.push(line.to_owned());
            }
            session.print(line);
        }
        print!("> ");
        io::stdout().flush()?;
    }

    if !history.is_empty() {
        println!();
        println!("History:");
        for (i, expr) in history.iter().enumerate() {
            println!("{:>4}  {}", i + 1, expr);
        }
    }
    Ok(())
}
