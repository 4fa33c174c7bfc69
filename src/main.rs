//! csskata - CSS challenges checked against a rendered preview

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use csskata::challenge::{Catalog, Challenge};
use csskata::dom::PseudoElement;
use csskata::preview::{PreviewRenderer, RenderedDocument};
use csskata::verify::{
    RuleCache, Source, Target, VerifiedTask, Verifier, extract_value, percent_completed,
};

#[derive(Parser)]
#[command(name = "csskata")]
#[command(version, about = "CSS challenges with automated style checks", long_about = None)]
#[command(after_help = "EXAMPLES:
    csskata list                          List challenges
    csskata check snowman my.css          Check styles against a challenge
    csskata inspect snowman .ball width   Show what the checker sees")]
struct Cli {
    /// Directory of extra challenge JSON files
    #[arg(long, value_name = "DIR", global = true)]
    catalog: Option<PathBuf>,

    /// Log progress (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available challenges
    List,

    /// Show a challenge's introduction, starting styles and tasks
    Show { slug: String },

    /// Verify styles against a challenge's tasks
    Check {
        slug: String,

        /// Stylesheet to check (defaults to the starting styles)
        #[arg(value_name = "STYLES")]
        styles: Option<PathBuf>,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Print the computed and authored value of a property
    Inspect {
        slug: String,
        selector: String,
        property: String,

        /// Inspect a pseudo-element (::before or ::after)
        #[arg(long, value_parser = parse_pseudo)]
        pseudo: Option<PseudoElement>,

        /// Stylesheet to render (defaults to the starting styles)
        #[arg(long, value_name = "FILE")]
        styles: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    challenge: &'a str,
    percent_completed: u32,
    tasks: Vec<VerifiedTask>,
}

fn parse_pseudo(text: &str) -> Result<PseudoElement, String> {
    PseudoElement::parse(text).ok_or_else(|| format!("unsupported pseudo-element `{text}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let mut catalog = Catalog::builtin().map_err(|e| e.to_string())?;
    if let Some(dir) = &cli.catalog {
        catalog.load_dir(dir).map_err(|e| e.to_string())?;
    }

    match cli.command {
        Command::List => {
            for challenge in catalog.iter() {
                println!(
                    "{:<32} {} ({} tasks)",
                    challenge.slug,
                    challenge.title,
                    challenge.tasks.len()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { slug } => {
            let challenge = catalog.get(&slug).map_err(|e| e.to_string())?;
            show(challenge);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { slug, styles, json } => {
            let challenge = catalog.get(&slug).map_err(|e| e.to_string())?;
            let styles = read_styles(challenge, styles.as_deref())?;
            check(challenge, &styles, json)
        }
        Command::Inspect {
            slug,
            selector,
            property,
            pseudo,
            styles,
        } => {
            let challenge = catalog.get(&slug).map_err(|e| e.to_string())?;
            let styles = read_styles(challenge, styles.as_deref())?;
            inspect(challenge, &styles, &selector, &property, pseudo)
        }
    }
}

fn read_styles(challenge: &Challenge, path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display())),
        None => Ok(challenge.starting_styles.clone()),
    }
}

fn show(challenge: &Challenge) {
    println!("{}", challenge.title);
    if !challenge.intro.is_empty() {
        println!("\n{}", challenge.intro);
    }
    println!("\nStarting styles:\n{}", challenge.starting_styles.trim_end());
    if !challenge.tasks.is_empty() {
        println!("\nTasks:");
        for (i, task) in challenge.tasks.iter().enumerate() {
            println!("  {}. {}", i + 1, task.text);
            for requirement in task.requirement.requirements() {
                println!("       {requirement}");
            }
        }
    }
}

fn check(challenge: &Challenge, styles: &str, json: bool) -> Result<ExitCode, String> {
    let document = PreviewRenderer::default().render(&challenge.markup, styles);
    let tasks = Verifier::new().verify_tasks(Some(&document), &challenge.tasks);
    let percent = percent_completed(&tasks);
    let all_done = tasks.iter().all(|t| t.completed);

    if json {
        let report = Report {
            challenge: &challenge.slug,
            percent_completed: percent,
            tasks,
        };
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        for task in &tasks {
            let mark = if task.completed { "✔" } else { "✘" };
            println!("{mark} {}", task.task.text);
        }
        println!("\n{percent}% complete");
    }

    Ok(if all_done {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn inspect(
    challenge: &Challenge,
    styles: &str,
    selector: &str,
    property: &str,
    pseudo: Option<PseudoElement>,
) -> Result<ExitCode, String> {
    let document = PreviewRenderer::default().render(&challenge.markup, styles);
    let element = document
        .query_selector(selector)
        .ok_or_else(|| format!("no element matches `{selector}`"))?;

    let mut cache = RuleCache::new();
    let mut target = Target::new(selector, property);
    target.pseudo = pseudo;
    let computed = extract_value(&document, &mut cache, &target, element);
    target.source = Source::Exact;
    let authored = extract_value(&document, &mut cache, &target, element);

    let shown = |value: &str| {
        if value.is_empty() {
            "(none)".to_string()
        } else {
            value.to_string()
        }
    };
    println!("computed: {}", shown(&computed));
    println!("authored: {}", shown(&authored));
    Ok(ExitCode::SUCCESS)
}
