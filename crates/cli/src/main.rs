use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use triage_core::{
    config::password_iterations_from_env_value, evaluation::score_vector, AccountService,
    CoreConfig, DiscardSink, EvaluationOutcome, EvaluationSink, EvaluationStore, Evaluator,
    PatientMetadata, Symptom, SymptomVector, SyntheticClassifier, DEFAULT_DATA_DIR,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom intake and triage CLI")]
struct Cli {
    /// Data directory (defaults to TRIAGE_DATA_DIR, then "triage_data")
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List symptom keys and labels in vector order
    Symptoms,
    /// Rank conditions and triage a set of selected symptoms
    Evaluate {
        /// Selected symptom keys, e.g. fiebre tos
        keys: Vec<String>,
        #[arg(long, default_value = "")]
        name: String,
        /// Age in years; non-numeric values are ignored
        #[arg(long)]
        age: Option<String>,
        #[arg(long, default_value = "")]
        identity: String,
        #[arg(long, default_value = "")]
        history: String,
        /// Do not store the evaluation
        #[arg(long)]
        no_record: bool,
    },
    /// Score a raw 16-character bit vector such as 1100000000000001
    Vector { bits: String },
    /// List stored evaluations, newest first
    Records,
    /// Register an account
    Register { email: String, password: String },
}

fn load_config(data_dir: Option<PathBuf>) -> anyhow::Result<Arc<CoreConfig>> {
    let data_dir = data_dir
        .or_else(|| std::env::var("TRIAGE_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let iterations =
        password_iterations_from_env_value(std::env::var("TRIAGE_PASSWORD_ITERATIONS").ok())?;
    Ok(Arc::new(CoreConfig::new(data_dir, iterations)?))
}

fn print_outcome(outcome: &EvaluationOutcome) {
    if outcome.selected_labels.is_empty() {
        println!("Selected: (none)");
    } else {
        println!("Selected: {}", outcome.selected_labels.join(", "));
    }
    for (position, ranked) in outcome.ranking.iter().enumerate() {
        println!("  {}. {:<28} {:>3}%", position + 1, ranked.label(), ranked.percent);
    }
    println!(
        "Triage: {} ({} red flags): {}",
        outcome.triage_level, outcome.red_flags, outcome.triage_message
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("triage=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Symptoms => {
            for symptom in Symptom::ALL {
                println!("{:<16} {}", symptom.key(), symptom.label());
            }
        }
        Commands::Evaluate {
            keys,
            name,
            age,
            identity,
            history,
            no_record,
        } => {
            for key in keys.iter().filter(|k| Symptom::from_key(k).is_none()) {
                eprintln!("Ignoring unknown symptom key: {key}");
            }

            let sink: Arc<dyn EvaluationSink> = if no_record {
                Arc::new(DiscardSink)
            } else {
                let cfg = load_config(cli.data_dir)?;
                cfg.ensure_data_dir()?;
                Arc::new(EvaluationStore::new(cfg))
            };
            let evaluator = Evaluator::new(Arc::new(SyntheticClassifier::pretrained()), sink);
            let patient = PatientMetadata::from_form(name, age.as_deref(), identity, history);
            print_outcome(&evaluator.evaluate(&keys, patient, None));
        }
        Commands::Vector { bits } => {
            let vector: SymptomVector = bits.parse().context("invalid symptom vector")?;
            print_outcome(&score_vector(&SyntheticClassifier::pretrained(), &vector));
        }
        Commands::Records => {
            let store = EvaluationStore::new(load_config(cli.data_dir)?);
            let records = store.list(None);
            if records.is_empty() {
                println!("No evaluations found.");
            }
            for record in records {
                let top = record
                    .top_diagnosis
                    .as_ref()
                    .map(|d| format!("{} {}%", d.label, d.percent))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{}  {}  {:<6}  {}  {}",
                    record.id,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.triage_level.to_string(),
                    top,
                    record.patient.name
                );
            }
        }
        Commands::Register { email, password } => {
            let cfg = load_config(cli.data_dir)?;
            cfg.ensure_data_dir()?;
            let account = AccountService::new(cfg).register(&email, &password, &password)?;
            println!("Registered {} ({})", account.email, account.id);
        }
    }

    Ok(())
}
