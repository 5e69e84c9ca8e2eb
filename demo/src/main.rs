//! vitasim — Virtual Patient Demo CLI
//!
//! Runs one simulated case with compressed time: a manual clock is
//! advanced one second per tick as fast as the loop runs, so a 30-minute
//! clinical course finishes in well under a second of wall-clock time.
//! Partway through the run the demo orders the lab most relevant to the
//! current phase and starts the scenario's first-line treatment, so every
//! part of the pipeline is exercised: trending, transitions, order
//! fulfillment, the intervention coin flip, and the timeline chain.
//!
//! Usage:
//!   cargo run -p demo -- list
//!   cargo run -p demo -- run
//!   cargo run -p demo -- run --scenario ami_inferior_wall --minutes 45 --seed 7

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vitasim_contracts::error::SimResult;
use vitasim_contracts::lab::{LabStatus, LabValue};
use vitasim_contracts::medication::MedicationOrder;
use vitasim_contracts::scenario::ScenarioCatalog;
use vitasim_core::traits::ManualClock;
use vitasim_core::{SessionConfig, SimulationSession};
use vitasim_policy::KeywordPolicy;
use vitasim_scenarios::builtin_catalog;
use vitasim_store::InMemoryStateStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// vitasim — virtual patient simulation demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "vitasim virtual patient demo",
    long_about = "Runs a compressed virtual patient case: vitals trend through the\n\
                  scenario's phases, a lab order completes asynchronously, and a\n\
                  matching medication can short-circuit the course into recovery."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in disease scenarios.
    List,
    /// Run one simulated case with compressed time.
    Run {
        /// Scenario id to run. Omit for a random pick.
        #[arg(long)]
        scenario: Option<String>,
        /// Simulated minutes to run.
        #[arg(long, default_value_t = 30)]
        minutes: u64,
        /// RNG seed for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging. Set RUST_LOG=debug for per-tick detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::List => {
            list_scenarios();
            Ok(())
        }
        Command::Run { scenario, minutes, seed } => run_case(scenario.as_deref(), minutes, seed),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario listing ──────────────────────────────────────────────────────────

fn list_scenarios() {
    println!();
    println!("Built-in scenarios:");
    for scenario in builtin_catalog().all() {
        println!(
            "  {:24} {:?}  {} ({} phases)",
            scenario.id,
            scenario.difficulty,
            scenario.name,
            scenario.phases.len()
        );
    }
    println!();
}

// ── Case runner ───────────────────────────────────────────────────────────────

fn run_case(scenario_id: Option<&str>, minutes: u64, seed: Option<u64>) -> SimResult<()> {
    let catalog = Arc::new(builtin_catalog());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let config = SessionConfig { auto_tick: false, rng_seed: seed, ..SessionConfig::default() };

    let session = SimulationSession::new(
        catalog.clone(),
        Box::new(KeywordPolicy::default()),
        Box::new(InMemoryStateStore::new()),
        clock.clone(),
        config,
    );

    let state = session.generate_new_case(scenario_id)?;
    let scenario_id = state.scenario_id.clone();
    let scenario_name = catalog
        .get(&scenario_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| scenario_id.clone());

    println!();
    println!("vitasim — Virtual Patient Demo");
    println!("==============================");
    println!();
    println!("  Scenariusz:  {scenario_name}");
    println!(
        "  Pacjent:     {}, {} lat",
        state.demographics.name, state.demographics.age
    );
    println!("  Rozpoznanie: {}", state.condition);
    println!();

    // Narrate phase changes as the broadcaster reports them.
    let last_phase = Arc::new(Mutex::new(state.current_phase));
    let narrate = last_phase.clone();
    session.subscribe(move |snapshot| {
        if let Some(snapshot) = snapshot {
            let mut last = narrate.lock().expect("narration lock poisoned");
            if *last != snapshot.current_phase {
                println!("  >> Zmiana fazy: {} -> {}", last, snapshot.current_phase);
                *last = snapshot.current_phase;
            }
        }
    });

    let total_secs = minutes * 60;
    let order_at = total_secs * 11 / 20;
    let treat_at = total_secs * 3 / 4;

    for elapsed in 1..=total_secs {
        clock.advance(Duration::seconds(1));
        session.tick();

        if elapsed == order_at {
            order_relevant_lab(&session, &catalog);
        }
        if elapsed == treat_at {
            start_treatment(&session, &scenario_id)?;
        }
        if elapsed % 300 == 0 {
            print_vitals_line(&session, elapsed);
        }
    }

    print_summary(&session);
    Ok(())
}

/// Order the first abnormality-bearing test of the current phase, falling
/// back to a routine panel when the phase defines none.
fn order_relevant_lab(session: &SimulationSession, catalog: &ScenarioCatalog) {
    let Some(state) = session.get_current_state() else { return };
    let test_name = catalog
        .get(&state.scenario_id)
        .and_then(|s| s.phase(state.current_phase))
        .and_then(|p| p.lab_abnormalities.first())
        .map(|a| a.test_name.clone())
        .unwrap_or_else(|| "Morfologia".to_string());

    println!("  >> Zlecenie badania: {test_name}");
    if let Err(e) = session.order_lab(&test_name) {
        eprintln!("  !! nie udało się zlecić badania: {e}");
    }
}

/// Start the scenario's first-line treatment.
fn start_treatment(session: &SimulationSession, scenario_id: &str) -> SimResult<()> {
    let order = match scenario_id {
        "ami_inferior_wall" => MedicationOrder {
            name: "Aspirina".to_string(),
            dosage: "300mg".to_string(),
            route: "PO".to_string(),
        },
        "sepsis_pneumonia" => MedicationOrder {
            name: "Ceftriakson".to_string(),
            dosage: "2g".to_string(),
            route: "IV".to_string(),
        },
        "dka_new_onset" => MedicationOrder {
            name: "Insulina".to_string(),
            dosage: "10j".to_string(),
            route: "IV".to_string(),
        },
        _ => MedicationOrder {
            name: "Adrenalina".to_string(),
            dosage: "0.5mg".to_string(),
            route: "IM".to_string(),
        },
    };

    println!("  >> Podanie leku: {} {} {}", order.name, order.dosage, order.route);
    session.prescribe_medication(order)
}

fn print_vitals_line(session: &SimulationSession, elapsed_secs: u64) {
    let Some(state) = session.get_current_state() else { return };
    let v = &state.vitals;
    println!(
        "  [{:>3} min] {:12} HR {:>5.1}  RR {:>4.1}  BP {:>5.1}/{:<5.1}  SpO2 {:>5.1}%  T {:>4.1}C",
        elapsed_secs / 60,
        state.current_phase.as_str(),
        v.heart_rate,
        v.respiratory_rate,
        v.systolic_bp,
        v.diastolic_bp,
        v.oxygen_saturation,
        v.temperature,
    );
}

fn print_summary(session: &SimulationSession) {
    let Some(state) = session.get_current_state() else {
        println!("  (brak aktywnego przypadku)");
        return;
    };

    println!();
    println!("  Przebieg zakończony. Faza końcowa: {}", state.current_phase);
    println!("  Punkty: {}", state.score);
    println!();

    println!("  Wyniki badań:");
    if state.lab_results.is_empty() {
        println!("    (nie zlecono badań)");
    }
    for lab in &state.lab_results {
        let status = match lab.status {
            LabStatus::Ordered => "oczekuje",
            LabStatus::Completed => "gotowy",
        };
        let value = match &lab.value {
            LabValue::Number(n) => format!("{n} {}", lab.unit),
            LabValue::Text(t) => t.clone(),
        };
        println!(
            "    {:24} {:8} {}{}",
            lab.test_name,
            status,
            value,
            if lab.is_abnormal { "  [NIEPRAWIDŁOWY]" } else { "" }
        );
    }
    println!();

    println!("  Alerty:");
    for alert in &state.alerts {
        println!("    [{:?}] {}", alert.severity, alert.message);
    }
    println!();

    println!("  Oś czasu ({} wpisów):", state.timeline.len());
    for entry in &state.timeline {
        println!(
            "    #{:<3} {:12} [{}] {}",
            entry.sequence,
            entry.kind.as_str(),
            entry.performer.as_str(),
            entry.description
        );
    }
    println!();

    let chain_ok = vitasim_journal::verify_chain(&state.timeline);
    println!(
        "  Integralność osi czasu: {}",
        if chain_ok { "ZWERYFIKOWANA" } else { "NARUSZONA" }
    );
    println!();
}
