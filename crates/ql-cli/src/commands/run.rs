use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

use ql_core::{CampaignState, SessionEnding, SessionResult};
use ql_ledger::{Ledger, SessionRecord};
use ql_rules::{RulesetKind, SrdContent, SrdSummary};
use ql_sim::{
    ActorKind, EpisodePackage, PolicyProfile, RunAnalysis, SessionConfig, SessionEngine,
    analyze_session, summarize_analyses,
};

use crate::loader;

/// Deterministic actor choice.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ActorArg {
    /// Weighted scoring over a policy profile
    Policy,
    /// Fixed rules of thumb
    Heuristic,
}

impl From<ActorArg> for ActorKind {
    fn from(arg: ActorArg) -> Self {
        match arg {
            ActorArg::Policy => ActorKind::Policy,
            ActorArg::Heuristic => ActorKind::Heuristic,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Campaign seed JSON
    #[arg(short, long, default_value = "data/campaign_template.json")]
    campaign: PathBuf,

    /// Replace the campaign's party with this party JSON
    #[arg(long)]
    party_json: Option<PathBuf>,

    /// Turns per session
    #[arg(short, long, default_value = "6")]
    turns: u32,

    /// Seed of the first run; run N uses seed + N - 1
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of sessions to run
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Deterministic actor
    #[arg(long, value_enum, default_value = "policy")]
    actor: ActorArg,

    /// Policy profile JSON for the policy actor
    #[arg(long)]
    policy_json: Option<PathBuf>,

    /// Merged SRD dataset; switches to the extended ruleset
    #[arg(long)]
    srd_json: Option<PathBuf>,

    /// Source text chunks the director may quote
    #[arg(long)]
    source_chunks_json: Option<PathBuf>,

    /// Label recorded with each checkpoint
    #[arg(long, default_value = "default")]
    source_profile: String,

    /// Record each session in the campaign ledger
    #[arg(long)]
    use_ledger: bool,

    /// Continue from the ledger's latest snapshot
    #[arg(long, requires = "use_ledger")]
    resume: bool,

    /// Ledger campaign identifier
    #[arg(long, default_value = "default")]
    campaign_id: String,

    /// Directory holding campaign ledgers
    #[arg(long, default_value = "data/ledger")]
    ledger_dir: PathBuf,

    /// Write an episode package per run under this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the last run's campaign log
    #[arg(long)]
    show_log: bool,

    /// Print a JSON report instead of tables
    #[arg(long)]
    json: bool,
}

/// Everything produced by one run.
struct RunRecord {
    seed: u64,
    result: SessionResult,
    analysis: RunAnalysis,
    checkpoint: Option<SessionRecord>,
    export_dir: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<(), String> {
    let (ruleset, srd) = match &args.srd_json {
        Some(path) => (
            RulesetKind::Extended,
            SrdContent::load(path).map_err(|e| e.to_string())?,
        ),
        None => (RulesetKind::Generic, SrdContent::default()),
    };
    let profile = match &args.policy_json {
        Some(path) => loader::load_policy(path)?,
        None => PolicyProfile::default(),
    };
    let source_chunks = match &args.source_chunks_json {
        Some(path) => loader::load_source_chunks(path)?,
        None => Vec::new(),
    };

    let ledger = if args.use_ledger {
        Some(Ledger::ensure(&args.ledger_dir, &args.campaign_id).map_err(|e| e.to_string())?)
    } else {
        None
    };
    let (base, resumed) = starting_campaign(args, ledger.as_ref())?;

    let config = SessionConfig::default()
        .with_turns(args.turns)
        .with_ruleset(ruleset)
        .with_actor(args.actor.into())
        .with_source_chunks(source_chunks);

    let mut records = Vec::new();
    let mut current = base.clone();
    for index in 0..args.runs {
        let seed = args.seed.wrapping_add(u64::from(index));
        // Without a ledger every run replays the same starting state.
        let start = if ledger.is_some() { current.clone() } else { base.clone() };

        let result = SessionEngine::from_config(&config.clone().with_seed(seed), &srd, profile.clone())
            .run(start, args.turns)
            .map_err(|e| e.to_string())?;

        let checkpoint = match &ledger {
            Some(ledger) => Some(
                ledger
                    .record_session(&result, seed, args.turns, &args.source_profile)
                    .map_err(|e| e.to_string())?,
            ),
            None => None,
        };
        let export_dir = match &args.export_dir {
            Some(root) => Some(export(root, index + 1, seed, &result)?),
            None => None,
        };

        current = result.final_state.clone();
        records.push(RunRecord {
            seed,
            analysis: analyze_session(&result),
            result,
            checkpoint,
            export_dir,
        });
    }

    let srd_summary = args.srd_json.is_some().then(|| srd.summary());
    if args.json {
        print_json(args, ruleset, resumed, srd_summary.as_ref(), &records)
    } else {
        print_report(args, ruleset, resumed, srd_summary.as_ref(), &records);
        Ok(())
    }
}

/// The campaign the first run starts from, and whether it came from a
/// ledger snapshot.
fn starting_campaign(args: &RunArgs, ledger: Option<&Ledger>) -> Result<(CampaignState, bool), String> {
    if args.resume
        && let Some(ledger) = ledger
    {
        if ledger.has_latest_state() {
            let state = ledger.load_latest_state().map_err(|e| e.to_string())?;
            if args.party_json.is_some() {
                tracing::warn!("ignoring --party-json while resuming from a snapshot");
            }
            return Ok((state, true));
        }
        tracing::info!(campaign = %args.campaign_id, "no snapshot yet; starting from the campaign file");
    }

    let mut campaign = loader::load_campaign(&args.campaign)?;
    if let Some(path) = &args.party_json {
        campaign.party = loader::load_party(path)?;
    }
    Ok((campaign, false))
}

fn export(root: &Path, run: u32, seed: u64, result: &SessionResult) -> Result<PathBuf, String> {
    let dir = root.join(format!("run_{run}_seed_{seed}"));
    EpisodePackage::build(result, seed)
        .write_to(&dir)
        .map_err(|e| e.to_string())?;
    Ok(dir)
}

fn print_report(
    args: &RunArgs,
    ruleset: RulesetKind,
    resumed: bool,
    srd: Option<&SrdSummary>,
    records: &[RunRecord],
) {
    let Some(last) = records.last() else {
        return;
    };
    let mode = if resumed { " resumed" } else { "" };
    println!(
        "  {} '{}' {}",
        "Campaign".bold(),
        last.result.setting_name,
        format!(
            "({} run(s), {} turns, seed={}, ruleset={ruleset}, actor={}{mode})",
            records.len(),
            args.turns,
            args.seed,
            ActorKind::from(args.actor),
        )
        .dimmed()
    );
    if let Some(srd) = srd {
        println!(
            "  {} {}",
            "SRD".bold(),
            format!(
                "{} (version {}): {} conditions, {} equipment, {} backgrounds, {} mastery properties",
                srd.source_path, srd.version, srd.conditions, srd.equipment, srd.backgrounds, srd.mastery_properties
            )
            .dimmed()
        );
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Run", "Seed", "Turns", "Ending", "Avg HP", "Stalled", "Clue", "Session"]);
    for (i, r) in records.iter().enumerate() {
        let ending = match r.result.ending {
            SessionEnding::Completed => "completed".green().to_string(),
            SessionEnding::AllDefeated => "all defeated".red().bold().to_string(),
        };
        table.add_row(vec![
            (i + 1).to_string(),
            r.seed.to_string(),
            r.result.total_turns.to_string(),
            ending,
            format!("{:.2}", r.analysis.average_party_hp),
            r.analysis.stalled_turns.to_string(),
            if r.analysis.clue_discovered { "yes" } else { "no" }.to_string(),
            r.checkpoint
                .as_ref()
                .map(|c| c.session_id.clone())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    println!();

    let analyses: Vec<RunAnalysis> = records.iter().map(|r| r.analysis.clone()).collect();
    let summary = summarize_analyses(&analyses);
    println!("  {}", "Summary".bold().underline());
    println!(
        "  TPK rate {:.3}, average final hp {:.2}, average stalled turns {:.2}",
        summary.tpk_rate, summary.avg_final_party_hp, summary.avg_stalled_turns
    );
    for rec in &summary.common_recommendations {
        println!("  {} {} {}", "-".yellow(), rec.recommendation, format!("(x{})", rec.count).dimmed());
    }
    println!();

    println!("  {}", "Final Party".bold().underline());
    let mut party = Table::new();
    party.set_content_arrangement(ContentArrangement::Dynamic);
    party.set_header(vec!["Name", "Class", "Role", "HP"]);
    for member in &last.result.final_state.party {
        let hp = if member.is_active() {
            member.hp.to_string()
        } else {
            "0".red().bold().to_string()
        };
        party.add_row(vec![member.name.clone(), member.char_class.clone(), member.role.clone(), hp]);
    }
    println!("{party}");
    println!();

    for r in records {
        if let Some(dir) = &r.export_dir {
            println!("  {} {}", "Exported".green(), dir.display());
        }
    }

    if args.show_log {
        println!("  {}", "Campaign Log".bold().underline());
        for line in &last.result.final_state.log {
            println!("  {line}");
        }
        println!();
    }
}

fn print_json(
    args: &RunArgs,
    ruleset: RulesetKind,
    resumed: bool,
    srd: Option<&SrdSummary>,
    records: &[RunRecord],
) -> Result<(), String> {
    let analyses: Vec<RunAnalysis> = records.iter().map(|r| r.analysis.clone()).collect();
    let checkpoints: Vec<&SessionRecord> = records.iter().filter_map(|r| r.checkpoint.as_ref()).collect();
    let exports: Vec<String> = records
        .iter()
        .filter_map(|r| r.export_dir.as_ref())
        .map(|d| d.display().to_string())
        .collect();

    let payload = json!({
        "run_count": records.len(),
        "seed": args.seed,
        "turns": args.turns,
        "ruleset": ruleset.to_string(),
        "srd_summary": srd,
        "actor": ActorKind::from(args.actor).to_string(),
        "use_ledger": args.use_ledger,
        "campaign_id": args.use_ledger.then_some(&args.campaign_id),
        "resumed_from_checkpoint": resumed,
        "summary": summarize_analyses(&analyses),
        "analyses": analyses,
        "last_run": records.last().map(|r| &r.result),
        "checkpoints": checkpoints,
        "exports": exports,
    });
    let text = serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
