//! `konsut-inspect SESSION_JSON LOCATION [--maintenance]`
//!
//! Evaluates a stored session against a location and prints the verdict,
//! its explanation and the sidebar the session would see. `SESSION_JSON` may
//! be `-` for "no session". Without `--maintenance` the flag is read from
//! the store configured by `KONSUT_FLAGS_PATH`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::Serialize;

use konsut_auth::{
    AccessExplanation, User, Verdict, VisibleSection, evaluate, explain_access, visible_sections,
};
use konsut_guard::{GuardConfig, maintenance_active};

#[derive(Debug, PartialEq, Eq)]
struct Args {
    session: Option<PathBuf>,
    location: String,
    maintenance: Option<bool>,
}

#[derive(Serialize)]
struct Report {
    verdict: Verdict,
    explanation: AccessExplanation,
    sidebar: Vec<VisibleSection>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut positional = Vec::new();
    let mut maintenance = None;

    for arg in args {
        match arg.as_str() {
            "--maintenance" => maintenance = Some(true),
            "--no-maintenance" => maintenance = Some(false),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let [session, location]: [String; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!("usage: konsut-inspect SESSION_JSON LOCATION [--maintenance]"))?;

    Ok(Args {
        session: (session != "-").then(|| PathBuf::from(session)),
        location,
        maintenance,
    })
}

fn load_session(path: &Path) -> Result<Option<User>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading session file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decoding session file {}", path.display()))
}

fn run(args: Args) -> Result<Report> {
    let user = match &args.session {
        Some(path) => load_session(path)?,
        None => None,
    };

    let maintenance = match args.maintenance {
        Some(on) => on,
        None => {
            let config = GuardConfig::from_env().context("loading guard configuration")?;
            maintenance_active(&config.flag_store(), &config.maintenance_key)
        }
    };

    let verdict = evaluate(user.as_ref(), &args.location, maintenance);
    let explanation = explain_access(user.as_ref(), &args.location, maintenance, Utc::now());
    tracing::info!(
        location = %args.location,
        granted = explanation.granted,
        rule = ?explanation.rule,
        "access evaluated"
    );

    Ok(Report {
        verdict,
        explanation,
        sidebar: visible_sections(user.as_ref()),
    })
}

fn main() -> Result<()> {
    konsut_observability::init();

    let args = parse_args(std::env::args().skip(1))?;
    let report = run(args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
