//! Command orchestration.
//!
//! Resolves the list of hosts (explicit address, filtered search or random
//! picks), then either prints them or probes each one in its own task and
//! prints results as they come in.

use std::io::Write;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::Config;
use crate::error::AppError;
use crate::probe::{check_ctrl_alt_del, ProbeOptions, SessionConnector, Target, VncConnector};
use crate::search::{search_filter, search_random, SearchFilter, VncSource};
use crate::services::resolver::ResolverClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeMode {
    /// Only list hosts.
    Off,
    /// Probe every host found by the search.
    SearchResults,
    /// Probe one given address; no search is made.
    Address(Target),
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub filter: SearchFilter,
    pub count: usize,
    pub probe: ProbeMode,
    pub show_failed: bool,
    pub options: ProbeOptions,
}

/// Outcome counts of a probing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

/// Run against the live resolver API and real VNC servers, writing to stdout.
pub async fn run(request: RunRequest, config: &Config) -> Result<(), AppError> {
    let source = ResolverClient::from_config(config)?;
    let connector: Arc<dyn SessionConnector> = Arc::new(VncConnector::new());
    let mut stdout = std::io::stdout();

    execute(&request, &source, connector, &mut stdout).await
}

/// Run with an explicit source, connector and output. Extracted for testability.
pub async fn execute<S, W>(
    request: &RunRequest,
    source: &S,
    connector: Arc<dyn SessionConnector>,
    out: &mut W,
) -> Result<(), AppError>
where
    S: VncSource + Sync + ?Sized,
    W: Write,
{
    let targets = resolve_targets(source, request).await?;

    if request.probe == ProbeMode::Off {
        for target in &targets {
            writeln!(out, "{}", target)?;
        }
        return Ok(());
    }

    let summary = probe_targets(connector, targets, &request.options, request.show_failed, out).await?;
    if summary.errored > 0 {
        return Err(AppError::ProbesErrored(summary.errored));
    }
    Ok(())
}

/// Hosts to work on, in search order.
pub async fn resolve_targets<S>(source: &S, request: &RunRequest) -> Result<Vec<Target>, AppError>
where
    S: VncSource + Sync + ?Sized,
{
    if let ProbeMode::Address(target) = &request.probe {
        return Ok(vec![target.clone()]);
    }

    if !request.filter.is_empty() {
        let records = search_filter(source, &request.filter).await?;
        if records.len() < request.count {
            tracing::info!(
                requested = request.count,
                found = records.len(),
                "Filtered search returned fewer hosts than requested"
            );
        }
        return Ok(records.iter().take(request.count).map(Target::from).collect());
    }

    let mut targets = Vec::with_capacity(request.count);
    for _ in 0..request.count {
        let record = search_random(source).await?;
        targets.push(Target::from(&record));
    }
    Ok(targets)
}

/// Probe every target concurrently, one task each, and print results in
/// completion order: `host:port true` for a changed screen, and
/// `host:port false` for an unchanged one when `show_failed` is set.
pub async fn probe_targets<W: Write>(
    connector: Arc<dyn SessionConnector>,
    targets: Vec<Target>,
    options: &ProbeOptions,
    show_failed: bool,
    out: &mut W,
) -> Result<ProbeSummary, AppError> {
    tracing::info!(
        hosts = targets.len(),
        delay_ms = options.screen_delay.as_millis() as u64,
        "Probing hosts with Ctrl+Alt+Del"
    );

    let mut tasks = JoinSet::new();
    for target in targets {
        let connector = connector.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let outcome = check_ctrl_alt_del(connector.as_ref(), &target, &options).await;
            (target, outcome)
        });
    }

    let mut summary = ProbeSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((target, Ok(true))) => {
                summary.passed += 1;
                writeln!(out, "{} true", target)?;
                out.flush()?;
            }
            Ok((target, Ok(false))) => {
                summary.failed += 1;
                if show_failed {
                    writeln!(out, "{} false", target)?;
                    out.flush()?;
                }
            }
            Ok((target, Err(err))) => {
                summary.errored += 1;
                tracing::error!(%target, error = %err, "Probe failed");
            }
            Err(err) => {
                summary.errored += 1;
                tracing::error!(error = %err, "Probe task panicked");
            }
        }
    }

    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        "Probing finished"
    );

    Ok(summary)
}
