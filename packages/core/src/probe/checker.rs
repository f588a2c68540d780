use tokio::time;

use crate::probe::{
    error::ProbeError,
    session::{ScreenSession, SessionConnector},
    types::{ProbeOptions, Target, CTRL_ALT_DEL},
};

/// Does pressing Ctrl+Alt+Del visibly change the screen of `target`?
///
/// Connects, takes a screenshot, presses the combination, waits
/// `options.screen_delay`, takes a second screenshot and compares the two
/// with `options.criterion`. The whole attempt is capped at
/// [`ProbeOptions::time_budget`]; running out of time counts as "no change".
///
/// Transient failures (unreachable host, refused handshake, dropped
/// session, malformed update, timeout) are logged and reported as
/// `Ok(false)`. Anything else is returned as an error.
pub async fn check_ctrl_alt_del(
    connector: &dyn SessionConnector,
    target: &Target,
    options: &ProbeOptions,
) -> Result<bool, ProbeError> {
    let budget = options.time_budget();

    let outcome = match time::timeout(budget, probe(connector, target, options)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProbeError::Timeout(budget)),
    };

    match outcome {
        Ok(changed) => {
            tracing::debug!(%target, changed, "Probe finished");
            Ok(changed)
        }
        Err(err) if err.is_transient() => {
            tracing::debug!(%target, error = %err, "Probe gave up");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

async fn probe(
    connector: &dyn SessionConnector,
    target: &Target,
    options: &ProbeOptions,
) -> Result<bool, ProbeError> {
    let mut session = connector.connect(target).await?;

    let result = compare_around_keystroke(session.as_mut(), options).await;

    if let Err(err) = session.close().await {
        tracing::debug!(%target, error = %err, "Closing VNC session failed");
    }

    result
}

async fn compare_around_keystroke(
    session: &mut dyn ScreenSession,
    options: &ProbeOptions,
) -> Result<bool, ProbeError> {
    let before = session.screenshot().await?;
    session.press_keys(&CTRL_ALT_DEL).await?;
    time::sleep(options.screen_delay).await;
    let after = session.screenshot().await?;

    Ok(options.criterion.changed(&before, &after))
}
