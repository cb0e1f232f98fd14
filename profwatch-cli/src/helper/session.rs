use std::future::Future;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use profwatch_api::API;

use crate::helper::ctx::{Context, OutputFormat};
use crate::helper::form::{Component, Form};
use crate::stdio::spin_while;

const INTERRUPT_POLL: Duration = Duration::from_millis(200);

/// Submits `input` once and writes the resulting view.
///
/// Returns false when the view ended in a failure, and an error when `stop`
/// is raised before the backend answers.
pub async fn submit_once<C: Component>(
    ctx: &impl Context<'_>,
    api: &API,
    form: &mut Form<C>,
    input: &str,
    out: &mut impl Write,
    stop: &AtomicBool,
) -> Result<bool> {
    let pending = until_stopped(stop, form.submit(api, input));
    let Some(component) = spin_while("waiting for backend", pending).await else {
        warn!("Interrupted before the backend answered");
        bail!("interrupted");
    };
    write_view(out, component, ctx.format())?;
    Ok(!component.view().is_failed())
}

/// Treats every non-blank line from `lines` as a new submission.
///
/// Requests run concurrently; a view is written whenever the latest
/// submission settles. Responses for superseded submissions are dropped.
/// Once `stop` is raised no more lines are taken and the session ends as
/// soon as the pending requests settle.
pub async fn run_interactive<C: Component>(
    ctx: &impl Context<'_>,
    api: &API,
    form: &mut Form<C>,
    mut lines: mpsc::Receiver<String>,
    out: &mut impl Write,
    stop: &AtomicBool,
) -> Result<()> {
    let format = ctx.format();
    let mut tasks = JoinSet::new();
    let mut reading = true;
    let mut poll = tokio::time::interval(INTERRUPT_POLL);

    loop {
        if reading && stop.load(Ordering::Relaxed) {
            info!("Interrupted, waiting for {} pending request(s)", tasks.len());
            reading = false;
            lines.close();
        }
        if !reading && tasks.is_empty() {
            break;
        }

        tokio::select! {
            line = lines.recv(), if reading => {
                match line {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let (ticket, req) = form.begin(&line);
                        let api = api.clone();
                        tasks.spawn(async move { (ticket, C::dispatch(api, req).await) });
                    }
                    None => reading = false,
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                match joined {
                    Ok((ticket, result)) => {
                        if form.settle(ticket, result) {
                            write_view(out, form.component(), format)?;
                        }
                    }
                    Err(e) => error!("Task join error: {e:?}"),
                }
            }
            _ = poll.tick(), if reading => {}
        }
    }

    Ok(())
}

async fn until_stopped<F: Future>(stop: &AtomicBool, fut: F) -> Option<F::Output> {
    tokio::pin!(fut);
    let mut poll = tokio::time::interval(INTERRUPT_POLL);
    loop {
        tokio::select! {
            out = &mut fut => return Some(out),
            _ = poll.tick() => {
                if stop.load(Ordering::Relaxed) {
                    return None;
                }
            }
        }
    }
}

fn write_view<C: Component>(out: &mut impl Write, component: &C, format: OutputFormat) -> Result<()> {
    let rendered = component.view().render(format);
    if !rendered.is_empty() {
        writeln!(out, "{rendered}")?;
    }
    out.flush()?;
    Ok(())
}
