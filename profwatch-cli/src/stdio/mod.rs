use std::{
    future::Future,
    io::{BufRead, IsTerminal},
    thread,
    time::Duration,
};

use kdam::{tqdm, BarExt, Column, RichProgress, Spinner};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Lines of stdin, read on a dedicated thread.
///
/// A blocked read never holds up runtime shutdown; the thread ends on EOF,
/// on a read error, or once the receiver is gone.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("failed to read stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Drives `fut` to completion, animating a spinner on stderr meanwhile.
///
/// Falls back to awaiting `fut` directly when stderr is not a terminal.
pub async fn spin_while<F: Future>(desc: &str, fut: F) -> F::Output {
    if !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let mut pb = RichProgress::new(
        tqdm!(desc = desc, position = 0),
        vec![
            Column::Spinner(Spinner::new(
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
                80.0,
                1.0,
            )),
            Column::Text(format!("[blue bold]{desc}")),
        ],
    );

    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(Duration::from_millis(80));
    loop {
        tokio::select! {
            out = &mut fut => {
                if let Err(e) = pb.clear() {
                    debug!("failed to clear spinner: {e}");
                }
                return out;
            }
            _ = ticker.tick() => {
                if let Err(e) = pb.refresh() {
                    debug!("failed to draw spinner: {e}");
                }
            }
        }
    }
}
