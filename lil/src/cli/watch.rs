use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use clap::Args;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use lil_common::cache::IssueCache;
use lil_common::config::Config;
use lil_common::error::Result;
use lil_core::{Refresher, Snapshot};
use lil_net::LinearClient;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

use crate::render::snapshot_lines;

#[derive(Args, Debug, Default)]
pub struct Watch;

impl Watch {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let client = LinearClient::new(config)?;
        let refresher = Arc::new(Refresher::new(client, IssueCache::from_config(config)));

        let (tx, mut rx) = watch::channel(refresher.initial_snapshot());
        draw(&rx.borrow_and_update())?;

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let period = config.refresh_interval;
        info!(
            "Refreshing issues every {}",
            humantime::format_duration(period)
        );
        let loop_handle = tokio::spawn({
            let refresher = Arc::clone(&refresher);
            async move {
                refresher
                    .run(period, tx, async {
                        let _ = stop_rx.await;
                    })
                    .await;
            }
        });

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    draw(&snapshot)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupt received, quitting");
                    break;
                }
            }
        }

        let _ = stop_tx.send(());
        let _ = loop_handle.await;
        Ok(())
    }
}

fn draw(snapshot: &Snapshot) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if stdout.is_terminal() {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    } else {
        writeln!(stdout)?;
    }
    for line in snapshot_lines(snapshot, true) {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()?;
    Ok(())
}
