// lil-core/src/refresh.rs
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lil_common::cache::IssueCache;
use lil_common::error::Result;
use lil_common::model::Issue;
use lil_net::LinearClient;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::menu::{build_menu, Menu};

/// Anything that can produce the viewer's assigned issues.
pub trait IssueSource {
    fn fetch_issues(&self) -> impl Future<Output = Result<Vec<Issue>>> + Send;
}

impl IssueSource for LinearClient {
    fn fetch_issues(&self) -> impl Future<Output = Result<Vec<Issue>>> + Send {
        self.fetch_assigned_issues()
    }
}

/// What the tray currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub menu: Menu,
    pub issue_count: usize,
    /// Message of the last failed refresh, cleared by the next success.
    pub error: Option<String>,
    /// `None` while showing cached or placeholder content.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn from_issues(issues: &[Issue], refreshed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            menu: build_menu(issues),
            issue_count: issues.len(),
            error: None,
            refreshed_at,
        }
    }
}

pub struct Refresher<S> {
    source: S,
    cache: IssueCache,
}

impl<S: IssueSource> Refresher<S> {
    pub fn new(source: S, cache: IssueCache) -> Self {
        Self { source, cache }
    }

    /// Cached issues when there are any, otherwise the loading placeholder.
    pub fn initial_snapshot(&self) -> Snapshot {
        match self.cache.load() {
            Ok(Some(issues)) if !issues.is_empty() => {
                info!("Loaded {} issues from cache.", issues.len());
                Snapshot::from_issues(&issues, None)
            }
            Ok(_) => Self::loading(),
            Err(e) => {
                warn!("Failed to load cached issues: {}", e);
                Self::loading()
            }
        }
    }

    fn loading() -> Snapshot {
        Snapshot {
            menu: Menu::loading(),
            issue_count: 0,
            error: None,
            refreshed_at: None,
        }
    }

    /// Fetches, caches and rebuilds the menu. A failed fetch yields an empty menu
    /// carrying the error message.
    pub async fn refresh_once(&self) -> Snapshot {
        debug!("Fetching issues and rebuilding menu...");
        match self.source.fetch_issues().await {
            Ok(issues) => {
                info!("Successfully fetched {} active issues.", issues.len());
                if let Err(e) = self.cache.store(&issues) {
                    warn!("Error caching issues: {}", e);
                }
                Snapshot::from_issues(&issues, Some(Utc::now()))
            }
            Err(e) => {
                error!("Error fetching issues: {}", e);
                let mut snapshot = Snapshot::from_issues(&[], Some(Utc::now()));
                snapshot.error = Some(e.to_string());
                snapshot
            }
        }
    }

    /// Refreshes every `period` and publishes each snapshot until `shutdown`
    /// resolves or every receiver is gone. The first refresh happens immediately.
    pub async fn run<F>(&self, period: Duration, tx: watch::Sender<Snapshot>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Refresh loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    // A fetch can take up to the client timeout; shutdown must not wait for it.
                    let snapshot = tokio::select! {
                        _ = &mut shutdown => {
                            debug!("Refresh loop shutting down during a fetch");
                            break;
                        }
                        snapshot = self.refresh_once() => snapshot,
                    };
                    if tx.send(snapshot).is_err() {
                        debug!("No snapshot receivers left, stopping refresh loop");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use lil_common::error::LilError;
    use tempfile::tempdir;
    use tokio::sync::oneshot;

    use super::*;
    use crate::menu::{MenuEntry, LOADING_TITLE, NO_ISSUES_TITLE};

    struct FakeSource {
        result: Result<Vec<Issue>>,
        calls: Arc<AtomicUsize>,
    }

    impl IssueSource for FakeSource {
        fn fetch_issues(&self) -> impl Future<Output = Result<Vec<Issue>>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            async move { result }
        }
    }

    struct HangingSource;

    impl IssueSource for HangingSource {
        fn fetch_issues(&self) -> impl Future<Output = Result<Vec<Issue>>> + Send {
            std::future::pending()
        }
    }

    fn issue(identifier: &str) -> Issue {
        Issue {
            id: identifier.to_string(),
            identifier: identifier.to_string(),
            title: "Title".to_string(),
            url: "https://linear.app/x".to_string(),
            due_date: None,
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            state: None,
            project: None,
            assignee: None,
        }
    }

    fn refresher(result: Result<Vec<Issue>>, cache: IssueCache) -> (Refresher<FakeSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            result,
            calls: Arc::clone(&calls),
        };
        (Refresher::new(source, cache), calls)
    }

    #[test]
    fn initial_snapshot_without_cache_is_loading() {
        let dir = tempdir().unwrap();
        let (r, _) = refresher(Ok(vec![]), IssueCache::new(dir.path().join("c.json")));
        let snap = r.initial_snapshot();
        assert_eq!(
            snap.menu.entries,
            vec![MenuEntry::Placeholder(LOADING_TITLE.to_string())]
        );
    }

    #[test]
    fn initial_snapshot_uses_cache() {
        let dir = tempdir().unwrap();
        let cache = IssueCache::new(dir.path().join("c.json"));
        cache.store(&[issue("ENG-1")]).unwrap();
        let (r, _) = refresher(Ok(vec![]), cache);
        let snap = r.initial_snapshot();
        assert_eq!(snap.issue_count, 1);
        assert!(snap.menu.find("ENG-1").is_some());
        assert!(snap.refreshed_at.is_none());
    }

    #[tokio::test]
    async fn successful_refresh_updates_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.json");
        let (r, calls) = refresher(Ok(vec![issue("ENG-2")]), IssueCache::new(&path));
        let snap = r.refresh_once().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snap.issue_count, 1);
        assert!(snap.error.is_none());
        let cached = IssueCache::new(&path).load().unwrap().unwrap();
        assert_eq!(cached[0].identifier, "ENG-2");
    }

    #[tokio::test]
    async fn failed_refresh_shows_empty_menu_and_keeps_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.json");
        IssueCache::new(&path).store(&[issue("ENG-3")]).unwrap();
        let (r, _) = refresher(Err(LilError::Api("boom".into())), IssueCache::new(&path));
        let snap = r.refresh_once().await;
        assert_eq!(
            snap.menu.entries,
            vec![MenuEntry::Placeholder(NO_ISSUES_TITLE.to_string())]
        );
        assert_eq!(snap.error.as_deref(), Some("API Error: boom"));
        assert_eq!(IssueCache::new(&path).load().unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_publishes_until_shutdown() {
        let dir = tempdir().unwrap();
        let (r, calls) = refresher(Ok(vec![issue("ENG-4")]), IssueCache::new(dir.path().join("c.json")));
        let (tx, mut rx) = watch::channel(r.initial_snapshot());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            r.run(Duration::from_secs(3600), tx, async {
                let _ = stop_rx.await;
            })
            .await;
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().menu.find("ENG-4").is_some());
        stop_tx.send(()).unwrap();
        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_fetch_in_flight() {
        let dir = tempdir().unwrap();
        let r = Refresher::new(HangingSource, IssueCache::new(dir.path().join("c.json")));
        let (tx, rx) = watch::channel(r.initial_snapshot());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            r.run(Duration::from_secs(3600), tx, async {
                let _ = stop_rx.await;
            })
            .await;
        });

        time::sleep(Duration::from_millis(50)).await;
        stop_tx.send(()).unwrap();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("refresh loop ignored shutdown")
            .unwrap();
        assert!(rx.borrow().refreshed_at.is_none());
    }
}
