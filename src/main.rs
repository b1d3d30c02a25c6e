mod tui;

use anyhow::Result;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use swiftgg_reader::config::Config;
use swiftgg_reader::feed::loader::FeedLoader;
use swiftgg_reader::guide::{self, Chapter};
use swiftgg_reader::site::contributors::ContributorsService;
use swiftgg_reader::site::sponsors::SponsorsService;
use swiftgg_reader::wordpress::rest::WordPressRest;
use tokio::sync::{mpsc, watch};
use tui::state::{AppState, Tab};
use tui::TuiCommand;

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns the terminal, so logs go to a file.
    let log_file = std::fs::File::create("swiftgg-reader.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("swiftgg_reader=info")
        .with_writer(log_file)
        .init();

    let config = Config::load_or_default(Path::new("config.toml"))?;

    let loader = Arc::new(FeedLoader::new(WordPressRest::new(&config.wordpress)));
    let sponsors = Arc::new(SponsorsService::new(&config.site));
    let contributors = Arc::new(ContributorsService::new(&config.site));
    let chapters = guide::chapters(&config.guide.base_url);

    let (state_tx, state_rx) = watch::channel(AppState::new(
        chapters.clone(),
        config.wordpress.category,
    ));
    let (cmd_tx, cmd_rx) = mpsc::channel::<TuiCommand>(16);

    let driver = tokio::spawn(drive(
        loader,
        sponsors,
        contributors,
        state_tx,
        cmd_rx,
        chapters,
        config.wordpress.category,
    ));

    let result = tui::run_tui(state_rx, cmd_tx).await;

    // In-flight fetches are discarded with the driver; nothing needs a
    // graceful drain.
    driver.abort();
    tracing::debug!("shutting down");
    result
}

/// Owns the loader and services, translates TUI commands into fetches, and
/// publishes fresh `AppState` snapshots after every change.
async fn drive(
    loader: Arc<FeedLoader<WordPressRest>>,
    sponsors: Arc<SponsorsService>,
    contributors: Arc<ContributorsService>,
    state_tx: watch::Sender<AppState>,
    mut cmd_rx: mpsc::Receiver<TuiCommand>,
    chapters: Vec<Chapter>,
    root_category: i64,
) {
    let mut app = AppState::new(chapters, root_category);

    // Fetch tasks report completion here so a snapshot with the final state
    // gets published.
    let (done_tx, mut done_rx) = mpsc::channel::<()>(8);

    // Initial loads run in the background so the UI comes up immediately.
    spawn_fetch(&done_tx, {
        let loader = loader.clone();
        async move { loader.ensure_initial().await }
    });
    spawn_fetch(&done_tx, {
        let sponsors = sponsors.clone();
        async move { sponsors.fetch().await }
    });
    spawn_fetch(&done_tx, {
        let contributors = contributors.clone();
        async move { contributors.fetch().await }
    });
    publish(&state_tx, &mut app, &loader, &sponsors, &contributors);

    // Periodic republish picks up loading flags set inside spawned fetches.
    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(250));

    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                let Some(command) = command else { break };
                match command {
                    TuiCommand::Quit => break,
                    TuiCommand::NextTab => app.tab = app.tab.next(),
                    TuiCommand::PrevTab => app.tab = app.tab.prev(),
                    TuiCommand::Down => {
                        let max = app.max_scroll();
                        let scroll = app.scroll_mut();
                        *scroll = (*scroll + 1).min(max);
                        if app.tab == Tab::Posts && app.selection_near_end() {
                            spawn_fetch(&done_tx, {
                                let loader = loader.clone();
                                async move { loader.load_more().await }
                            });
                        }
                    }
                    TuiCommand::Up => {
                        let scroll = app.scroll_mut();
                        *scroll = scroll.saturating_sub(1);
                    }
                    TuiCommand::Refresh => match app.tab {
                        Tab::Posts => spawn_fetch(&done_tx, {
                            let loader = loader.clone();
                            async move { loader.fetch_initial().await }
                        }),
                        Tab::Sponsors => spawn_fetch(&done_tx, {
                            let sponsors = sponsors.clone();
                            async move { sponsors.force_refresh().await }
                        }),
                        Tab::Contributors => spawn_fetch(&done_tx, {
                            let contributors = contributors.clone();
                            async move { contributors.force_refresh().await }
                        }),
                        Tab::Guide => {}
                    },
                    TuiCommand::Retry => spawn_fetch(&done_tx, {
                        let loader = loader.clone();
                        async move { loader.retry().await }
                    }),
                }
                publish(&state_tx, &mut app, &loader, &sponsors, &contributors);
            }
            _ = done_rx.recv() => {
                publish(&state_tx, &mut app, &loader, &sponsors, &contributors);
            }
            _ = ticker.tick() => {
                publish(&state_tx, &mut app, &loader, &sponsors, &contributors);
            }
        }
    }
}

fn spawn_fetch<F>(done_tx: &mpsc::Sender<()>, fetch: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let done = done_tx.clone();
    tokio::spawn(async move {
        fetch.await;
        let _ = done.send(()).await;
    });
}

fn publish(
    state_tx: &watch::Sender<AppState>,
    app: &mut AppState,
    loader: &FeedLoader<WordPressRest>,
    sponsors: &SponsorsService,
    contributors: &ContributorsService,
) {
    app.feed = loader.state();
    app.feed_error = loader.last_error();
    app.sponsors = sponsors.state();
    app.contributors = contributors.state();
    app.clamp_scrolls();
    let _ = state_tx.send(app.clone());
}
