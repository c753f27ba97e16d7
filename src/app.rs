use crate::config::Config;
use crate::error::SearchResult;
use crate::search::SearchResponse;
use crate::ui::widgets::alert::{AlertHandle, Alerts};
use crate::ui::widgets::cloud::PlacedWord;
use crate::ui::widgets::spinner::Spinner;
use crate::ui::widgets::statistics::Statistics;
use crate::ui::widgets::summary::{LayoutJob, Summary};
use crate::ui::widgets::tweets::TweetList;
use crate::ui::widgets::ResultPanel;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

pub const INFO_MESSAGE: &str = "Wait... It could take some time";
pub const ERROR_MESSAGE: &str = "Something went wrong... Please, retry later";

/// How long the search bar takes to slide up after the first search.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Landing screen: centred search bar, no results area.
    Initial,
    /// At least one search was issued; the results area exists.
    ResultsShown,
}

/// Identifies one issued search. Only the latest token's result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
}

/// Work the runtime must start on behalf of the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(SearchRequest),
    Layout(LayoutJob),
}

/// Completions delivered back to the UI task.
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        token: RequestToken,
        result: SearchResult<SearchResponse>,
    },
    LayoutFinished {
        generation: u64,
        words: Vec<PlacedWord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tweets,
    Statistics,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tweets, Tab::Statistics, Tab::Summary];

    pub fn index(self) -> usize {
        match self {
            Tab::Tweets => 0,
            Tab::Statistics => 1,
            Tab::Summary => 2,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

pub fn ease_in_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        8.0 * t.powi(4)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

/// Mode, request tokens and the pending flag of the search flow.
#[derive(Debug, Clone)]
pub struct SearchController {
    mode: UiMode,
    transition_started: Option<Instant>,
    latest: u64,
    pending: Option<RequestToken>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            mode: UiMode::Initial,
            transition_started: None,
            latest: 0,
            pending: None,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a query and issue a token for it.
    ///
    /// Returns `None` for a blank query or while a request is in flight.
    /// The query is sent as typed, surrounding whitespace included.
    /// The first accepted query moves the UI out of [`UiMode::Initial`] and
    /// starts the slide-up transition; later ones don't.
    pub fn begin(&mut self, query: &str, now: Instant) -> Option<SearchRequest> {
        if query.trim().is_empty() || self.pending.is_some() {
            return None;
        }

        if self.mode == UiMode::Initial {
            self.mode = UiMode::ResultsShown;
            self.transition_started = Some(now);
        }

        self.latest += 1;
        let token = RequestToken(self.latest);
        self.pending = Some(token);
        Some(SearchRequest {
            token,
            query: query.to_string(),
        })
    }

    /// Whether a result for `token` should be applied. Clears the pending
    /// flag when it is the latest one.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if token != RequestToken(self.latest) {
            return false;
        }
        self.pending = None;
        true
    }

    /// How far the layout has moved from landing (0.0) to results (1.0).
    pub fn transition_progress(&self, now: Instant) -> f64 {
        match (self.mode, self.transition_started) {
            (UiMode::Initial, _) => 0.0,
            (UiMode::ResultsShown, None) => 1.0,
            (UiMode::ResultsShown, Some(started)) => {
                let elapsed = now.saturating_duration_since(started);
                ease_in_out_quart(elapsed.as_secs_f64() / TRANSITION_DURATION.as_secs_f64())
            }
        }
    }

    pub fn transition_started(&self) -> Option<Instant> {
        self.transition_started
    }
}

pub struct App {
    pub query: String,
    pub alerts: Alerts,
    pub spinner: Spinner,
    pub tweets: TweetList,
    pub statistics: Statistics,
    pub summary: Summary,
    controller: SearchController,
    tabs_visible: bool,
    has_results: bool,
    active_tab: Tab,
    info_alert: Option<AlertHandle>,
    error_alert: Option<AlertHandle>,
    last_query: Option<String>,
    last_search: Option<DateTime<Local>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            query: String::new(),
            alerts: Alerts::default(),
            spinner: Spinner::new(),
            tweets: TweetList::new(),
            statistics: Statistics::new(),
            summary: Summary::new(config.ui.summary_style),
            controller: SearchController::new(),
            tabs_visible: false,
            has_results: false,
            active_tab: Tab::Tweets,
            info_alert: None,
            error_alert: None,
            last_query: None,
            last_search: None,
            should_quit: false,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.controller.mode()
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn tabs_visible(&self) -> bool {
        self.tabs_visible
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn last_search(&self) -> Option<DateTime<Local>> {
        self.last_search
    }

    pub fn panel(&self, tab: Tab) -> &dyn ResultPanel {
        match tab {
            Tab::Tweets => &self.tweets,
            Tab::Statistics => &self.statistics,
            Tab::Summary => &self.summary,
        }
    }

    /// Start a search for the current query text.
    pub fn search(&mut self) -> Option<SearchRequest> {
        self.search_at(Instant::now())
    }

    pub fn search_at(&mut self, now: Instant) -> Option<SearchRequest> {
        let request = match self.controller.begin(&self.query, now) {
            Some(request) => request,
            None => {
                if self.controller.is_pending() {
                    tracing::debug!("search already in flight, ignoring trigger");
                }
                return None;
            }
        };

        tracing::info!(query = %request.query, token = ?request.token, "starting search");

        if let Some(handle) = self.error_alert.take() {
            handle.dismiss(&mut self.alerts);
        }
        self.tabs_visible = false;
        self.spinner.show();
        self.info_alert = Some(self.alerts.info(INFO_MESSAGE));
        self.last_query = Some(request.query.clone());

        Some(request)
    }

    /// Apply the outcome of the search identified by `token`.
    pub fn apply_search_result(
        &mut self,
        token: RequestToken,
        result: SearchResult<SearchResponse>,
    ) -> Option<LayoutJob> {
        if !self.controller.finish(token) {
            tracing::debug!(token = ?token, "dropping result of superseded search");
            return None;
        }

        let layout = match result {
            Ok(response) => {
                let counts = self.tweets.render_tweets(response.tweets);
                self.statistics.render_statistics(counts);
                let layout = response
                    .most_frequent
                    .and_then(|freqs| self.summary.render_summary(freqs));

                tracing::info!(
                    tweets = counts.total(),
                    positive = counts.positive,
                    negative = counts.negative,
                    neutral = counts.neutral,
                    "search finished"
                );
                self.has_results = true;
                self.last_search = Some(Local::now());
                layout
            }
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                self.error_alert = Some(self.alerts.error(ERROR_MESSAGE));
                None
            }
        };

        self.spinner.hide();
        // After a failure the previous batch, if any, is still valid.
        self.tabs_visible = self.has_results;
        if let Some(handle) = self.info_alert.take() {
            handle.dismiss(&mut self.alerts);
        }

        layout
    }

    pub fn apply_layout(&mut self, generation: u64, words: Vec<PlacedWord>) {
        if !self.summary.finish_layout(generation, words) {
            tracing::debug!(generation, "dropping superseded word cloud layout");
        }
    }

    /// Route a completion from a background task.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::SearchFinished { token, result } => self
                .apply_search_result(token, result)
                .map(Command::Layout),
            AppEvent::LayoutFinished { generation, words } => {
                self.apply_layout(generation, words);
                None
            }
        }
    }

    pub fn toggle_summary_style(&mut self) -> Option<LayoutJob> {
        let style = self.summary.style().toggled();
        tracing::debug!(?style, "switching summary style");
        self.summary.set_style(style)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => return self.toggle_summary_style().map(Command::Layout),
                KeyCode::Char('u') => self.query.clear(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => return self.search().map(Command::Search),
            KeyCode::Char(c) => self.query.push(c),
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Esc => {
                if let Some(handle) = self.error_alert.take() {
                    handle.dismiss(&mut self.alerts);
                }
            }
            KeyCode::Tab if self.tabs_visible => self.active_tab = self.active_tab.next(),
            KeyCode::BackTab if self.tabs_visible => {
                self.active_tab = self.active_tab.previous()
            }
            KeyCode::Up if self.tabs_visible && self.active_tab == Tab::Tweets => {
                self.tweets.scroll_up()
            }
            KeyCode::Down if self.tabs_visible && self.active_tab == Tab::Tweets => {
                self.tweets.scroll_down()
            }
            _ => {}
        }
        None
    }

    pub fn on_tick(&mut self) {
        self.spinner.tick();
    }
}
