//! The periodic fetch → dedup → format → dispatch loop.
//!
//! One [`Scheduler`] owns the dedup store and drives every tick from a single
//! task, so ticks never overlap and the store has a single writer. The next
//! tick starts one period after the previous one finished; slow ticks push
//! the schedule back rather than being caught up.

use crate::dedup::DedupStore;
use crate::models::NewsItem;
use crate::notify::{ChatSink, formatter};
use crate::scrapers::PageFetcher;
use crate::scrapers::gov::{self, GovScraper};
use crate::scrapers::panews::PanewsScraper;
use crate::translate::Translator;
use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Tunables for [`Scheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between the end of one tick and the start of the next.
    pub period: Duration,
    /// Language government releases are translated into.
    pub target_lang: String,
    /// Cap on remembered titles; `None` keeps everything.
    pub dedup_capacity: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(5 * 60),
            target_lang: "zh-CN".to_string(),
            dedup_capacity: None,
        }
    }
}

/// What one tick did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// The sink was unavailable and nothing was fetched.
    pub skipped: bool,
    /// Items parsed from all sources.
    pub fetched: usize,
    /// Items not seen before this tick.
    pub fresh: usize,
    /// Fresh items lost to translation failures.
    pub dropped: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Drives both scrapers into one sink.
pub struct Scheduler<F, T, S> {
    http: F,
    translator: T,
    sink: S,
    panews: PanewsScraper,
    gov: GovScraper,
    dedup: DedupStore,
    config: SchedulerConfig,
}

impl<F, T, S> Scheduler<F, T, S>
where
    F: PageFetcher,
    T: Translator,
    S: ChatSink,
{
    pub fn new(http: F, translator: T, sink: S, config: SchedulerConfig) -> Self {
        let dedup = match config.dedup_capacity {
            Some(cap) => DedupStore::with_capacity(cap),
            None => DedupStore::new(),
        };
        Self {
            http,
            translator,
            sink,
            panews: PanewsScraper::default(),
            gov: GovScraper::default(),
            dedup,
            config,
        }
    }

    /// Replace the default source pages.
    #[cfg(test)]
    pub fn with_sources(mut self, panews: PanewsScraper, gov: GovScraper) -> Self {
        self.panews = panews;
        self.gov = gov;
        self
    }

    #[cfg(test)]
    pub fn dedup(&self) -> &DedupStore {
        &self.dedup
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run ticks forever, sleeping one period after each.
    pub async fn run(&mut self) {
        info!(period_secs = self.config.period.as_secs(), "Scheduler started");
        loop {
            self.tick().await;
            sleep(self.config.period).await;
        }
    }

    /// Run one full cycle.
    ///
    /// Nothing is fetched when the sink is unavailable. Titles are recorded
    /// as seen before translation and dispatch, so a later failure loses the
    /// item instead of repeating it.
    #[instrument(level = "info", skip_all)]
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if let Err(e) = self.sink.ready().await {
            warn!(error = %e, "Sink unavailable; skipping tick");
            report.skipped = true;
            return report;
        }
        if self.dedup.is_empty() {
            debug!("No titles seen yet; every current headline is new");
        }

        let headlines = self.panews.fetch(&self.http).await;
        report.fetched += headlines.len();
        let headlines = self.dedup.filter_new(headlines);
        report.fresh += headlines.len();
        self.dispatch(headlines, &mut report).await;

        let releases = self.gov.fetch(&self.http).await;
        report.fetched += releases.len();
        let releases = self.dedup.filter_new(releases);
        report.fresh += releases.len();
        let before = releases.len();
        let releases = gov::localize(&self.translator, &self.config.target_lang, releases).await;
        report.dropped += before - releases.len();
        self.dispatch(releases, &mut report).await;

        info!(
            fetched = report.fetched,
            fresh = report.fresh,
            dropped = report.dropped,
            sent = report.sent,
            failed = report.failed,
            seen_total = self.dedup.len(),
            "Tick complete"
        );
        report
    }

    async fn dispatch(&self, items: Vec<NewsItem>, report: &mut TickReport) {
        for item in items {
            let message = formatter::format(item, Utc::now());
            match self.sink.send(&message).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(title = %message.title, error = %e, "Failed to send notification");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, SourceTag};
    use crate::scrapers::gov::GovSite;
    use crate::scrapers::panews::PANEWS_URL;
    use crate::testing::{FakeFetcher, FakeSink, FakeTranslator};

    const FRONT_PAGE: &str = r#"<html><body>
        <div><a class="pa-news__list-title">A</a><p class="description">about A</p></div>
        <div><a class="pa-news__list-title">B</a></div>
    </body></html>"#;

    const FED_URL: &str = "https://fed.test/releases";
    const FED_PAGE: &str = r#"<html><body>
        <div class="press-release-item"><span class="title">Rates held</span><span class="date">Oct 14</span></div>
    </body></html>"#;

    fn scheduler(
        http: FakeFetcher,
        translator: FakeTranslator,
        sink: FakeSink,
    ) -> Scheduler<FakeFetcher, FakeTranslator, FakeSink> {
        Scheduler::new(http, translator, sink, SchedulerConfig::default()).with_sources(
            PanewsScraper::default(),
            GovScraper::new(vec![GovSite::new(SourceTag::Fed, FED_URL)]),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_front_page() {
        let http = FakeFetcher::new().with_page(PANEWS_URL, FRONT_PAGE);
        let mut s = scheduler(http, FakeTranslator::new(), FakeSink::available());

        let report = s.tick().await;
        assert_eq!(report.fresh, 2);
        assert_eq!(report.sent, 2);
        assert!(s.dedup().has("A"));
        assert!(s.dedup().has("B"));

        let sent = s.sink().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].title, "A");
        assert_eq!(sent[1].title, "B");
        assert!(sent.iter().all(|m| m.color == Color::Info && m.fields.is_empty()));
    }

    #[tokio::test]
    async fn test_repeated_titles_are_announced_once() {
        let http = FakeFetcher::new()
            .with_page(PANEWS_URL, FRONT_PAGE)
            .with_page(FED_URL, FED_PAGE);
        let mut s = scheduler(http, FakeTranslator::new(), FakeSink::available());

        let first = s.tick().await;
        assert_eq!(first.sent, 3);

        let second = s.tick().await;
        assert_eq!(second.fetched, 3);
        assert_eq!(second.fresh, 0);
        assert_eq!(second.sent, 0);
        assert_eq!(s.sink().sent().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_send_is_not_redelivered() {
        let http = FakeFetcher::new().with_page(PANEWS_URL, FRONT_PAGE);
        let mut s = scheduler(http, FakeTranslator::new(), FakeSink::rejecting());

        let first = s.tick().await;
        assert_eq!(first.fresh, 2);
        assert_eq!(first.failed, 2);
        assert_eq!(s.sink().attempts(), 2);

        let second = s.tick().await;
        assert_eq!(second.fresh, 0);
        assert_eq!(s.sink().attempts(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_sink_skips_everything() {
        let http = FakeFetcher::new()
            .with_page(PANEWS_URL, FRONT_PAGE)
            .with_page(FED_URL, FED_PAGE);
        let mut s = scheduler(http, FakeTranslator::new(), FakeSink::unavailable());

        let report = s.tick().await;
        assert!(report.skipped);
        assert!(s.http.calls().is_empty());
        assert!(s.dedup().is_empty());
        assert_eq!(s.sink().attempts(), 0);
    }

    #[tokio::test]
    async fn test_gov_items_are_translated_and_labelled() {
        let http = FakeFetcher::new().with_page(FED_URL, FED_PAGE);
        let mut s = scheduler(http, FakeTranslator::new(), FakeSink::available());

        let report = s.tick().await;
        assert_eq!(report.sent, 1);
        let sent = s.sink().sent();
        assert_eq!(sent[0].title, "[美联储新闻] [zh-CN] Rates held");
        assert_eq!(sent[0].color, Color::Alert);
        assert_eq!(sent[0].fields[0].value, "Oct 14");
        // dedup keys are the original English titles
        assert!(s.dedup().has("Rates held"));
    }

    #[tokio::test]
    async fn test_translation_failure_loses_item_for_good() {
        let http = FakeFetcher::new().with_page(FED_URL, FED_PAGE);
        let mut s = scheduler(
            http,
            FakeTranslator::new().failing_on("Rates held"),
            FakeSink::available(),
        );

        let first = s.tick().await;
        assert_eq!(first.fresh, 1);
        assert_eq!(first.dropped, 1);
        assert_eq!(first.sent, 0);

        let second = s.tick().await;
        assert_eq!(second.fresh, 0);
        assert!(s.sink().sent().is_empty());
    }

    #[tokio::test]
    async fn test_late_translation_failure_loses_whole_tag() {
        let page = r#"<html><body>
            <div class="press-release-item"><span class="title">Statement</span></div>
            <div class="press-release-item"><span class="title">Minutes released</span></div>
        </body></html>"#;
        let http = FakeFetcher::new()
            .with_page(PANEWS_URL, FRONT_PAGE)
            .with_page(FED_URL, page);
        let mut s = scheduler(
            http,
            FakeTranslator::new().failing_on("Minutes released"),
            FakeSink::available(),
        );

        let first = s.tick().await;
        assert_eq!(first.fresh, 4);
        assert_eq!(first.dropped, 2);
        assert_eq!(first.sent, 2);
        assert!(s.sink().sent().iter().all(|m| m.color == Color::Info));
        assert!(s.dedup().has("Statement"));
        assert!(s.dedup().has("Minutes released"));

        let second = s.tick().await;
        assert_eq!(second.fresh, 0);
        assert_eq!(s.sink().sent().len(), 2);
    }
}
