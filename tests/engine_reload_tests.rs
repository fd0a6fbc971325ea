use std::cell::RefCell;
use std::rc::Rc;

use candle_viewport::api::{
    ChartEngine, ChartEngineConfig, DataProvider, ReloadOutcome, ReloadResponse, ReloadTicket,
    fetch_reload,
};
use candle_viewport::core::{Interval, OhlcPoint, Viewport, VisibleRange};
use candle_viewport::error::{ChartError, ChartResult};
use candle_viewport::extensions::{ChartEvent, ChartListener, ListenerContext, MarkPoint};
use candle_viewport::render::NullRenderer;
use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};

fn series(count: usize, step_ms: i64) -> Vec<OhlcPoint> {
    (0..count)
        .map(|i| OhlcPoint::new(i as i64 * step_ms, 10.0, 12.0, 9.0, 11.0, 1_000.0))
        .collect()
}

fn build_engine() -> ChartEngine<NullRenderer> {
    let config = ChartEngineConfig::new(Viewport::new(900, 600));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_dataset(series(300, 60_000), Vec::new());
    engine
}

struct SyntheticProvider {
    fail: bool,
}

impl DataProvider for SyntheticProvider {
    fn fetch_series(
        &self,
        interval: Interval,
        count: usize,
    ) -> LocalBoxFuture<'_, ChartResult<Vec<OhlcPoint>>> {
        let result = if self.fail {
            Err(ChartError::Provider {
                interval: interval.to_string(),
                message: "upstream unavailable".to_owned(),
            })
        } else {
            Ok(series(count, interval.duration_ms()))
        };
        async move { result }.boxed_local()
    }

    fn derive_marks<'a>(
        &'a self,
        series: &'a [OhlcPoint],
        count: usize,
    ) -> LocalBoxFuture<'a, ChartResult<Vec<MarkPoint>>> {
        async move {
            Ok(series
                .iter()
                .step_by(10)
                .take(count)
                .map(|point| MarkPoint::new(point.timestamp, "E"))
                .collect())
        }
        .boxed_local()
    }
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<(ChartEvent, ListenerContext)>>>,
}

impl ChartListener for Recorder {
    fn id(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: ChartEvent, context: ListenerContext) {
        self.events.borrow_mut().push((event, context));
    }
}

fn attach_recorder(
    engine: &mut ChartEngine<NullRenderer>,
) -> Rc<RefCell<Vec<(ChartEvent, ListenerContext)>>> {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    engine
        .register_listener(Box::new(recorder))
        .expect("register recorder");
    events
}

fn drain(events: &Rc<RefCell<Vec<(ChartEvent, ListenerContext)>>>) -> Vec<ChartEvent> {
    events.borrow_mut().drain(..).map(|(event, _)| event).collect()
}

#[test]
fn only_the_latest_reload_is_applied() {
    let mut engine = build_engine();
    let provider = SyntheticProvider { fail: false };

    let initial = engine.interval();
    let first = engine.request_interval(Interval::OneHour).expect("1h");
    let second = engine.request_interval(Interval::FourHours).expect("4h");
    assert!(second.token > first.token);
    assert_eq!(engine.interval(), initial);
    assert_eq!(engine.pending_reload(), Some(second));
    assert!(engine.is_loading());

    let stale = block_on(fetch_reload(&provider, first, 120, 5));
    assert_eq!(
        engine.complete_reload(first, stale).expect("stale"),
        ReloadOutcome::Discarded
    );
    assert_eq!(engine.dataset().len(), 300);
    assert!(engine.is_loading());

    let fresh = block_on(fetch_reload(&provider, second, 120, 5));
    assert_eq!(
        engine.complete_reload(second, fresh).expect("fresh"),
        ReloadOutcome::Applied
    );
    assert!(!engine.is_loading());
    assert_eq!(engine.interval(), Interval::FourHours);
    assert_eq!(engine.dataset().len(), 120);
    assert_eq!(engine.marks().len(), 5);
    assert_eq!(engine.dataset()[1].timestamp, Interval::FourHours.duration_ms());
    assert_eq!(engine.visible_range(), Some(VisibleRange::new(70, 119)));

    let replay = block_on(fetch_reload(&provider, second, 10, 0));
    assert_eq!(
        engine.complete_reload(second, replay).expect("replay"),
        ReloadOutcome::Discarded
    );
    assert_eq!(engine.dataset().len(), 120);
}

#[test]
fn stale_errors_are_discarded_silently() {
    let mut engine = build_engine();
    let failing = SyntheticProvider { fail: true };
    let first = engine.request_interval(Interval::OneHour).expect("1h");
    let _second = engine.request_interval(Interval::OneDay).expect("1d");

    let outcome = block_on(fetch_reload(&failing, first, 100, 0));
    assert!(outcome.is_err());
    assert_eq!(
        engine.complete_reload(first, outcome).expect("stale error"),
        ReloadOutcome::Discarded
    );
    assert!(engine.is_loading());
}

#[test]
fn provider_error_clears_loading_and_keeps_the_dataset() {
    let mut engine = build_engine();
    let failing = SyntheticProvider { fail: true };
    let generation = engine.dataset_generation();
    let initial = engine.interval();
    let ticket = engine.request_interval(Interval::OneHour).expect("1h");

    let outcome = block_on(fetch_reload(&failing, ticket, 100, 0));
    let err = engine
        .complete_reload(ticket, outcome)
        .expect_err("provider failure surfaces");
    assert!(matches!(err, ChartError::Provider { .. }));
    assert!(!engine.is_loading());
    assert_eq!(engine.dataset().len(), 300);
    assert_eq!(engine.dataset_generation(), generation);
    assert_eq!(engine.interval(), initial);
    assert_eq!(engine.visible_range(), Some(VisibleRange::new(250, 299)));
}

#[test]
fn unknown_intervals_are_rejected() {
    let mut engine = build_engine();
    assert!(matches!(
        engine.request_interval(Interval::OneSecond),
        Err(ChartError::UnknownInterval(_))
    ));
    assert!(matches!(
        engine.request_interval_str("2h"),
        Err(ChartError::UnknownInterval(_))
    ));
    assert!(!engine.is_loading());

    let ticket = engine.request_interval_str("1d").expect("1d");
    assert_eq!(ticket.interval, Interval::OneDay);
}

#[test]
fn teardown_forgets_the_pending_reload() {
    let mut engine = build_engine();
    let provider = SyntheticProvider { fail: false };
    let ticket = engine.request_interval(Interval::OneHour).expect("1h");
    engine.teardown();
    assert!(!engine.is_loading());

    let late = block_on(fetch_reload(&provider, ticket, 50, 0));
    assert_eq!(
        engine.complete_reload(ticket, late).expect("late"),
        ReloadOutcome::Discarded
    );
    assert_eq!(engine.dataset().len(), 300);
}

#[test]
fn listeners_observe_the_reload_lifecycle() {
    let mut engine = build_engine();
    let events = attach_recorder(&mut engine);
    let provider = SyntheticProvider { fail: false };

    engine.request_interval(Interval::OneHour).expect("1h");
    let observed = events.borrow().clone();
    assert_eq!(
        observed.iter().map(|(event, _)| *event).collect::<Vec<_>>(),
        vec![
            ChartEvent::IntervalSwitchRequested(Interval::OneHour),
            ChartEvent::LoadingChanged { loading: true },
        ]
    );
    assert!(observed[1].1.loading);
    assert_eq!(observed[1].1.interval, Interval::OneHour);
    drain(&events);

    // A second request while loading does not repeat the loading signal.
    let ticket = engine.request_interval(Interval::OneHour).expect("1h again");
    assert_eq!(
        drain(&events),
        vec![ChartEvent::IntervalSwitchRequested(Interval::OneHour)]
    );

    let response = block_on(fetch_reload(&provider, ticket, 80, 2));
    engine.complete_reload(ticket, response).expect("applied");
    assert_eq!(
        drain(&events),
        vec![
            ChartEvent::DataUpdated {
                points_len: 80,
                marks_len: 2,
            },
            ChartEvent::RangeChanged(VisibleRange::new(30, 79)),
            ChartEvent::LoadingChanged { loading: false },
        ]
    );
}

#[test]
fn listener_ids_must_be_unique() {
    let mut engine = build_engine();
    let _events = attach_recorder(&mut engine);
    assert!(engine.has_listener("recorder"));
    assert!(matches!(
        engine.register_listener(Box::new(Recorder::default())),
        Err(ChartError::InvalidData(_))
    ));
    assert_eq!(engine.listener_count(), 1);
    assert!(engine.unregister_listener("recorder"));
    assert!(!engine.unregister_listener("recorder"));
    assert_eq!(engine.listener_count(), 0);
}

#[test]
fn empty_reload_clears_the_window() {
    let mut engine = build_engine();
    let ticket: ReloadTicket = engine.request_interval(Interval::OneWeek).expect("1w");
    let outcome = engine
        .complete_reload(
            ticket,
            Ok(ReloadResponse {
                series: Vec::new(),
                marks: Vec::new(),
            }),
        )
        .expect("applied");
    assert_eq!(outcome, ReloadOutcome::Applied);
    assert_eq!(engine.visible_range(), None);
    assert!(engine.visible_slice().is_empty());
    engine.render().expect("empty chart renders");
}
