use tracing::{debug, warn};

use crate::core::{Interval, OhlcPoint};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartEvent, MarkPoint};
use crate::render::Renderer;

use super::{ChartEngine, ReloadOutcome, ReloadResponse, ReloadTicket};

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the dataset and its marks.
    ///
    /// This is a new dataset identity: the visible window goes back to the
    /// trailing default, and in-flight gestures and tooltips are discarded.
    pub fn set_dataset(&mut self, series: Vec<OhlcPoint>, marks: Vec<MarkPoint>) {
        if !is_strictly_ascending(&series) {
            warn!(
                count = series.len(),
                "series timestamps are not strictly increasing"
            );
        }
        self.dataset = series;
        self.marks = marks;
        self.dataset_generation += 1;
        self.gestures.cancel();
        self.tooltip.reset();
        self.range.reset_for_dataset(self.dataset.len());
        debug!(
            count = self.dataset.len(),
            marks = self.marks.len(),
            generation = self.dataset_generation,
            "dataset replaced"
        );
        self.emit_event(ChartEvent::DataUpdated {
            points_len: self.dataset.len(),
            marks_len: self.marks.len(),
        });
        self.emit_range_changed();
    }

    /// Replaces only the marks; the visible window is kept.
    pub fn set_marks(&mut self, marks: Vec<MarkPoint>) {
        self.marks = marks;
        debug!(marks = self.marks.len(), "marks replaced");
        // Mark indices refer to the old list.
        self.tooltip.dismiss_mark();
        self.revalidate_tooltip();
        self.emit_event(ChartEvent::DataUpdated {
            points_len: self.dataset.len(),
            marks_len: self.marks.len(),
        });
    }

    /// Issues a reload ticket for `interval`.
    ///
    /// The current interval switches only once the reload is applied. Pan and zoom stay inert until the latest ticket completes. Earlier
    /// tickets become stale and their responses are discarded.
    pub fn request_interval(&mut self, interval: Interval) -> ChartResult<ReloadTicket> {
        if !self.config.intervals.contains(&interval) {
            return Err(ChartError::UnknownInterval(interval.to_string()));
        }
        let was_loading = self.is_loading();
        self.reload.latest_token += 1;
        let ticket = ReloadTicket {
            token: self.reload.latest_token,
            interval,
        };
        self.reload.pending = Some(ticket);
        self.gestures.cancel();
        debug!(token = ticket.token, interval = %interval, "reload requested");

        self.emit_event(ChartEvent::IntervalSwitchRequested(interval));
        if !was_loading {
            self.emit_loading_changed();
        }
        Ok(ticket)
    }

    /// Parses the toolbar spelling (`"15m"`) and requests that interval.
    pub fn request_interval_str(&mut self, interval: &str) -> ChartResult<ReloadTicket> {
        let interval = Interval::parse(interval)?;
        self.request_interval(interval)
    }

    /// Applies the outcome of a reload.
    ///
    /// Outcomes for anything but the latest pending ticket are discarded. A
    /// provider error for the latest ticket clears the loading flag and is
    /// returned; the dataset, range and tooltip stay untouched.
    pub fn complete_reload(
        &mut self,
        ticket: ReloadTicket,
        outcome: ChartResult<ReloadResponse>,
    ) -> ChartResult<ReloadOutcome> {
        if self.reload.pending != Some(ticket) {
            debug!(
                token = ticket.token,
                latest = self.reload.latest_token,
                interval = %ticket.interval,
                "stale reload discarded"
            );
            return Ok(ReloadOutcome::Discarded);
        }
        self.reload.pending = None;

        match outcome {
            Ok(response) => {
                debug!(
                    token = ticket.token,
                    interval = %ticket.interval,
                    count = response.series.len(),
                    "reload applied"
                );
                self.interval = ticket.interval;
                self.set_dataset(response.series, response.marks);
                self.emit_loading_changed();
                Ok(ReloadOutcome::Applied)
            }
            Err(err) => {
                warn!(
                    token = ticket.token,
                    interval = %ticket.interval,
                    error = %err,
                    "reload rejected"
                );
                self.emit_loading_changed();
                Err(err)
            }
        }
    }
}

fn is_strictly_ascending(series: &[OhlcPoint]) -> bool {
    series
        .windows(2)
        .all(|pair| pair[0].timestamp < pair[1].timestamp)
}
