use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Interval, OhlcPoint};
use crate::error::ChartResult;
use crate::extensions::MarkPoint;

/// External source of series data and derived annotations.
///
/// Implementations report failures as [`ChartError::Provider`](crate::ChartError::Provider).
pub trait DataProvider {
    /// Loads `count` ascending points for `interval`.
    fn fetch_series(
        &self,
        interval: Interval,
        count: usize,
    ) -> LocalBoxFuture<'_, ChartResult<Vec<OhlcPoint>>>;

    /// Derives up to `count` marks for a freshly fetched series.
    fn derive_marks<'a>(
        &'a self,
        series: &'a [OhlcPoint],
        count: usize,
    ) -> LocalBoxFuture<'a, ChartResult<Vec<MarkPoint>>>;
}

/// Identity of one interval reload; only the latest issued ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReloadTicket {
    pub token: u64,
    pub interval: Interval,
}

/// Data produced for a [`ReloadTicket`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub series: Vec<OhlcPoint>,
    pub marks: Vec<MarkPoint>,
}

/// Result of handing a reload outcome to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadOutcome {
    Applied,
    /// A newer request was issued after this ticket; nothing changed.
    Discarded,
}

/// Fetches the series for `ticket`, then derives its marks.
pub async fn fetch_reload<P>(
    provider: &P,
    ticket: ReloadTicket,
    series_count: usize,
    mark_count: usize,
) -> ChartResult<ReloadResponse>
where
    P: DataProvider + ?Sized,
{
    debug!(token = ticket.token, interval = %ticket.interval, series_count, "fetching reload");
    let series = provider.fetch_series(ticket.interval, series_count).await?;
    let marks = provider.derive_marks(&series, mark_count).await?;
    Ok(ReloadResponse { series, marks })
}
