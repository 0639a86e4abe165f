//! Realtime feed collaborator.

use chartmill_types::Resolution;
use thiserror::Error;

/// Errors reported by a realtime feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The feed refused the subscription.
    #[error("subscription to {symbol} at {resolution} rejected: {reason}")]
    Rejected {
        /// Requested symbol.
        symbol: String,
        /// Requested resolution.
        resolution: Resolution,
        /// Reason given by the feed.
        reason: String,
    },

    /// The feed connection is gone.
    #[error("realtime feed disconnected")]
    Disconnected,
}

/// Source of realtime bar events for one chart view.
///
/// The pipeline subscribes when a view is activated and unsubscribes when it
/// is replaced or deactivated. Delivered events are passed to
/// `ChartPipeline::on_realtime` by the caller, already filtered to the active
/// subscription.
pub trait RealtimeFeed {
    /// Starts delivering bars for `symbol` at `resolution`.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed cannot serve the subscription.
    fn subscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError>;

    /// Stops delivering bars for `symbol` at `resolution`.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed is unreachable.
    fn unsubscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError>;
}

impl<F: RealtimeFeed + ?Sized> RealtimeFeed for Box<F> {
    fn subscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError> {
        (**self).subscribe(symbol, resolution)
    }

    fn unsubscribe(&mut self, symbol: &str, resolution: Resolution) -> Result<(), FeedError> {
        (**self).unsubscribe(symbol, resolution)
    }
}

/// A feed that accepts every subscription and never delivers anything.
///
/// Used for bulk-only conversions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullFeed;

impl RealtimeFeed for NullFeed {
    fn subscribe(&mut self, _symbol: &str, _resolution: Resolution) -> Result<(), FeedError> {
        Ok(())
    }

    fn unsubscribe(&mut self, _symbol: &str, _resolution: Resolution) -> Result<(), FeedError> {
        Ok(())
    }
}
