//! Dashboard configuration.

use crate::{ConfigError, StatsConfig};
use serde::Deserialize;
use timeboost_auction::AuctionConfig;
use timeboost_clock::RoundConfig;
use timeboost_feed::FeedConfig;

/// Configuration for every component of the dashboard.
///
/// Deserializes from a table per component; missing tables and fields
/// fall back to the dashboard constants.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Round progression.
    pub round: RoundConfig,

    /// Bidding and winner determination.
    pub auction: AuctionConfig,

    /// Transaction stream.
    pub feed: FeedConfig,

    /// Cosmetic statistics.
    pub stats: StatsConfig,
}

impl DashboardConfig {
    /// Set the round configuration.
    pub fn with_round(mut self, round: RoundConfig) -> Self {
        self.round = round;
        self
    }

    /// Set the auction configuration.
    pub fn with_auction(mut self, auction: AuctionConfig) -> Self {
        self.auction = auction;
        self
    }

    /// Set the feed configuration.
    pub fn with_feed(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    /// Check that the configuration describes a runnable dashboard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let round = &self.round;
        if round.duration == 0 {
            return Err(ConfigError::ZeroRoundDuration);
        }
        if round.closing_threshold >= round.duration {
            return Err(ConfigError::ClosingThreshold {
                threshold: round.closing_threshold,
                duration: round.duration,
            });
        }
        check_probability("bid probability", round.bid_probability)?;

        if self.auction.bid_window == 0 {
            return Err(ConfigError::EmptyWindow { name: "bid" });
        }
        if self.auction.second_price_percent > 100 {
            return Err(ConfigError::SecondPricePercent(
                self.auction.second_price_percent,
            ));
        }

        let feed = &self.feed;
        if feed.transaction_window == 0 {
            return Err(ConfigError::EmptyWindow {
                name: "transaction",
            });
        }
        if feed.alert_window == 0 {
            return Err(ConfigError::EmptyWindow { name: "alert" });
        }
        if feed.volume_buckets == 0 {
            return Err(ConfigError::EmptyWindow { name: "volume" });
        }
        if feed.arrival_min_ms > feed.arrival_max_ms {
            return Err(ConfigError::ArrivalRange {
                min: feed.arrival_min_ms,
                max: feed.arrival_max_ms,
            });
        }
        if feed.arrival_max_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "arrival interval",
            });
        }
        if feed.gas_min >= feed.gas_max {
            return Err(ConfigError::GasRange {
                min: feed.gas_min,
                max: feed.gas_max,
            });
        }
        if feed.volume_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "volume interval",
            });
        }
        check_probability("confirmed probability", feed.confirmed_probability)?;
        check_probability("pending share", feed.pending_share)?;
        check_probability(
            "spurious error probability",
            feed.spurious_error_probability,
        )?;
        check_probability("express probability", feed.express_probability)?;

        if self.stats.jitter_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "stats jitter interval",
            });
        }

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}
