//! Rate-limit bookkeeping for the GitHub API
//!
//! GitHub reports the remaining request budget and the reset time on every
//! response:
//!
//! ```text
//! x-ratelimit-remaining: 0
//! x-ratelimit-reset: 1717171717   (epoch seconds)
//! ```
//!
//! The client keeps the most recent values in a [`RateLimitState`] and
//! consults it before sending the next request.

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::config::MAX_RATE_LIMIT_WAIT_SECS;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Rate-limit metadata from the last registry response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests left in the current window
    pub remaining: Option<u64>,
    /// When the window resets (epoch seconds)
    pub reset_at: Option<i64>,
}

impl RateLimitState {
    /// Read the rate-limit headers of a response
    ///
    /// `retry-after` (seconds) is used as the reset time when
    /// `x-ratelimit-reset` is absent.
    pub fn from_headers(headers: &HeaderMap, now: i64) -> Self {
        let remaining = header_value::<u64>(headers, REMAINING_HEADER);
        let reset_at = header_value::<i64>(headers, RESET_HEADER).or_else(|| {
            header_value::<i64>(headers, RETRY_AFTER_HEADER).map(|secs| now + secs)
        });

        Self {
            remaining,
            reset_at,
        }
    }

    /// True when the budget is spent and the window has not reset yet
    pub fn is_exhausted(&self, now: i64) -> bool {
        self.remaining == Some(0) && self.reset_at.is_some_and(|reset| reset > now)
    }

    /// How long to sleep until the window resets
    ///
    /// Zero when the reset time is unknown or already passed; capped at
    /// [`MAX_RATE_LIMIT_WAIT_SECS`].
    pub fn wait_duration(&self, now: i64) -> Duration {
        let secs = self
            .reset_at
            .map(|reset| (reset - now).clamp(0, MAX_RATE_LIMIT_WAIT_SECS))
            .unwrap_or(0);
        Duration::from_secs(secs as u64)
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn from_headers_reads_remaining_and_reset() {
        let state = RateLimitState::from_headers(
            &headers(&[(REMAINING_HEADER, "0"), (RESET_HEADER, "1700000100")]),
            1_700_000_000,
        );

        assert_eq!(
            state,
            RateLimitState {
                remaining: Some(0),
                reset_at: Some(1_700_000_100),
            }
        );
    }

    #[test]
    fn from_headers_falls_back_to_retry_after() {
        let state = RateLimitState::from_headers(&headers(&[(RETRY_AFTER_HEADER, "60")]), 1_000);

        assert_eq!(state.remaining, None);
        assert_eq!(state.reset_at, Some(1_060));
    }

    #[test]
    fn from_headers_ignores_garbage() {
        let state = RateLimitState::from_headers(
            &headers(&[(REMAINING_HEADER, "lots"), (RESET_HEADER, "soon")]),
            0,
        );

        assert_eq!(state, RateLimitState::default());
    }

    #[rstest]
    #[case(Some(0), Some(200), true)]
    #[case(Some(0), Some(100), false)] // reset reached
    #[case(Some(0), None, false)]
    #[case(Some(5), Some(200), false)]
    #[case(None, Some(200), false)]
    fn is_exhausted_returns_expected(
        #[case] remaining: Option<u64>,
        #[case] reset_at: Option<i64>,
        #[case] expected: bool,
    ) {
        let state = RateLimitState {
            remaining,
            reset_at,
        };
        assert_eq!(state.is_exhausted(100), expected);
    }

    #[rstest]
    #[case(Some(130), Duration::from_secs(30))]
    #[case(Some(50), Duration::ZERO)]
    #[case(None, Duration::ZERO)]
    #[case(Some(100 + 10 * MAX_RATE_LIMIT_WAIT_SECS), Duration::from_secs(MAX_RATE_LIMIT_WAIT_SECS as u64))]
    fn wait_duration_counts_down_to_reset(
        #[case] reset_at: Option<i64>,
        #[case] expected: Duration,
    ) {
        let state = RateLimitState {
            remaining: Some(0),
            reset_at,
        };
        assert_eq!(state.wait_duration(100), expected);
    }
}
