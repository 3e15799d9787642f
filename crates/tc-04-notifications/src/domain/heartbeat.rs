//! Heart-beat negotiation.
//!
//! The client offers `cx,cy` in CONNECT; the server answers `sx,sy` in
//! CONNECTED. Zero means "cannot" / "do not want".
//!
//! | Direction | Interval |
//! |-----------|----------|
//! | client → server | `max(cx, sy)` if both non-zero, else off |
//! | server → client | `max(cy, sx)` if both non-zero, else off |

use super::errors::StompError;
use std::time::Duration;

/// Tolerated silence, as a multiple of the negotiated incoming interval.
pub const SILENCE_TOLERANCE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeartBeat {
    /// Milliseconds between frames we send.
    pub outgoing_ms: u64,
    /// Milliseconds between frames we expect.
    pub incoming_ms: u64,
}

impl HeartBeat {
    pub fn new(outgoing_ms: u64, incoming_ms: u64) -> Self {
        Self {
            outgoing_ms,
            incoming_ms,
        }
    }

    /// `heart-beat` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("{},{}", self.outgoing_ms, self.incoming_ms)
    }

    pub fn parse(value: &str) -> Result<Self, StompError> {
        let invalid = || StompError::InvalidHeartBeat(value.to_string());
        let (a, b) = value.split_once(',').ok_or_else(invalid)?;
        Ok(Self {
            outgoing_ms: a.trim().parse().map_err(|_| invalid())?,
            incoming_ms: b.trim().parse().map_err(|_| invalid())?,
        })
    }

    /// Intervals to use given the server's `heart-beat` header (`self` is
    /// what the client offered). A missing header disables both directions.
    #[must_use]
    pub fn negotiate(&self, server: Option<HeartBeat>) -> HeartBeat {
        let server = server.unwrap_or_default();
        let pick = |ours: u64, theirs: u64| {
            if ours == 0 || theirs == 0 {
                0
            } else {
                ours.max(theirs)
            }
        };
        HeartBeat {
            outgoing_ms: pick(self.outgoing_ms, server.incoming_ms),
            incoming_ms: pick(self.incoming_ms, server.outgoing_ms),
        }
    }

    #[must_use]
    pub fn send_every(&self) -> Option<Duration> {
        (self.outgoing_ms > 0).then(|| Duration::from_millis(self.outgoing_ms))
    }

    /// Silence after which the connection is considered dead.
    #[must_use]
    pub fn dead_after(&self) -> Option<Duration> {
        (self.incoming_ms > 0).then(|| Duration::from_millis(self.incoming_ms) * SILENCE_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiation_takes_slower_side() {
        let ours = HeartBeat::new(4000, 4000);
        let agreed = ours.negotiate(Some(HeartBeat::new(10_000, 1000)));

        assert_eq!(agreed, HeartBeat::new(4000, 10_000));
        assert_eq!(agreed.send_every(), Some(Duration::from_secs(4)));
        assert_eq!(agreed.dead_after(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_zero_disables_direction() {
        let ours = HeartBeat::new(4000, 4000);
        assert_eq!(
            ours.negotiate(Some(HeartBeat::new(0, 5000))),
            HeartBeat::new(5000, 0)
        );
        assert_eq!(ours.negotiate(None), HeartBeat::default());
        assert_eq!(HeartBeat::default().dead_after(), None);
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(HeartBeat::parse("0, 250").unwrap(), HeartBeat::new(0, 250));
        assert_eq!(HeartBeat::new(4000, 4000).header_value(), "4000,4000");
        assert!(matches!(
            HeartBeat::parse("fast"),
            Err(StompError::InvalidHeartBeat(_))
        ));
    }
}
