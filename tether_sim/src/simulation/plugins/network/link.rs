// tether_sim/src/simulation/plugins/network/link.rs

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::Serialize;

use crate::simulation::config::structs::Network;

/// Counters describing what the link did to the traffic it carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub sent: u64,
    pub dropped: u64,
    pub delivered: u64,
    pub undecodable: u64,
}

#[derive(Debug, Clone)]
struct InFlight {
    deliver_at: f64,
    payload: Vec<u8>,
}

/// A one-way, unreliable datagram link between the two peers.
///
/// Each payload independently either vanishes or arrives after a normally
/// distributed latency, so jitter can deliver payloads out of order.
#[derive(Debug, Clone)]
pub struct LoopbackLink {
    latency: Normal<f64>,
    drop_probability: f64,
    in_flight: Vec<InFlight>,
    stats: LinkStats,
}

impl LoopbackLink {
    pub fn new(
        latency_mean: f64,
        latency_stddev: f64,
        drop_probability: f64,
    ) -> Result<Self, NormalError> {
        Ok(Self {
            latency: Normal::new(latency_mean, latency_stddev)?,
            drop_probability: drop_probability.clamp(0.0, 1.0),
            in_flight: Vec::new(),
            stats: LinkStats::default(),
        })
    }

    pub fn from_config(config: &Network) -> Result<Self, NormalError> {
        Self::new(
            config.latency_mean,
            config.latency_stddev,
            config.drop_probability,
        )
    }

    /// Hands a payload to the link at time `now`.
    /// Returns the delivery time, or `None` if the payload was lost.
    pub fn send<R: Rng>(&mut self, payload: Vec<u8>, now: f64, rng: &mut R) -> Option<f64> {
        self.stats.sent += 1;
        if rng.gen_bool(self.drop_probability) {
            self.stats.dropped += 1;
            return None;
        }
        let deliver_at = now + self.latency.sample(rng).max(0.0);
        self.in_flight.push(InFlight {
            deliver_at,
            payload,
        });
        Some(deliver_at)
    }

    /// Removes and returns every payload due by `now`, in arrival order.
    pub fn receive(&mut self, now: f64) -> Vec<Vec<u8>> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|packet| packet.deliver_at <= now);
        self.in_flight = pending;
        due.sort_by(|a, b| a.deliver_at.total_cmp(&b.deliver_at));
        self.stats.delivered += due.len() as u64;
        due.into_iter().map(|packet| packet.payload).collect()
    }

    /// Counts a delivered payload the receiver could not decode.
    pub fn record_undecodable(&mut self) {
        self.stats.undecodable += 1;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn a_lossless_fixed_latency_link_delivers_everything_in_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut link = LoopbackLink::new(0.5, 0.0, 0.0).unwrap();

        assert_eq!(link.send(vec![1], 0.0, &mut rng), Some(0.5));
        assert_eq!(link.send(vec![2], 0.25, &mut rng), Some(0.75));

        assert!(link.receive(0.4).is_empty());
        assert_eq!(link.receive(0.6), vec![vec![1]]);
        assert_eq!(link.receive(1.0), vec![vec![2]]);
        assert_eq!(link.in_flight(), 0);
        assert_eq!(
            link.stats(),
            LinkStats {
                sent: 2,
                dropped: 0,
                delivered: 2,
                undecodable: 0
            }
        );
    }

    #[test]
    fn jitter_can_reorder_payloads() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut link = LoopbackLink::new(0.5, 0.3, 0.0).unwrap();

        let mut sent = Vec::new();
        for i in 0..200u8 {
            let at = link.send(vec![i], f64::from(i) * 0.01, &mut rng).unwrap();
            sent.push(at);
        }
        let received: Vec<u8> = link.receive(100.0).into_iter().map(|p| p[0]).collect();

        assert_eq!(received.len(), 200);
        // Arrival order follows delivery time, not send order.
        assert!(received.windows(2).any(|w| w[0] > w[1]));
        assert!(received
            .windows(2)
            .all(|w| sent[w[0] as usize] <= sent[w[1] as usize]));
    }

    #[test]
    fn drops_follow_the_configured_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut link = LoopbackLink::new(0.1, 0.0, 0.25).unwrap();
        for _ in 0..4_000 {
            link.send(Vec::new(), 0.0, &mut rng);
        }
        let stats = link.stats();
        assert_eq!(stats.sent, 4_000);
        assert!((800..1_200).contains(&stats.dropped), "dropped {}", stats.dropped);
        assert_eq!(link.in_flight() as u64, stats.sent - stats.dropped);
    }

    #[test]
    fn a_negative_spread_is_rejected() {
        assert!(LoopbackLink::new(0.1, -1.0, 0.0).is_err());
    }
}
