//! # Metric Ticker
//!
//! Periodic task that nudges the dashboard panels.
//!
//! The core panels are deterministic; randomness is supplied here through
//! an RNG-backed `JitterSource`. The task stops when the shutdown channel
//! flips to `true` or its sender is dropped.

use qsn_core::{JitterSource, MetricsBoard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// `JitterSource` backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngJitter<R>(pub R);

impl<R: Rng> JitterSource for RngJitter<R> {
    fn sample(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.0.gen_range(low..=high)
    }

    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        if numerator == 0 || denominator == 0 {
            return false;
        }
        if numerator >= denominator {
            return true;
        }
        self.0.gen_ratio(numerator, denominator)
    }
}

/// Jitter from a fixed seed, or from OS entropy when `seed` is `None`.
pub fn seeded_jitter(seed: Option<u64>) -> RngJitter<StdRng> {
    match seed {
        Some(seed) => RngJitter(StdRng::seed_from_u64(seed)),
        None => RngJitter(StdRng::from_entropy()),
    }
}

/// Spawn the ticker. Returns the task handle; await it after signalling
/// shutdown.
pub fn spawn_ticker(
    board: Arc<RwLock<MetricsBoard>>,
    period: Duration,
    mut jitter: RngJitter<StdRng>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!(period_ms = period.as_millis() as u64, "metric ticker started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let mut board = board.write().await;
                    board.step(&mut jitter);
                    trace!(tick = board.tick(), "metrics stepped");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("metric ticker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_jitter_respects_bounds() {
        let mut jitter = seeded_jitter(Some(42));
        for _ in 0..1_000 {
            let value = jitter.sample(-10, 9);
            assert!((-10..=9).contains(&value));
        }
        assert_eq!(jitter.sample(5, 5), 5);
        assert_eq!(jitter.sample(7, 3), 7);
    }

    #[test]
    fn rng_jitter_chance_edges() {
        let mut jitter = seeded_jitter(Some(1));
        assert!(!jitter.chance(0, 10));
        assert!(!jitter.chance(1, 0));
        assert!(jitter.chance(10, 10));
    }

    #[test]
    fn same_seed_same_board() {
        let mut a = MetricsBoard::new();
        let mut b = MetricsBoard::new();
        let mut ja = seeded_jitter(Some(9));
        let mut jb = seeded_jitter(Some(9));
        for _ in 0..20 {
            a.step(&mut ja);
            b.step(&mut jb);
        }
        assert_eq!(a, b);
        assert!(a.within_bounds());
    }

    #[tokio::test]
    async fn ticker_steps_and_stops() {
        let board = Arc::new(RwLock::new(MetricsBoard::new()));
        let (tx, rx) = watch::channel(false);
        let handle = spawn_ticker(
            Arc::clone(&board),
            Duration::from_millis(10),
            seeded_jitter(Some(3)),
            rx,
        );

        tokio::time::sleep(Duration::from_millis(60)).await;
        tx.send(true).ok();
        assert!(handle.await.is_ok());

        let ticks = board.read().await.tick();
        assert!(ticks >= 1, "ticker never stepped");

        // No further steps once stopped
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(board.read().await.tick(), ticks);
    }
}
