//! Cancellable deferred action driven by the caller's clock.
//!
//! Each `schedule` bumps a generation counter and hands back a token. Only
//! the token of the live generation can fire, so a cancelled or superseded
//! schedule can never act late.

use serde::{Deserialize, Serialize};

/// Handle identifying one scheduling of a [`CommitTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    token: TimerToken,
    due_at: f64,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct CommitTimer<T> {
    delay: f64,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> CommitTimer<T> {
    pub fn new(delay_seconds: f64) -> Self {
        Self {
            delay: delay_seconds.max(0.0),
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Schedule `payload` to fire `delay` after `now`, replacing anything
    /// already pending.
    pub fn schedule(&mut self, now: f64, payload: T) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.pending = Some(Pending {
            token,
            due_at: now + self.delay,
            payload,
        });
        token
    }

    /// Drop the pending action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<(&T, TimerToken)> {
        self.pending.as_ref().map(|p| (&p.payload, p.token))
    }

    pub fn due_at(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    /// Fire the pending action if `token` is the live generation.
    pub fn fire(&mut self, token: TimerToken) -> Option<T> {
        match &self.pending {
            Some(p) if p.token == token => self.pending.take().map(|p| p.payload),
            _ => None,
        }
    }

    /// Fire the pending action once `now` has reached its due time.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        let token = match &self.pending {
            Some(p) if now >= p.due_at => p.token,
            _ => return None,
        };
        self.fire(token)
    }
}

impl<T: PartialEq> CommitTimer<T> {
    pub fn is_pending_for(&self, payload: &T) -> bool {
        matches!(&self.pending, Some(p) if &p.payload == payload)
    }
}
