// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use embassy_time::{Duration, Instant};

/// The two broadcaster timers as plain deadlines, awaited by the advertising task.
/// `Instant::MAX` means disarmed.
pub struct Deadlines {
    event_period: Duration,
    next_event: Instant,
    next_interval: Instant,
}

impl Deadlines {
    pub const fn new() -> Self {
        Self {
            event_period: Duration::MAX,
            next_event: Instant::MAX,
            next_interval: Instant::MAX,
        }
    }

    pub fn next_event(&self) -> Instant {
        self.next_event
    }

    pub fn next_interval(&self) -> Instant {
        self.next_interval
    }

    /// Repeating: the next deadline is one period after the previous one, not after now.
    pub fn event_fired(&mut self) {
        self.next_event += self.event_period;
    }

    /// One-shot.
    pub fn interval_fired(&mut self) {
        self.next_interval = Instant::MAX;
    }
}

impl broadcaster::Timers for Deadlines {
    fn start_event(&mut self, period_ms: u32) {
        self.event_period = Duration::from_millis(period_ms.into());
        self.next_event = Instant::now() + self.event_period;
    }

    fn start_interval(&mut self, delay_ms: u32) {
        self.next_interval = Instant::now() + Duration::from_millis(delay_ms.into());
    }
}
