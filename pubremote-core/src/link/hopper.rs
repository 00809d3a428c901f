//! Channel hopping while searching for the vehicle

/// Lowest usable radio channel
pub const MIN_CHANNEL: u8 = 1;

/// Highest usable radio channel
pub const MAX_CHANNEL: u8 = 14;

/// Next channel in the search cycle, wrapping 14 -> 1
pub fn next_channel(channel: u8) -> u8 {
    (channel % MAX_CHANNEL) + MIN_CHANNEL
}

/// Steps through channels after a period of radio silence
#[derive(Debug, Clone)]
pub struct ChannelHopper {
    channel: u8,
    quiet_since_ms: u64,
    interval_ms: u64,
}

impl ChannelHopper {
    pub fn new(channel: u8, interval_ms: u32) -> Self {
        Self {
            channel,
            quiet_since_ms: 0,
            interval_ms: interval_ms as u64,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Follow a channel chosen elsewhere
    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
    }

    /// A datagram was received; restart the silence window
    pub fn heard(&mut self, now_ms: u64) {
        self.quiet_since_ms = now_ms;
    }

    /// Returns the channel to switch to, if a hop is due
    ///
    /// Silence only accumulates while `searching`.
    pub fn poll(&mut self, now_ms: u64, searching: bool) -> Option<u8> {
        if !searching {
            self.quiet_since_ms = now_ms;
            return None;
        }
        if now_ms.saturating_sub(self.quiet_since_ms) <= self.interval_ms {
            return None;
        }
        self.channel = next_channel(self.channel);
        self.quiet_since_ms = now_ms;
        Some(self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_channel_wraps() {
        assert_eq!(next_channel(1), 2);
        assert_eq!(next_channel(13), 14);
        assert_eq!(next_channel(14), 1);
        assert_eq!(next_channel(0), 1);
    }

    #[test]
    fn test_hops_after_interval() {
        let mut hopper = ChannelHopper::new(1, 200);
        hopper.heard(0);
        assert_eq!(hopper.poll(200, true), None);
        assert_eq!(hopper.poll(201, true), Some(2));
        assert_eq!(hopper.poll(300, true), None);
        assert_eq!(hopper.poll(402, true), Some(3));
    }

    #[test]
    fn test_traffic_delays_hop() {
        let mut hopper = ChannelHopper::new(5, 200);
        hopper.heard(150);
        assert_eq!(hopper.poll(300, true), None);
        assert_eq!(hopper.poll(351, true), Some(6));
    }

    #[test]
    fn test_no_hop_when_not_searching() {
        let mut hopper = ChannelHopper::new(14, 200);
        assert_eq!(hopper.poll(1000, false), None);
        assert_eq!(hopper.channel(), 14);
        // Silence restarts when searching begins
        assert_eq!(hopper.poll(1100, true), None);
        assert_eq!(hopper.poll(1201, true), Some(1));
    }
}
