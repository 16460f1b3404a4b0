//! Producer-side feed logic
//!
//! The producer fills the sequence queue from the host. It has jobs the
//! controller never sees: a boot handshake whose progress is shown as the
//! status line, periodic refill requests once the queue runs low, and
//! watching for the host going quiet. [`HostFeed`] ties them together.

use crate::config::FeedConfig;

/// Why the device is asking the host for steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestKind {
    /// First batch after power-up
    Boot,
    /// Top-up because the queue is running low
    Refill,
}

/// Decides when to ask for more steps after boot
#[derive(Debug, Clone)]
pub struct RefillPolicy {
    low_water: usize,
    interval_ms: u32,
    last_check_ms: u32,
}

impl RefillPolicy {
    /// Create a policy whose first check happens one interval after `now_ms`
    pub fn new(config: &FeedConfig, now_ms: u32) -> Self {
        Self {
            low_water: config.low_water as usize,
            interval_ms: config.refill_interval_ms,
            last_check_ms: now_ms,
        }
    }

    /// Check whether a refill should be requested
    ///
    /// The queue length is only looked at once per interval; every check
    /// restarts the interval whether or not it asks for more.
    pub fn poll(&mut self, now_ms: u32, queued: usize) -> Option<RequestKind> {
        if now_ms.wrapping_sub(self.last_check_ms) < self.interval_ms {
            return None;
        }
        self.last_check_ms = now_ms;

        if queued < self.low_water {
            Some(RequestKind::Refill)
        } else {
            None
        }
    }
}

/// Boot handshake phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootPhase {
    /// Nothing heard from the host yet
    WaitingForHost,
    /// Host answered; holding the milestone on screen
    Linked { since_ms: u32 },
    /// Boot batch requested, waiting for the host to answer
    Requesting { since_ms: u32 },
    /// First batch answered; holding the milestone on screen
    Loaded { since_ms: u32 },
    /// Handshake done, normal playback
    Ready,
}

/// Tracks the boot handshake and the status text that goes with it
#[derive(Debug, Clone)]
pub struct BootProgress {
    phase: BootPhase,
    hold_ms: u32,
    retry_ms: u32,
}

impl BootProgress {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            phase: BootPhase::WaitingForHost,
            hold_ms: config.boot_hold_ms,
            retry_ms: config.boot_retry_ms,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Boot handshake finished
    pub fn is_complete(&self) -> bool {
        self.phase == BootPhase::Ready
    }

    /// Status line for the current phase (empty once ready)
    pub fn status(&self) -> &'static str {
        match self.phase {
            BootPhase::WaitingForHost => "Waiting for host...",
            BootPhase::Linked { .. } => "Host linked!",
            BootPhase::Requesting { .. } => "Loading steps..",
            BootPhase::Loaded { .. } => "Steps loaded!",
            BootPhase::Ready => "",
        }
    }

    /// Any frame from the host counts as a link
    pub fn host_seen(&mut self, now_ms: u32) {
        if self.phase == BootPhase::WaitingForHost {
            self.phase = BootPhase::Linked { since_ms: now_ms };
        }
    }

    /// The host answered with steps or closed a batch
    ///
    /// An empty batch still completes the handshake; a host with nothing to
    /// play must not leave the device asking forever.
    pub fn batch_received(&mut self, now_ms: u32) {
        match self.phase {
            BootPhase::WaitingForHost | BootPhase::Linked { .. } | BootPhase::Requesting { .. } => {
                self.phase = BootPhase::Loaded { since_ms: now_ms };
            }
            BootPhase::Loaded { .. } | BootPhase::Ready => {}
        }
    }

    /// Advance timed phases; returns a boot request to send, if one is due
    pub fn poll(&mut self, now_ms: u32) -> Option<RequestKind> {
        match self.phase {
            BootPhase::Linked { since_ms } if now_ms.wrapping_sub(since_ms) >= self.hold_ms => {
                self.phase = BootPhase::Requesting { since_ms: now_ms };
                Some(RequestKind::Boot)
            }
            BootPhase::Requesting { since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.retry_ms =>
            {
                self.phase = BootPhase::Requesting { since_ms: now_ms };
                Some(RequestKind::Boot)
            }
            BootPhase::Loaded { since_ms } if now_ms.wrapping_sub(since_ms) >= self.hold_ms => {
                self.phase = BootPhase::Ready;
                None
            }
            _ => None,
        }
    }
}

/// Something changed about the host link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Nothing heard for longer than the timeout
    Lost,
    /// A frame arrived after the link was lost
    Restored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum LinkState {
    NeverSeen,
    Up { last_ms: u32 },
    Lost,
}

/// Notices when the host stops talking
///
/// Only a link that was up can be lost; before the first frame the boot
/// handshake already says we are waiting.
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: LinkState,
    timeout_ms: u32,
}

impl LinkMonitor {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            state: LinkState::NeverSeen,
            timeout_ms: config.link_timeout_ms,
        }
    }

    pub fn is_lost(&self) -> bool {
        self.state == LinkState::Lost
    }

    /// Any frame from the host
    pub fn frame_received(&mut self, now_ms: u32) -> Option<LinkEvent> {
        let was_lost = self.is_lost();
        self.state = LinkState::Up { last_ms: now_ms };
        was_lost.then_some(LinkEvent::Restored)
    }

    pub fn poll(&mut self, now_ms: u32) -> Option<LinkEvent> {
        match self.state {
            LinkState::Up { last_ms }
                if self.timeout_ms > 0 && now_ms.wrapping_sub(last_ms) >= self.timeout_ms =>
            {
                self.state = LinkState::Lost;
                Some(LinkEvent::Lost)
            }
            _ => None,
        }
    }
}

/// Status shown while the host link is down
pub const LINK_LOST_STATUS: &str = "Host lost!";

/// Producer state: boot handshake, refill timing and link watch
#[derive(Debug, Clone)]
pub struct HostFeed {
    boot: BootProgress,
    refill: RefillPolicy,
    link: LinkMonitor,
}

impl HostFeed {
    pub fn new(config: &FeedConfig, now_ms: u32) -> Self {
        Self {
            boot: BootProgress::new(config),
            refill: RefillPolicy::new(config, now_ms),
            link: LinkMonitor::new(config),
        }
    }

    pub fn boot(&self) -> &BootProgress {
        &self.boot
    }

    pub fn link(&self) -> &LinkMonitor {
        &self.link
    }

    /// Any frame from the host
    pub fn frame_received(&mut self, now_ms: u32) -> Option<LinkEvent> {
        self.boot.host_seen(now_ms);
        self.link.frame_received(now_ms)
    }

    /// The host delivered a step or closed a batch
    pub fn batch_received(&mut self, now_ms: u32) {
        self.boot.batch_received(now_ms);
    }

    /// Check for a lost link
    pub fn poll_link(&mut self, now_ms: u32) -> Option<LinkEvent> {
        self.link.poll(now_ms)
    }

    /// Request to send, if one is due
    ///
    /// Nothing advances in standby: no boot milestones and no refills.
    pub fn poll_requests(
        &mut self,
        now_ms: u32,
        queued: usize,
        standby: bool,
    ) -> Option<RequestKind> {
        if standby {
            None
        } else if self.boot.is_complete() {
            self.refill.poll(now_ms, queued)
        } else {
            self.boot.poll(now_ms)
        }
    }

    /// Text that should replace the face's own status line, if any
    pub fn notice(&self) -> Option<&'static str> {
        if self.link.is_lost() {
            Some(LINK_LOST_STATUS)
        } else if self.boot.is_complete() {
            None
        } else {
            Some(self.boot.status())
        }
    }
}
