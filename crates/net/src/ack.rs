use rewind_common::TickId;

/// Highest input id the server has confirmed receiving.
///
/// Acknowledgements may arrive duplicated or out of order; only a larger id
/// moves the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckTracker {
    acked: Option<TickId>,
}

impl AckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first acknowledgement of the session.
    pub fn acked(&self) -> Option<TickId> {
        self.acked
    }

    /// Record an acknowledgement. Returns true if the cursor advanced.
    pub fn acknowledge(&mut self, id: TickId) -> bool {
        if self.acked.is_some_and(|acked| acked >= id) {
            return false;
        }
        self.acked = Some(id);
        true
    }

    /// First id the server has not confirmed.
    pub fn first_unacked(&self) -> TickId {
        self.acked.map_or(TickId::ZERO, TickId::next)
    }

    pub fn reset(&mut self) {
        self.acked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_acks_keep_the_maximum() {
        let mut acks = AckTracker::new();
        for id in [3, 1, 7, 2] {
            acks.acknowledge(TickId(id));
        }
        assert_eq!(acks.acked(), Some(TickId(7)));
    }

    #[test]
    fn duplicates_do_not_advance() {
        let mut acks = AckTracker::new();
        assert!(acks.acknowledge(TickId(4)));
        assert!(!acks.acknowledge(TickId(4)));
        assert!(!acks.acknowledge(TickId(2)));
        assert!(acks.acknowledge(TickId(5)));
    }

    #[test]
    fn first_unacked_starts_at_zero() {
        let mut acks = AckTracker::new();
        assert_eq!(acks.first_unacked(), TickId(0));
        acks.acknowledge(TickId(0));
        assert_eq!(acks.first_unacked(), TickId(1));
        acks.reset();
        assert_eq!(acks.acked(), None);
    }
}
