use rewind_common::TickId;
use rewind_input::InputFlags;
use rewind_kernel::TickRing;

use crate::message::InputBatch;

/// Packages the unacknowledged input window `[acked + 1, current)` for sending.
#[derive(Debug, Clone, Default)]
pub struct OutboundBatcher {
    truncated: u64,
}

impl OutboundBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of windows cut short because part of their history was overwritten.
    pub fn truncated_windows(&self) -> u64 {
        self.truncated
    }

    /// Collect the unacknowledged window, or `None` when there is nothing to send.
    ///
    /// `first_id` is `clamp(acked + 1, 0, current)`. If the window has grown past
    /// the ring capacity the oldest ids are already overwritten; the batch is then
    /// cut at the first unreadable slot so the receiver never infers an id for
    /// another tick's flags.
    pub fn collect(
        &mut self,
        acked: Option<TickId>,
        current: TickId,
        inputs: &TickRing<InputFlags>,
    ) -> Option<InputBatch> {
        let first_id = acked.map_or(TickId::ZERO, TickId::next).min(current);
        let length = current.since(first_id).unwrap_or(0);
        if length == 0 {
            return None;
        }

        let mut flags = Vec::with_capacity(length as usize);
        for offset in 0..length {
            let id = first_id.offset(offset);
            match inputs.get(id) {
                Some(f) => flags.push(*f),
                None => {
                    self.truncated += 1;
                    tracing::warn!(
                        %first_id,
                        %id,
                        window = length,
                        capacity = inputs.capacity(),
                        "unacknowledged window exceeds input history; truncating batch"
                    );
                    break;
                }
            }
        }

        if flags.is_empty() {
            return None;
        }
        tracing::trace!(%first_id, len = flags.len(), "input batch ready");
        Some(InputBatch { first_id, flags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_input::Axis;

    fn filled(capacity: usize, count: u32) -> TickRing<InputFlags> {
        let mut ring = TickRing::new(capacity);
        for id in 0..count {
            let flags = InputFlags::from_byte((id % 64) as u8);
            ring.write(TickId(id), flags);
        }
        ring
    }

    #[test]
    fn window_starts_after_ack() {
        let ring = filled(128, 10);
        let mut batcher = OutboundBatcher::new();
        let batch = batcher.collect(Some(TickId(4)), TickId(10), &ring).unwrap();
        assert_eq!(batch.first_id, TickId(5));
        assert_eq!(batch.len(), 5);
        for (frame, id) in batch.frames().zip(5u32..10) {
            assert_eq!(frame.id, TickId(id));
            assert_eq!(Some(&frame.flags), ring.get(TickId(id)));
        }
    }

    #[test]
    fn nothing_acked_sends_from_zero() {
        let ring = filled(128, 3);
        let batch = OutboundBatcher::new()
            .collect(None, TickId(3), &ring)
            .unwrap();
        assert_eq!(batch.first_id, TickId(0));
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn fully_acked_sends_nothing() {
        let ring = filled(128, 3);
        let mut batcher = OutboundBatcher::new();
        assert!(batcher.collect(Some(TickId(2)), TickId(3), &ring).is_none());
        assert!(batcher.collect(None, TickId(0), &ring).is_none());
    }

    #[test]
    fn ack_beyond_current_is_clamped() {
        let ring = filled(128, 3);
        assert!(
            OutboundBatcher::new()
                .collect(Some(TickId(40)), TickId(3), &ring)
                .is_none()
        );
    }

    #[test]
    fn oversized_window_is_truncated_at_overwritten_history() {
        let mut ring = TickRing::new(4);
        let step = InputFlags::EMPTY.with_movement(Axis::Positive, Axis::Neutral);
        for id in 0..6 {
            ring.write(TickId(id), step);
        }
        let mut batcher = OutboundBatcher::new();
        // ids 0 and 1 were overwritten by 4 and 5
        assert!(batcher.collect(None, TickId(6), &ring).is_none());
        assert_eq!(batcher.truncated_windows(), 1);

        let batch = batcher.collect(Some(TickId(1)), TickId(6), &ring).unwrap();
        assert_eq!(batch.first_id, TickId(2));
        assert_eq!(batch.len(), 4);
    }
}
