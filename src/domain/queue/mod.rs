// Operation queue and position bookkeeping across chained remuxes

use crate::domain::errors::*;
use crate::domain::model::PendingOperation;

/// Ordered list of pending edits; insertion order is execution order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationQueue {
    operations: Vec<PendingOperation>,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, operation: PendingOperation) {
        self.operations.push(operation);
    }

    /// Remove the entry at `index`, returning it if it existed
    pub fn remove_at(&mut self, index: usize) -> Option<PendingOperation> {
        if index < self.operations.len() {
            Some(self.operations.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Owned copy of the queue contents
    pub fn snapshot(&self) -> Vec<PendingOperation> {
        self.operations.clone()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingOperation> {
        self.operations.iter()
    }
}

impl FromIterator<PendingOperation> for OperationQueue {
    fn from_iter<I: IntoIterator<Item = PendingOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

/// Where a subtitle track of an intermediate file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    /// Track at this position in the snapshot the queue was built against
    Original(usize),
    /// Track appended by the n-th add operation of the batch
    Added(usize),
}

/// Translates snapshot positions into positions inside the current intermediate file.
///
/// Mirrors the subtitle layout of the file each stage reads: removals drop an
/// entry, additions append one, default changes leave the layout alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTracker {
    live: Vec<TrackOrigin>,
    added: usize,
}

impl PositionTracker {
    /// Start from a snapshot holding `subtitle_count` tracks
    pub fn new(subtitle_count: usize) -> Self {
        Self {
            live: (0..subtitle_count).map(TrackOrigin::Original).collect(),
            added: 0,
        }
    }

    /// Current position of the snapshot track at `original_position`
    pub fn resolve(&self, original_position: usize) -> Result<usize, DomainError> {
        self.live
            .iter()
            .position(|origin| *origin == TrackOrigin::Original(original_position))
            .ok_or_else(|| {
                DomainError::OutOfRange(format!(
                    "Subtitle track {} is no longer present in the edited file",
                    original_position
                ))
            })
    }

    /// Live position an operation should target, or None for additions
    pub fn resolve_operation(&self, operation: &PendingOperation) -> Result<Option<usize>, DomainError> {
        operation
            .target_position()
            .map(|position| self.resolve(position))
            .transpose()
    }

    /// Record that `operation` was applied successfully
    pub fn apply(&mut self, operation: &PendingOperation) -> Result<(), DomainError> {
        match operation {
            PendingOperation::AddSubtitle { .. } => {
                self.live.push(TrackOrigin::Added(self.added));
                self.added += 1;
            }
            PendingOperation::RemoveSubtitle { target_position } => {
                let live = self.resolve(*target_position)?;
                self.live.remove(live);
            }
            PendingOperation::SetDefaultSubtitle { .. } => {}
        }
        Ok(())
    }

    /// Origins of the tracks in the current file, in position order
    pub fn layout(&self) -> &[TrackOrigin] {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_insertion_order() {
        let mut queue = OperationQueue::new();
        queue.enqueue(PendingOperation::remove(0));
        queue.enqueue(PendingOperation::set_default(1));
        queue.enqueue(PendingOperation::add("en.srt", Some("en"), None, true));

        let snapshot = queue.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0], PendingOperation::remove(0));
        assert_eq!(snapshot[1], PendingOperation::set_default(1));
    }

    #[test]
    fn test_queue_remove_at_and_clear() {
        let mut queue: OperationQueue = vec![
            PendingOperation::remove(0),
            PendingOperation::remove(1),
            PendingOperation::remove(2),
        ]
        .into_iter()
        .collect();

        assert_eq!(queue.remove_at(1), Some(PendingOperation::remove(1)));
        assert_eq!(queue.remove_at(5), None);
        assert_eq!(queue.len(), 2);

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut queue = OperationQueue::new();
        queue.enqueue(PendingOperation::remove(0));

        let mut snapshot = queue.snapshot();
        snapshot.clear();
        snapshot.push(PendingOperation::remove(9));

        assert_eq!(queue.snapshot(), vec![PendingOperation::remove(0)]);
    }

    #[test]
    fn test_tracker_shifts_positions_after_removal() {
        let mut tracker = PositionTracker::new(3);
        tracker.apply(&PendingOperation::remove(0)).unwrap();

        assert_eq!(tracker.resolve(1).unwrap(), 0);
        assert_eq!(tracker.resolve(2).unwrap(), 1);
        assert!(tracker.resolve(0).is_err());
    }

    #[test]
    fn test_tracker_appends_added_tracks() {
        let mut tracker = PositionTracker::new(1);
        tracker
            .apply(&PendingOperation::add("a.srt", None, None, false))
            .unwrap();
        tracker
            .apply(&PendingOperation::add("b.srt", None, None, false))
            .unwrap();
        tracker.apply(&PendingOperation::remove(0)).unwrap();

        assert_eq!(
            tracker.layout(),
            &[TrackOrigin::Added(0), TrackOrigin::Added(1)]
        );
    }

    #[test]
    fn test_tracker_double_remove_fails() {
        let mut tracker = PositionTracker::new(2);
        tracker.apply(&PendingOperation::remove(1)).unwrap();
        assert!(matches!(
            tracker.resolve_operation(&PendingOperation::set_default(1)),
            Err(DomainError::OutOfRange(_))
        ));
        assert!(tracker.apply(&PendingOperation::remove(1)).is_err());
    }

    #[test]
    fn test_tracker_resolves_operations() {
        let mut tracker = PositionTracker::new(3);
        tracker.apply(&PendingOperation::remove(1)).unwrap();

        assert_eq!(
            tracker
                .resolve_operation(&PendingOperation::set_default(2))
                .unwrap(),
            Some(1)
        );
        assert_eq!(
            tracker
                .resolve_operation(&PendingOperation::add("x.srt", None, None, false))
                .unwrap(),
            None
        );
    }
}
