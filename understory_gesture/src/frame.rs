// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input frames: the only input the gesture engine consumes.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

/// Identifier of a physical contact, stable for the life of that contact.
pub type PointerId = u64;

/// One contact's position within a [`TouchFrame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Contact identifier.
    pub id: PointerId,
    /// Position in the surface's coordinate space.
    pub position: Point,
}

impl PointerSample {
    /// Creates a sample for pointer `id` at `(x, y)`.
    #[must_use]
    pub const fn new(id: PointerId, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// What happened in a [`TouchFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchAction {
    /// The first pointer went down.
    Down,
    /// Another pointer went down while at least one was already down.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// The last pointer went up.
    Up,
    /// A pointer went up while others stay down.
    PointerUp,
}

impl TouchAction {
    /// Returns `true` for [`TouchAction::Down`] and [`TouchAction::PointerDown`].
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down | Self::PointerDown)
    }

    /// Returns `true` for [`TouchAction::Up`] and [`TouchAction::PointerUp`].
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up | Self::PointerUp)
    }
}

impl TryFrom<i32> for TouchAction {
    type Error = FrameError;

    /// Decodes a platform masked action code (`0` down, `1` up, `2` move,
    /// `5` pointer down, `6` pointer up).
    fn try_from(code: i32) -> Result<Self, FrameError> {
        match code {
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            2 => Ok(Self::Move),
            5 => Ok(Self::PointerDown),
            6 => Ok(Self::PointerUp),
            other => Err(FrameError::UnknownAction(other)),
        }
    }
}

/// Reasons a [`TouchFrame`] is rejected by [`TouchFrame::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The frame carries no pointers.
    NoPointers,
    /// An up action without a lifting pointer index.
    MissingLiftingIndex,
    /// A lifting pointer index on an action that is not an up.
    UnexpectedLiftingIndex,
    /// The lifting pointer index does not address a pointer of the frame.
    LiftingIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of pointers in the frame.
        len: usize,
    },
    /// A [`TouchAction::Down`] or [`TouchAction::Up`] that does not carry
    /// exactly one pointer.
    SinglePointerExpected {
        /// The frame's action.
        action: TouchAction,
        /// Number of pointers in the frame.
        len: usize,
    },
    /// A platform action code with no [`TouchAction`] equivalent.
    UnknownAction(i32),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPointers => f.write_str("touch frame has no pointers"),
            Self::MissingLiftingIndex => f.write_str("up action without a lifting pointer"),
            Self::UnexpectedLiftingIndex => {
                f.write_str("lifting pointer given for an action that is not an up")
            }
            Self::LiftingIndexOutOfRange { index, len } => write!(
                f,
                "lifting pointer index {index} out of range for {len} pointers"
            ),
            Self::SinglePointerExpected { action, len } => write!(
                f,
                "{action:?} frame must carry exactly one pointer, got {len}"
            ),
            Self::UnknownAction(code) => write!(f, "unknown touch action code {code}"),
        }
    }
}

impl core::error::Error for FrameError {}

/// Snapshot of every contact at one instant, tagged with what changed.
///
/// For up actions the lifting pointer is still listed in `pointers` (at
/// `lifting_index`) but does not count as active.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchFrame {
    /// What happened.
    pub action: TouchAction,
    /// Every pointer in contact, including a lifting one.
    pub pointers: SmallVec<[PointerSample; 4]>,
    /// Index into `pointers` of the lifting pointer (up actions only).
    pub lifting_index: Option<usize>,
    /// Event time in milliseconds on the host's monotonic clock.
    pub timestamp: u64,
}

impl TouchFrame {
    /// Creates a frame with no lifting pointer.
    pub fn new(
        action: TouchAction,
        timestamp: u64,
        pointers: impl IntoIterator<Item = PointerSample>,
    ) -> Self {
        Self {
            action,
            pointers: pointers.into_iter().collect(),
            lifting_index: None,
            timestamp,
        }
    }

    /// First pointer down.
    #[must_use]
    pub fn down(timestamp: u64, pointer: PointerSample) -> Self {
        Self::new(TouchAction::Down, timestamp, [pointer])
    }

    /// Additional pointer down; `pointers` lists every contact.
    pub fn pointer_down(timestamp: u64, pointers: impl IntoIterator<Item = PointerSample>) -> Self {
        Self::new(TouchAction::PointerDown, timestamp, pointers)
    }

    /// Pointers moved.
    pub fn moved(timestamp: u64, pointers: impl IntoIterator<Item = PointerSample>) -> Self {
        Self::new(TouchAction::Move, timestamp, pointers)
    }

    /// Last pointer up.
    #[must_use]
    pub fn up(timestamp: u64, pointer: PointerSample) -> Self {
        Self {
            lifting_index: Some(0),
            ..Self::new(TouchAction::Up, timestamp, [pointer])
        }
    }

    /// One of several pointers up; `pointers` lists every contact.
    pub fn pointer_up(
        timestamp: u64,
        pointers: impl IntoIterator<Item = PointerSample>,
        lifting_index: usize,
    ) -> Self {
        Self {
            lifting_index: Some(lifting_index),
            ..Self::new(TouchAction::PointerUp, timestamp, pointers)
        }
    }

    /// Checks the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.pointers.is_empty() {
            return Err(FrameError::NoPointers);
        }
        // Down starts and Up ends a gesture, so only one contact can be involved.
        let single = matches!(self.action, TouchAction::Down | TouchAction::Up);
        if single && self.pointers.len() != 1 {
            return Err(FrameError::SinglePointerExpected {
                action: self.action,
                len: self.pointers.len(),
            });
        }
        match (self.action.is_up(), self.lifting_index) {
            (true, None) => Err(FrameError::MissingLiftingIndex),
            (false, Some(_)) => Err(FrameError::UnexpectedLiftingIndex),
            (true, Some(index)) if index >= self.pointers.len() => {
                Err(FrameError::LiftingIndexOutOfRange {
                    index,
                    len: self.pointers.len(),
                })
            }
            _ => Ok(()),
        }
    }

    /// The pointer lifting in this frame, if any.
    #[must_use]
    pub fn lifting(&self) -> Option<&PointerSample> {
        if !self.action.is_up() {
            return None;
        }
        self.lifting_index.and_then(|index| self.pointers.get(index))
    }

    /// Pointers that stay in contact after this frame.
    pub fn active(&self) -> impl Iterator<Item = &PointerSample> + '_ {
        let skip = self.lifting().and(self.lifting_index);
        self.pointers
            .iter()
            .enumerate()
            .filter(move |(index, _)| skip != Some(*index))
            .map(|(_, sample)| sample)
    }

    /// Number of pointers that stay in contact after this frame.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pointers.len() - usize::from(self.lifting().is_some())
    }

    /// Position of the pointer the action refers to.
    ///
    /// This is the lifting pointer for up actions and the first listed pointer
    /// otherwise.
    #[must_use]
    pub fn action_position(&self) -> Option<Point> {
        self.lifting()
            .or_else(|| self.pointers.first())
            .map(|sample| sample.position)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Point;

    use super::{FrameError, PointerSample, TouchAction, TouchFrame};

    #[test]
    fn decodes_platform_action_codes() {
        assert_eq!(TouchAction::try_from(0), Ok(TouchAction::Down));
        assert_eq!(TouchAction::try_from(6), Ok(TouchAction::PointerUp));
        assert_eq!(
            TouchAction::try_from(3),
            Err(FrameError::UnknownAction(3)),
            "cancel is not a supported action"
        );
    }

    #[test]
    fn lifting_pointer_is_not_active() {
        let frame = TouchFrame::pointer_up(
            10,
            [
                PointerSample::new(1, 0.0, 0.0),
                PointerSample::new(2, 10.0, 0.0),
                PointerSample::new(3, 20.0, 0.0),
            ],
            1,
        );
        assert_eq!(frame.validate(), Ok(()));
        assert_eq!(frame.active_count(), 2);
        let ids: Vec<u64> = frame.active().map(|p| p.id).collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(frame.action_position(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn last_up_leaves_nothing_active() {
        let frame = TouchFrame::up(5, PointerSample::new(7, 3.0, 4.0));
        assert_eq!(frame.active_count(), 0);
        assert_eq!(frame.active().count(), 0);
        assert_eq!(frame.action_position(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn validate_rejects_malformed_frames() {
        let empty = TouchFrame::moved(0, core::iter::empty());
        assert_eq!(empty.validate(), Err(FrameError::NoPointers));

        let mut up = TouchFrame::up(0, PointerSample::new(1, 0.0, 0.0));
        up.lifting_index = None;
        assert_eq!(up.validate(), Err(FrameError::MissingLiftingIndex));

        up.lifting_index = Some(4);
        assert_eq!(
            up.validate(),
            Err(FrameError::LiftingIndexOutOfRange { index: 4, len: 1 })
        );

        let mut moved = TouchFrame::moved(0, [PointerSample::new(1, 0.0, 0.0)]);
        moved.lifting_index = Some(0);
        assert_eq!(moved.validate(), Err(FrameError::UnexpectedLiftingIndex));
        assert_eq!(moved.active_count(), 1, "non-up frames never lift");
    }

    #[test]
    fn first_down_and_last_up_carry_one_pointer() {
        let pair = [
            PointerSample::new(1, 0.0, 0.0),
            PointerSample::new(2, 10.0, 0.0),
        ];
        let down = TouchFrame::new(TouchAction::Down, 0, pair);
        assert_eq!(
            down.validate(),
            Err(FrameError::SinglePointerExpected {
                action: TouchAction::Down,
                len: 2,
            })
        );

        let mut up = TouchFrame::pointer_up(5, pair, 0);
        up.action = TouchAction::Up;
        assert_eq!(
            up.validate(),
            Err(FrameError::SinglePointerExpected {
                action: TouchAction::Up,
                len: 2,
            })
        );

        up.action = TouchAction::PointerUp;
        assert_eq!(up.validate(), Ok(()), "pointer up may list several contacts");
    }
}
