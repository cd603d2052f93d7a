use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier of a circle: its position in the input sequence.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<CircleId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleId(NonZeroU32);

impl CircleId {
    /// Largest index with a distinct id.
    pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    /// Create an id from a 0-based index by storing index+1.
    ///
    /// Indices above [`CircleId::MAX_INDEX`] saturate to the id of
    /// `MAX_INDEX`; callers that index larger sets must reject them first
    /// (the relaxation solver does).
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index.min(Self::MAX_INDEX)).unwrap_or(u32::MAX - 1);
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CircleId({})", self.index())
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
