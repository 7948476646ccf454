//! Index-based enum codec.
//!
//! Enum values travel as a u16 index into an explicit, ordered mapping that
//! each type declares by implementing [`WireEnum`]. Both sides of a channel
//! must agree on the mapping; appending new values keeps old indices stable,
//! reordering does not.

/// Maps an enum to and from its u16 wire index.
///
/// The two methods must be inverse to each other: `from_index(v.index())`
/// yields `Some(v)` for every value `v`, and `from_index` returns `None` for
/// every index outside the mapping.
///
/// ```rust
/// use plugin_messaging::codec::WireEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Action {
///     Join,
///     Leave,
///     Transfer,
/// }
///
/// impl WireEnum for Action {
///     fn index(self) -> u16 {
///         match self {
///             Action::Join => 0,
///             Action::Leave => 1,
///             Action::Transfer => 2,
///         }
///     }
///
///     fn from_index(index: u16) -> Option<Self> {
///         match index {
///             0 => Some(Action::Join),
///             1 => Some(Action::Leave),
///             2 => Some(Action::Transfer),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait WireEnum: Sized + Copy {
    /// Wire index of this value.
    fn index(self) -> u16;

    /// Value for a wire index, or `None` if the index maps to nothing.
    fn from_index(index: u16) -> Option<Self>;
}
