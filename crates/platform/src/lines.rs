//! Digital line abstractions
//!
//! All traits here speak *logical* levels: `true` means "condition asserted"
//! (jack present, amplifier enabled) regardless of the electrical wiring.
//! Backends resolve active-low lines with [`Polarity`] so the driver never
//! sees raw electrical state.

// ---------------------------------------------------------------------------
// Capacity bounds
// ---------------------------------------------------------------------------

/// Maximum number of output lines in one bank.
///
/// Bounds the fan-out level vector so drive operations never allocate.
pub const MAX_OUTPUT_LINES: usize = 8;

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// Electrical polarity of a line, resolved by the board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Electrical high is logical `true`.
    ActiveHigh,
    /// Electrical low is logical `true`.
    ActiveLow,
}

impl Polarity {
    /// Convert an electrical level to the logical value.
    pub fn to_logical(self, electrical_high: bool) -> bool {
        match self {
            Self::ActiveHigh => electrical_high,
            Self::ActiveLow => !electrical_high,
        }
    }

    /// Convert a logical value to the electrical level to drive.
    pub fn to_electrical(self, logical: bool) -> bool {
        match self {
            Self::ActiveHigh => logical,
            Self::ActiveLow => !logical,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error claiming a line from a [`LineHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClaimError {
    /// No line with the requested name exists.
    NotFound,
    /// The line exists but is already claimed.
    Busy,
    /// The host refused access to the line.
    AccessDenied,
}

impl core::fmt::Display for ClaimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "line not found"),
            Self::Busy => write!(f, "line already claimed"),
            Self::AccessDenied => write!(f, "access to line denied"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClaimError {}

/// Error programming a debounce interval.
///
/// Debounce is advisory: callers log this and continue with the platform
/// default interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceError {
    /// The backend has no hardware debounce support.
    Unsupported,
    /// The backend rejected the requested interval.
    Rejected,
}

impl core::fmt::Display for DebounceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "debounce not supported"),
            Self::Rejected => write!(f, "debounce interval rejected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DebounceError {}

// ---------------------------------------------------------------------------
// DetectInput
// ---------------------------------------------------------------------------

/// The jack-detect input line.
///
/// Level reads may block: some backends sit behind a bus transaction rather
/// than a memory-mapped register. Callers must therefore only sample from a
/// context that tolerates blocking (attach, resume, the slow edge phase).
pub trait DetectInput {
    /// Error type returned by line operations.
    type Error: core::fmt::Debug;

    /// Read the logical level of the line. May block.
    fn read_level(&mut self) -> Result<bool, Self::Error>;

    /// Program a debounce interval in microseconds.
    fn set_debounce(&mut self, interval_us: u32) -> Result<(), DebounceError>;

    /// Resolve and bind both-edge event delivery for this line.
    ///
    /// Must be called once before the first [`wait_for_edge`] call. Failure
    /// is fatal to attachment.
    ///
    /// [`wait_for_edge`]: DetectInput::wait_for_edge
    fn enable_edge_events(&mut self) -> Result<(), Self::Error>;

    /// Wait for the next edge (either direction) on the line.
    ///
    /// Edges arriving while no wait is in progress are held as a single
    /// pending notification: a burst of edges completes exactly one wait.
    /// The caller re-arms by calling again; not re-arming until its
    /// processing is done is what serializes edge handling.
    async fn wait_for_edge(&mut self) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// OutputBank
// ---------------------------------------------------------------------------

/// An ordered array of amplifier-enable output lines driven as one unit.
///
/// Implementations drive every line to logical-off when the bank is claimed,
/// so amplifiers never float on between acquisition and the first drive.
pub trait OutputBank {
    /// Error type returned by bank operations.
    type Error: core::fmt::Debug;

    /// Number of lines in the bank.
    fn len(&self) -> usize;

    /// Returns `true` if the bank holds no lines.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every line in one call. May block.
    ///
    /// `levels` must hold exactly [`len`](OutputBank::len) entries, one per
    /// line in bank order.
    fn write_all(&mut self, levels: &[bool]) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// LineHost
// ---------------------------------------------------------------------------

/// The collaborator that owns the board's lines and hands them out by name.
///
/// Claimed lines are exclusively owned by the caller; dropping a line
/// returns it to the host. Attach rollback relies on this: releasing a
/// partially-acquired configuration is just dropping what was claimed so
/// far, after which a corrected claim must succeed.
pub trait LineHost {
    /// Concrete jack-detect line type.
    type Input: DetectInput;
    /// Concrete output bank type.
    type Outputs: OutputBank;

    /// Claim the named jack-detect input.
    fn claim_input(&mut self, name: &str) -> Result<Self::Input, ClaimError>;

    /// Claim the named output bank, each line driven to logical-off.
    fn claim_outputs(&mut self, name: &str) -> Result<Self::Outputs, ClaimError>;
}
