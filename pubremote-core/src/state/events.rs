//! Events that trigger link state transitions

/// Events driving the pairing handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingEvent {
    /// Pairing init accepted and acknowledged
    InitAccepted,
    /// Vehicle offered a secret code
    CodeOffered,
    /// Vehicle confirmed the offered code
    Confirmed,
    /// Vehicle sent an unusable secret code, or anything other than the
    /// confirmation value
    Rejected,
    /// Handshake step did not complete in time
    TimedOut,
    /// A stored pairing was loaded at startup
    Restored,
    /// User asked to forget the vehicle
    Unpair,
}

/// Events driving connection liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionEvent {
    /// Start looking for the paired vehicle
    Connect,
    /// Stop talking to the vehicle
    Disconnect,
    /// Telemetry arrived recently enough to consider the link alive
    TelemetryFresh,
    /// Telemetry stopped arriving
    TelemetryStale,
    /// No telemetry for longer than the give-up timeout
    GiveUp,
}
