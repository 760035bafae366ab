//! Connectivity data types.

/// Kind of network the device is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    Wifi,
    Cellular,
    Ethernet,
    Bluetooth,
    Vpn,
    Other,
    /// The platform reports no active network
    None,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Wifi => "wifi",
            TransportType::Cellular => "cellular",
            TransportType::Ethernet => "ethernet",
            TransportType::Bluetooth => "bluetooth",
            TransportType::Vpn => "vpn",
            TransportType::Other => "other",
            TransportType::None => "none",
        }
    }
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a probe reports. Any field may be undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawNetworkState {
    pub is_connected: Option<bool>,
    pub is_internet_reachable: Option<bool>,
    pub transport: Option<TransportType>,
}

impl RawNetworkState {
    /// Connected and reachable over `transport`.
    pub fn connected(transport: Option<TransportType>) -> Self {
        Self {
            is_connected: Some(true),
            is_internet_reachable: Some(true),
            transport,
        }
    }

    /// No network.
    pub fn disconnected() -> Self {
        Self {
            is_connected: Some(false),
            is_internet_reachable: Some(false),
            transport: Some(TransportType::None),
        }
    }
}

/// The monitor's view of connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivitySnapshot {
    pub is_connected: bool,
    pub is_internet_reachable: Option<bool>,
    pub transport: Option<TransportType>,
}

impl ConnectivitySnapshot {
    /// Normalize a probe report. An undetermined connection counts as
    /// disconnected.
    pub fn from_raw(raw: RawNetworkState) -> Self {
        Self {
            is_connected: raw.is_connected.unwrap_or(false),
            is_internet_reachable: raw.is_internet_reachable,
            transport: raw.transport,
        }
    }

    /// Reported when the probe itself fails.
    pub fn fail_safe() -> Self {
        Self {
            is_connected: false,
            is_internet_reachable: Some(false),
            transport: None,
        }
    }

    /// Reported before the first poll completes.
    pub fn initial(assume_connected: bool) -> Self {
        Self {
            is_connected: assume_connected,
            is_internet_reachable: None,
            transport: None,
        }
    }

    pub fn is_wifi(&self) -> bool {
        self.transport == Some(TransportType::Wifi)
    }

    pub fn is_cellular(&self) -> bool {
        self.transport == Some(TransportType::Cellular)
    }
}

/// Monitor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    /// No poll has completed yet
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn from_connected(is_connected: bool) -> Self {
        if is_connected {
            ConnectivityState::Online
        } else {
            ConnectivityState::Offline
        }
    }
}

/// A change in connectivity between two consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Lost,
    Restored,
}

impl std::fmt::Display for ConnectivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityEvent::Lost => write!(f, "connection lost"),
            ConnectivityEvent::Restored => write!(f, "connection restored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_undetermined_connection_is_disconnected() {
        let snapshot = ConnectivitySnapshot::from_raw(RawNetworkState::default());
        assert!(!snapshot.is_connected);
        assert_eq!(snapshot.is_internet_reachable, None);
        assert_eq!(snapshot.transport, None);
    }

    #[test]
    fn test_from_raw_keeps_reachability_and_transport() {
        let snapshot = ConnectivitySnapshot::from_raw(RawNetworkState {
            is_connected: Some(true),
            is_internet_reachable: None,
            transport: Some(TransportType::Cellular),
        });
        assert!(snapshot.is_connected);
        assert_eq!(snapshot.is_internet_reachable, None);
        assert!(snapshot.is_cellular());
        assert!(!snapshot.is_wifi());
    }

    #[test]
    fn test_fail_safe() {
        let snapshot = ConnectivitySnapshot::fail_safe();
        assert!(!snapshot.is_connected);
        assert_eq!(snapshot.is_internet_reachable, Some(false));
        assert_eq!(snapshot.transport, None);
    }

    #[test]
    fn test_initial_follows_assumption() {
        assert!(ConnectivitySnapshot::initial(true).is_connected);
        assert!(!ConnectivitySnapshot::initial(false).is_connected);
    }

    #[test]
    fn test_state_from_connected() {
        assert_eq!(ConnectivityState::from_connected(true), ConnectivityState::Online);
        assert_eq!(ConnectivityState::from_connected(false), ConnectivityState::Offline);
        assert_eq!(ConnectivityState::default(), ConnectivityState::Unknown);
    }

    #[test]
    fn test_transport_display() {
        assert_eq!(TransportType::Wifi.to_string(), "wifi");
        assert_eq!(TransportType::None.to_string(), "none");
    }
}
