use std::fmt;

use thiserror::Error;

/// Runtime permissions a scan needs before the radio may be touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    BluetoothScan,
    BluetoothConnect,
    Location,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::BluetoothScan,
        Permission::BluetoothConnect,
        Permission::Location,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::BluetoothScan => "bluetooth scan",
            Permission::BluetoothConnect => "bluetooth connect",
            Permission::Location => "location",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no bluetooth adapter available")]
    NoAdapter,

    #[error("missing permissions: {}", join(.0))]
    PermissionDenied(Vec<Permission>),

    #[error("bluetooth backend error: {0}")]
    Backend(String),

    #[error("session controller is no longer running")]
    Closed,
}

/// Why a page could not be enriched. Never escapes the metadata fetcher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("failed to parse document: {0}")]
    Parse(String),
}

fn join(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(|permission| permission.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_lists_missing_permissions() {
        let err = ScanError::PermissionDenied(vec![Permission::BluetoothScan, Permission::Location]);
        assert_eq!(err.to_string(), "missing permissions: bluetooth scan, location");
    }
}
