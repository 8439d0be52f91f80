use std::collections::HashSet;

use async_trait::async_trait;

use eddyweb_common::{
    error::{Permission, ScanError},
    scanning::PermissionGate,
};

/// A gate over a fixed set of granted permissions.
///
/// For platforms where grants are decided up front (CLI flags, tests).
#[derive(Debug, Clone, Default)]
pub struct GrantedPermissions {
    granted: HashSet<Permission>,
}

impl GrantedPermissions {
    pub fn all() -> Self {
        Self::from_iter(Permission::ALL)
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn missing(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|permission| !self.granted.contains(permission))
            .collect()
    }
}

impl FromIterator<Permission> for GrantedPermissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl PermissionGate for GrantedPermissions {
    async fn check(&self) -> Result<(), ScanError> {
        let missing: Vec<Permission> = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScanError::PermissionDenied(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_granted_passes() {
        assert!(GrantedPermissions::all().check().await.is_ok());
    }

    #[tokio::test]
    async fn denial_names_every_missing_permission() {
        let gate = GrantedPermissions::from_iter([Permission::BluetoothScan]);
        match gate.check().await {
            Err(ScanError::PermissionDenied(missing)) => assert_eq!(
                missing,
                vec![Permission::BluetoothConnect, Permission::Location]
            ),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn nothing_granted_denies_all() {
        let err = GrantedPermissions::none().check().await.unwrap_err();
        assert!(matches!(err, ScanError::PermissionDenied(missing) if missing.len() == 3));
    }
}
