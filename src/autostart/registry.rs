//! HKCU run key access

use super::{RunKeyStore, RUN_KEY};
use crate::error::{Result, WidgetError};
use std::io;
use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE};
use winreg::RegKey;

/// `HKCU\Software\Microsoft\Windows\CurrentVersion\Run`
///
/// The key is opened per call, so a locked-down registry only fails the
/// toggle that touched it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryRunKey;

impl RegistryRunKey {
    fn open(&self) -> Result<RegKey> {
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(RUN_KEY, KEY_QUERY_VALUE | KEY_SET_VALUE)
            .map_err(|e| WidgetError::Registry(format!("open {}: {}", RUN_KEY, e)))
    }
}

impl RunKeyStore for RegistryRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        match self.open()?.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WidgetError::Registry(format!("read {}: {}", name, e))),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.open()?
            .set_value(name, &value.to_string())
            .map_err(|e| WidgetError::Registry(format!("write {}: {}", name, e)))
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.open()?
            .delete_value(name)
            .map_err(|e| WidgetError::Registry(format!("delete {}: {}", name, e)))
    }
}
