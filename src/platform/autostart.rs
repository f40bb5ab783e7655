//! OS auto-launch registration.
//!
//! Windows uses the per-user Run registry key; everything else writes an
//! XDG autostart entry. Failures surface as `PermissionDenied` so the CLI
//! can exit non-zero without touching the monitoring loop.

use std::io;

use crate::error::{Result, VitalsError};

/// Name under which the app registers itself.
pub const APP_NAME: &str = "SysVitals";

fn launch_command() -> Result<String> {
    let exe = std::env::current_exe()?;
    Ok(format!("\"{}\" monitor", exe.display()))
}

fn map_io(e: io::Error, what: &str) -> VitalsError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        VitalsError::permission_denied(what.to_string())
    } else {
        VitalsError::Io(e)
    }
}

#[cfg(windows)]
mod imp {
    use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE};
    use winreg::RegKey;

    use super::*;

    const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

    pub fn enable() -> Result<()> {
        let command = launch_command()?;
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(RUN_KEY, KEY_SET_VALUE)
            .map_err(|e| map_io(e, "opening Run registry key"))?;
        run.set_value(APP_NAME, &command)
            .map_err(|e| map_io(e, "writing Run registry value"))?;
        Ok(())
    }

    pub fn disable() -> Result<()> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(RUN_KEY, KEY_SET_VALUE)
            .map_err(|e| map_io(e, "opening Run registry key"))?;
        match run.delete_value(APP_NAME) {
            Ok(()) => Ok(()),
            // Not registered in the first place.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e, "deleting Run registry value")),
        }
    }

    pub fn is_enabled() -> Result<bool> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let run = hkcu
            .open_subkey_with_flags(RUN_KEY, KEY_QUERY_VALUE)
            .map_err(|e| map_io(e, "opening Run registry key"))?;
        Ok(run.get_value::<String, _>(APP_NAME).is_ok())
    }
}

#[cfg(not(windows))]
mod imp {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn desktop_entry_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VitalsError::autostart("no config directory".to_string()))?;
        Ok(config_dir.join("autostart").join("sysvitals.desktop"))
    }

    pub fn enable() -> Result<()> {
        let command = launch_command()?;
        let path = desktop_entry_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io(e, "creating autostart directory"))?;
        }
        let entry = format!(
            "[Desktop Entry]\nType=Application\nName={}\nExec={}\nX-GNOME-Autostart-enabled=true\n",
            APP_NAME, command
        );
        fs::write(&path, entry).map_err(|e| map_io(e, "writing autostart entry"))?;
        Ok(())
    }

    pub fn disable() -> Result<()> {
        let path = desktop_entry_path()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Not registered in the first place.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e, "removing autostart entry")),
        }
    }

    pub fn is_enabled() -> Result<bool> {
        Ok(desktop_entry_path()?.exists())
    }
}

pub use imp::{disable, enable, is_enabled};
