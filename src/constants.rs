//! Platform ABI constants
//!
//! Event types, pack statuses and error codes exposed to scripts. The values
//! mirror the platform delivery service's own integer codes and travel
//! unchanged through the event wire format, so they must never be renumbered.
//! Treat this module as a versioned external contract: review it against the
//! platform API on every platform upgrade (the `abi_values_are_pinned` test
//! will fail on any accidental edit).

use rquickjs::{Object, Result};

// Event types delivered to the script listener.
pub const EVENT_PACK_STATE_UPDATED: i32 = 0;
pub const EVENT_PACK_STATE_ERROR: i32 = 1;
pub const EVENT_REMOVE_PACK_COMPLETED: i32 = 2;
pub const EVENT_REMOVE_PACK_CANCELED: i32 = 3;
pub const EVENT_REMOVE_PACK_ERROR: i32 = 4;
pub const EVENT_DIALOG_CONFIRMED: i32 = 5;
pub const EVENT_DIALOG_DECLINED: i32 = 6;
pub const EVENT_DIALOG_CANCELED: i32 = 7;
pub const EVENT_DIALOG_ERROR: i32 = 8;
pub const EVENT_LOG: i32 = 9;

// Pack download/install statuses.
pub const STATUS_UNKNOWN: i32 = 0;
pub const STATUS_PENDING: i32 = 1;
pub const STATUS_DOWNLOADING: i32 = 2;
pub const STATUS_TRANSFERRING: i32 = 3;
pub const STATUS_COMPLETED: i32 = 4;
pub const STATUS_FAILED: i32 = 5;
pub const STATUS_CANCELED: i32 = 6;
pub const STATUS_WAITING_FOR_WIFI: i32 = 7;
pub const STATUS_NOT_INSTALLED: i32 = 8;
pub const STATUS_REQUIRES_USER_CONFIRMATION: i32 = 9;

// Error codes reported by the platform.
pub const ERRORCODE_NO_ERROR: i32 = 0;
/// The requesting app is unavailable.
pub const ERRORCODE_APP_UNAVAILABLE: i32 = -1;
/// The requested asset pack isn't available.
pub const ERRORCODE_PACK_UNAVAILABLE: i32 = -2;
/// The request is invalid.
pub const ERRORCODE_INVALID_REQUEST: i32 = -3;
/// The requested download isn't found.
pub const ERRORCODE_DOWNLOAD_NOT_FOUND: i32 = -4;
/// The delivery API isn't available on this device.
pub const ERRORCODE_API_NOT_AVAILABLE: i32 = -5;
/// Network error.
pub const ERRORCODE_NETWORK_ERROR: i32 = -6;
/// Download not permitted under the current device circumstances.
pub const ERRORCODE_ACCESS_DENIED: i32 = -7;
/// Download failed due to insufficient storage.
pub const ERRORCODE_INSUFFICIENT_STORAGE: i32 = -10;
/// The store app is either not installed or not the official version.
pub const ERRORCODE_PLAY_STORE_NOT_FOUND: i32 = -11;
/// A cellular-data confirmation was requested but no pack is waiting for Wi-Fi.
pub const ERRORCODE_NETWORK_UNRESTRICTED: i32 = -12;
/// The app isn't owned by any user on this device.
pub const ERRORCODE_APP_NOT_OWNED: i32 = -13;
/// A confirmation dialog was requested but no pack requires user confirmation.
pub const ERRORCODE_CONFIRMATION_NOT_REQUIRED: i32 = -14;
/// The installed app version is not recognized by the store.
pub const ERRORCODE_UNRECOGNIZED_INSTALLATION: i32 = -15;
/// Unknown error downloading an asset pack.
pub const ERRORCODE_INTERNAL_ERROR: i32 = -100;

/// Name/value table of every exposed constant, in registration order.
pub const ALL: &[(&str, i32)] = &[
    ("EVENT_PACK_STATE_UPDATED", EVENT_PACK_STATE_UPDATED),
    ("EVENT_PACK_STATE_ERROR", EVENT_PACK_STATE_ERROR),
    ("EVENT_REMOVE_PACK_COMPLETED", EVENT_REMOVE_PACK_COMPLETED),
    ("EVENT_REMOVE_PACK_CANCELED", EVENT_REMOVE_PACK_CANCELED),
    ("EVENT_REMOVE_PACK_ERROR", EVENT_REMOVE_PACK_ERROR),
    ("EVENT_DIALOG_CONFIRMED", EVENT_DIALOG_CONFIRMED),
    ("EVENT_DIALOG_DECLINED", EVENT_DIALOG_DECLINED),
    ("EVENT_DIALOG_CANCELED", EVENT_DIALOG_CANCELED),
    ("EVENT_DIALOG_ERROR", EVENT_DIALOG_ERROR),
    ("EVENT_LOG", EVENT_LOG),
    ("STATUS_UNKNOWN", STATUS_UNKNOWN),
    ("STATUS_PENDING", STATUS_PENDING),
    ("STATUS_DOWNLOADING", STATUS_DOWNLOADING),
    ("STATUS_TRANSFERRING", STATUS_TRANSFERRING),
    ("STATUS_COMPLETED", STATUS_COMPLETED),
    ("STATUS_FAILED", STATUS_FAILED),
    ("STATUS_CANCELED", STATUS_CANCELED),
    ("STATUS_WAITING_FOR_WIFI", STATUS_WAITING_FOR_WIFI),
    ("STATUS_NOT_INSTALLED", STATUS_NOT_INSTALLED),
    (
        "STATUS_REQUIRES_USER_CONFIRMATION",
        STATUS_REQUIRES_USER_CONFIRMATION,
    ),
    ("ERRORCODE_NO_ERROR", ERRORCODE_NO_ERROR),
    ("ERRORCODE_APP_UNAVAILABLE", ERRORCODE_APP_UNAVAILABLE),
    ("ERRORCODE_PACK_UNAVAILABLE", ERRORCODE_PACK_UNAVAILABLE),
    ("ERRORCODE_INVALID_REQUEST", ERRORCODE_INVALID_REQUEST),
    ("ERRORCODE_DOWNLOAD_NOT_FOUND", ERRORCODE_DOWNLOAD_NOT_FOUND),
    ("ERRORCODE_API_NOT_AVAILABLE", ERRORCODE_API_NOT_AVAILABLE),
    ("ERRORCODE_NETWORK_ERROR", ERRORCODE_NETWORK_ERROR),
    ("ERRORCODE_ACCESS_DENIED", ERRORCODE_ACCESS_DENIED),
    (
        "ERRORCODE_INSUFFICIENT_STORAGE",
        ERRORCODE_INSUFFICIENT_STORAGE,
    ),
    (
        "ERRORCODE_PLAY_STORE_NOT_FOUND",
        ERRORCODE_PLAY_STORE_NOT_FOUND,
    ),
    (
        "ERRORCODE_NETWORK_UNRESTRICTED",
        ERRORCODE_NETWORK_UNRESTRICTED,
    ),
    ("ERRORCODE_APP_NOT_OWNED", ERRORCODE_APP_NOT_OWNED),
    (
        "ERRORCODE_CONFIRMATION_NOT_REQUIRED",
        ERRORCODE_CONFIRMATION_NOT_REQUIRED,
    ),
    (
        "ERRORCODE_UNRECOGNIZED_INSTALLATION",
        ERRORCODE_UNRECOGNIZED_INSTALLATION,
    ),
    ("ERRORCODE_INTERNAL_ERROR", ERRORCODE_INTERNAL_ERROR),
];

/// Installs every constant as an integer field on the given module object.
pub fn register(module: &Object<'_>) -> Result<()> {
    for (name, value) in ALL {
        module.set(*name, *value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abi_values_are_pinned() {
        // One assertion per constant; any drift from the platform table is an
        // ABI break and has to be a deliberate edit here.
        assert_eq!(EVENT_PACK_STATE_UPDATED, 0);
        assert_eq!(EVENT_PACK_STATE_ERROR, 1);
        assert_eq!(EVENT_REMOVE_PACK_COMPLETED, 2);
        assert_eq!(EVENT_REMOVE_PACK_CANCELED, 3);
        assert_eq!(EVENT_REMOVE_PACK_ERROR, 4);
        assert_eq!(EVENT_DIALOG_CONFIRMED, 5);
        assert_eq!(EVENT_DIALOG_DECLINED, 6);
        assert_eq!(EVENT_DIALOG_CANCELED, 7);
        assert_eq!(EVENT_DIALOG_ERROR, 8);
        assert_eq!(EVENT_LOG, 9);

        assert_eq!(STATUS_UNKNOWN, 0);
        assert_eq!(STATUS_PENDING, 1);
        assert_eq!(STATUS_DOWNLOADING, 2);
        assert_eq!(STATUS_TRANSFERRING, 3);
        assert_eq!(STATUS_COMPLETED, 4);
        assert_eq!(STATUS_FAILED, 5);
        assert_eq!(STATUS_CANCELED, 6);
        assert_eq!(STATUS_WAITING_FOR_WIFI, 7);
        assert_eq!(STATUS_NOT_INSTALLED, 8);
        assert_eq!(STATUS_REQUIRES_USER_CONFIRMATION, 9);

        assert_eq!(ERRORCODE_NO_ERROR, 0);
        assert_eq!(ERRORCODE_APP_UNAVAILABLE, -1);
        assert_eq!(ERRORCODE_PACK_UNAVAILABLE, -2);
        assert_eq!(ERRORCODE_INVALID_REQUEST, -3);
        assert_eq!(ERRORCODE_DOWNLOAD_NOT_FOUND, -4);
        assert_eq!(ERRORCODE_API_NOT_AVAILABLE, -5);
        assert_eq!(ERRORCODE_NETWORK_ERROR, -6);
        assert_eq!(ERRORCODE_ACCESS_DENIED, -7);
        assert_eq!(ERRORCODE_INSUFFICIENT_STORAGE, -10);
        assert_eq!(ERRORCODE_PLAY_STORE_NOT_FOUND, -11);
        assert_eq!(ERRORCODE_NETWORK_UNRESTRICTED, -12);
        assert_eq!(ERRORCODE_APP_NOT_OWNED, -13);
        assert_eq!(ERRORCODE_CONFIRMATION_NOT_REQUIRED, -14);
        assert_eq!(ERRORCODE_UNRECOGNIZED_INSTALLATION, -15);
        assert_eq!(ERRORCODE_INTERNAL_ERROR, -100);
    }

    #[test]
    fn table_covers_every_constant() {
        assert_eq!(ALL.len(), 35);
        // No duplicate names sneaking in through copy/paste.
        let mut names: Vec<&str> = ALL.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 35);
    }
}
