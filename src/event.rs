//! Event wire format
//!
//! Events cross the platform boundary as JSON records. The shape is owned by
//! the platform side of the contract, so knowledge of it is confined to this
//! module: [`PackEvent`] plus the single [`decode_event`] function the relay
//! uses. Nothing else in the crate parses event text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::platform::{DialogChoice, PackState};

/// One asynchronous occurrence reported by the delivery service.
///
/// `event_type` is one of the `EVENT_*` constants. State-updated events carry
/// the new pack state flattened into the record; other events carry at most a
/// free-form `extra` message (platform error text, log line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackEvent {
    pub pack_name: String,
    pub event_type: i32,
    // Flattened: a None state serializes to no extra fields at all.
    #[serde(flatten)]
    pub state: Option<PackState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl PackEvent {
    fn new(pack_name: impl Into<String>, event_type: i32) -> Self {
        Self {
            pack_name: pack_name.into(),
            event_type,
            state: None,
            extra: None,
        }
    }

    pub fn state_updated(pack_name: impl Into<String>, state: PackState) -> Self {
        Self {
            state: Some(state),
            ..Self::new(pack_name, constants::EVENT_PACK_STATE_UPDATED)
        }
    }

    pub fn state_error(pack_name: impl Into<String>, extra: Option<String>) -> Self {
        Self {
            extra,
            ..Self::new(pack_name, constants::EVENT_PACK_STATE_ERROR)
        }
    }

    pub fn remove_completed(pack_name: impl Into<String>) -> Self {
        Self::new(pack_name, constants::EVENT_REMOVE_PACK_COMPLETED)
    }

    pub fn remove_canceled(pack_name: impl Into<String>) -> Self {
        Self::new(pack_name, constants::EVENT_REMOVE_PACK_CANCELED)
    }

    pub fn remove_error(pack_name: impl Into<String>, extra: Option<String>) -> Self {
        Self {
            extra,
            ..Self::new(pack_name, constants::EVENT_REMOVE_PACK_ERROR)
        }
    }

    pub fn dialog_result(pack_name: impl Into<String>, choice: DialogChoice) -> Self {
        let event_type = match choice {
            DialogChoice::Confirmed => constants::EVENT_DIALOG_CONFIRMED,
            DialogChoice::Declined => constants::EVENT_DIALOG_DECLINED,
        };
        Self::new(pack_name, event_type)
    }

    pub fn dialog_canceled(pack_name: impl Into<String>) -> Self {
        Self::new(pack_name, constants::EVENT_DIALOG_CANCELED)
    }

    pub fn dialog_error(pack_name: impl Into<String>, extra: Option<String>) -> Self {
        Self {
            extra,
            ..Self::new(pack_name, constants::EVENT_DIALOG_ERROR)
        }
    }

    /// Log-message event; `pack_name` is empty, the text rides in `extra`.
    pub fn log(message: impl Into<String>) -> Self {
        Self {
            extra: Some(message.into()),
            ..Self::new("", constants::EVENT_LOG)
        }
    }
}

#[derive(Error, Debug)]
pub enum EventDecodeError {
    #[error("malformed event record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes one serialized event record into its structured form.
pub fn decode_event(raw: &str) -> Result<PackEvent, EventDecodeError> {
    Ok(serde_json::from_str(raw)?)
}
