//! Pre-configured test data.

use session_controller::directory::{JoinCredentials, Participant};
use session_controller::transport::{MediaDevice, TileUpdate};

pub fn participant(user_id: &str, display_name: &str) -> Participant {
    Participant {
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
        avatar_url: None,
    }
}

pub fn credentials(attendee_id: &str) -> JoinCredentials {
    JoinCredentials {
        attendee_id: attendee_id.to_string(),
        join_token: "test-token".to_string(),
    }
}

pub fn device(device_id: &str, label: &str) -> MediaDevice {
    MediaDevice {
        device_id: device_id.to_string(),
        label: label.to_string(),
    }
}

/// An active camera tile update.
pub fn video_tile(tile_id: u32, attendee_id: &str) -> TileUpdate {
    TileUpdate {
        tile_id,
        attendee_id: attendee_id.to_string(),
        is_content: false,
        active: true,
        has_bound_stream: true,
    }
}

/// An active content-share tile update.
pub fn content_tile(tile_id: u32, attendee_id: &str) -> TileUpdate {
    TileUpdate {
        tile_id,
        attendee_id: attendee_id.to_string(),
        is_content: true,
        active: true,
        has_bound_stream: true,
    }
}
