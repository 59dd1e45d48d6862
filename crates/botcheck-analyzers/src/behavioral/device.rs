use botcheck_config::BotResolution;
use botcheck_types::{Event, EventPayload, Resolution};
use std::collections::HashSet;

/// §4.2.4: pure function over a session's `device_info` events.
pub fn score(events: &[Event], bot_resolutions: &[BotResolution]) -> f64 {
    let mut screens: HashSet<Resolution> = HashSet::new();
    let mut viewports: HashSet<Resolution> = HashSet::new();

    for event in events {
        if let EventPayload::DeviceInfo(info) = &event.payload {
            if let Some(screen) = info.screen {
                screens.insert(screen);
            }
            if let Some(viewport) = info.viewport {
                viewports.insert(viewport);
            }
        }
    }

    let multi_screen = screens.len() > 1;
    let multi_viewport = viewports.len() > 1;

    let bot_set: HashSet<(u32, u32)> = bot_resolutions.iter().map(|r| (r.width, r.height)).collect();
    let bot_resolution_matches = screens
        .iter()
        .chain(viewports.iter())
        .filter(|r| bot_set.contains(&(r.width, r.height)))
        .count();

    let mut contribution = 0.0;
    if multi_screen {
        contribution += 1.0;
    }
    contribution += bot_resolution_matches as f64 * 0.5;
    if multi_viewport {
        contribution += 1.0;
    }

    (contribution / 3.0).min(1.0)
}
