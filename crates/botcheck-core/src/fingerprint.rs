use botcheck_types::DeviceInfoPayload;
use sha2::{Digest, Sha256};

/// Deterministic device fingerprint derived from `user_agent` plus the
/// reported screen/viewport/locale (§4.4). The fingerprint is stored
/// alongside the session so reuse comparisons stay index-local rather than
/// re-deriving it on every query.
pub fn device_fingerprint(user_agent: Option<&str>, device: Option<&DeviceInfoPayload>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.unwrap_or("").as_bytes());
    hasher.update(b"|");

    if let Some(device) = device {
        if let Some(screen) = &device.screen {
            hasher.update(format!("{}x{}", screen.width, screen.height).as_bytes());
        }
        hasher.update(b"|");
        if let Some(viewport) = &device.viewport {
            hasher.update(format!("{}x{}", viewport.width, viewport.height).as_bytes());
        }
        hasher.update(b"|");
        hasher.update(device.locale.as_deref().unwrap_or("").as_bytes());
    }

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use botcheck_types::Resolution;

    fn device(width: u32, locale: &str) -> DeviceInfoPayload {
        DeviceInfoPayload {
            screen: Some(Resolution { width, height: 1080 }),
            viewport: Some(Resolution { width, height: 900 }),
            locale: Some(locale.to_string()),
        }
    }

    #[test]
    fn identical_inputs_produce_identical_fingerprints() {
        let a = device_fingerprint(Some("Mozilla/5.0"), Some(&device(1920, "en-US")));
        let b = device_fingerprint(Some("Mozilla/5.0"), Some(&device(1920, "en-US")));
        assert_eq!(a, b);
    }

    #[test]
    fn differing_resolution_changes_the_fingerprint() {
        let a = device_fingerprint(Some("Mozilla/5.0"), Some(&device(1920, "en-US")));
        let b = device_fingerprint(Some("Mozilla/5.0"), Some(&device(1366, "en-US")));
        assert_ne!(a, b);
    }

    #[test]
    fn missing_device_info_still_yields_a_stable_fingerprint() {
        let a = device_fingerprint(Some("Mozilla/5.0"), None);
        let b = device_fingerprint(Some("Mozilla/5.0"), None);
        assert_eq!(a, b);
    }
}
