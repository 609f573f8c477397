/// Raised when a device cannot supply the information capabilities are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityInfoUnavailable {
    device: String,
    reason: &'static str,
}

impl CapabilityInfoUnavailable {
    pub(crate) fn new(device: &str, reason: &'static str) -> Self {
        Self {
            device: device.to_string(),
            reason,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn reason(&self) -> &str {
        self.reason
    }
}

impl std::fmt::Display for CapabilityInfoUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unable to get video capability information from '{}': {}",
            self.device, self.reason
        )
    }
}

impl std::error::Error for CapabilityInfoUnavailable {}
