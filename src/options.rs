use std::time::Duration;

/// Configuration knobs for [`VerificationPipeline`](crate::VerificationPipeline)
/// and [`CatchAllDetector`](crate::CatchAllDetector).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierOptions {
    /// Identity announced in the HELO command.
    pub helo_domain: String,
    /// Envelope sender for MAIL FROM.
    pub mail_from: String,
    pub smtp_port: u16,
    pub dns_timeout_ms: u64,
    pub smtp_connect_timeout_ms: u64,
    pub smtp_read_timeout_ms: u64,
    /// Random-address probes per catch-all check, clamped to `1..=5`.
    pub probe_count: u8,
    pub caching_enabled: bool,
    pub cache_ttl_ms: u64,
    pub max_cache_size: usize,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            helo_domain: "verification.localhost".to_string(),
            mail_from: "verifier@localhost".to_string(),
            smtp_port: 25,
            dns_timeout_ms: 5_000,
            smtp_connect_timeout_ms: 10_000,
            smtp_read_timeout_ms: 15_000,
            probe_count: 2,
            caching_enabled: true,
            cache_ttl_ms: 3_600_000,
            max_cache_size: 10_000,
        }
    }
}

impl VerifierOptions {
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.smtp_connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.smtp_read_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn clamped_probe_count(&self) -> usize {
        self.probe_count.clamp(1, 5) as usize
    }
}
