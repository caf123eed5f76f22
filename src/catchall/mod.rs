//! Multi-probe catch-all detection with a domain-scoped result cache.
//!
//! A catch-all server accepts `RCPT TO` for any local part, which makes a
//! single acceptance meaningless. The detector settles the question by
//! issuing several `RCPT TO` probes with random local parts on one batched
//! session and watching whether the server ever says no.

mod cache;
mod types;

pub use cache::CacheStatistics;
pub use types::{CatchAllDetectionResult, Confidence};

use std::collections::HashSet;

use rand::Rng;

use cache::DomainCache;
use types::ProbeOutcome;

use crate::options::VerifierOptions;
use crate::smtp::{Connector, SmtpPhase, SmtpResponse, Transport};

/// Detects catch-all behaviour for a domain after a primary acceptance.
///
/// The primary verification outcome is never rewritten here; the detector
/// only adds confidence. Probe-session failures degrade the confidence
/// instead of propagating as errors.
pub struct CatchAllDetector {
    probe_count: usize,
    helo_domain: String,
    mail_from: String,
    cache: Option<DomainCache>,
}

impl CatchAllDetector {
    pub fn new(options: &VerifierOptions) -> Self {
        Self {
            probe_count: options.clamped_probe_count(),
            helo_domain: options.helo_domain.clone(),
            mail_from: options.mail_from.clone(),
            cache: options
                .caching_enabled
                .then(|| DomainCache::new(options.cache_ttl(), options.max_cache_size)),
        }
    }

    /// What the primary RCPT TO response alone says about catch-all status.
    ///
    /// A 5xx proves the server is selective. A 2xx only raises suspicion,
    /// since confirmation needs the probe session.
    pub fn analyze_single_probe(&self, responses: &[SmtpResponse]) -> CatchAllDetectionResult {
        let Some(rcpt_to) = responses.iter().find(|r| r.phase == SmtpPhase::RcptTo) else {
            return CatchAllDetectionResult::indeterminate(
                "No RCPT TO response available for analysis",
            );
        };

        if rcpt_to.is_permanent_failure() {
            return CatchAllDetectionResult::not_detected(
                "RCPT TO rejected with 5xx - server is selective",
            );
        }

        if rcpt_to.is_positive_completion() {
            return CatchAllDetectionResult::suspected(
                "RCPT TO accepted - catch-all suspected but not confirmed",
            );
        }

        CatchAllDetectionResult::indeterminate(format!(
            "RCPT TO returned {} - cannot determine catch-all status",
            rcpt_to.code
        ))
    }

    /// Full behavioural analysis: pre-analysis on the primary responses,
    /// cache lookup, then a batched probe session against `mail_host`.
    pub fn analyze_multi_probe<C>(
        &self,
        connector: &C,
        primary_responses: &[SmtpResponse],
        mail_host: &str,
        domain: &str,
    ) -> CatchAllDetectionResult
    where
        C: Connector + ?Sized,
    {
        let single = self.analyze_single_probe(primary_responses);
        match single.confidence {
            Confidence::NotDetected => {
                self.cache_result(domain, &single);
                return single;
            }
            Confidence::Indeterminate => return single,
            Confidence::Confirmed | Confidence::Suspected => {}
        }

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(domain) {
                tracing::debug!(domain, "catch-all verdict served from cache");
                return cached;
            }
        }

        let probes = self.run_probe_session(connector, mail_host, domain);
        let result = aggregate_probes(&probes);
        tracing::debug!(domain, confidence = %result.confidence, "probe session aggregated");
        self.cache_result(domain, &result);
        result
    }

    /// Cache counters; a disabled cache reports zeros.
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache
            .as_ref()
            .map_or_else(CacheStatistics::disabled, DomainCache::statistics)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn cache_result(&self, domain: &str, result: &CatchAllDetectionResult) {
        if result.confidence == Confidence::Indeterminate {
            return;
        }
        if let Some(cache) = &self.cache {
            cache.insert(domain, result.clone());
        }
    }

    /// One fresh session, `probe_count` RCPT TO probes, then QUIT.
    ///
    /// Envelope-setup rejections and transport failures mark the remaining
    /// probe slots FAILED rather than erroring out.
    fn run_probe_session<C>(&self, connector: &C, mail_host: &str, domain: &str) -> Vec<ProbeOutcome>
    where
        C: Connector + ?Sized,
    {
        let mut transport = match connector.connect(mail_host) {
            Ok(transport) => transport,
            Err(err) => {
                return self.all_failed(format!("Batch probe session failed: {err}"));
            }
        };

        if let Err(reason) = self.open_envelope(transport.as_mut()) {
            return self.all_failed(reason);
        }

        let mut outcomes = Vec::with_capacity(self.probe_count);
        for local_part in self.probe_local_parts() {
            let command = format!("RCPT TO:<{local_part}@{domain}>");
            let reply = transport
                .send_command(&command)
                .and_then(|()| transport.read_response());
            match reply {
                Ok(raw) => {
                    let response = SmtpResponse::parse(&raw, SmtpPhase::RcptTo);
                    if response.is_positive_completion() {
                        outcomes.push(ProbeOutcome::Accepted(response.code));
                    } else if response.is_permanent_failure() {
                        outcomes.push(ProbeOutcome::Rejected(response.code));
                    } else {
                        outcomes.push(ProbeOutcome::Failed(format!(
                            "Unexpected response: {raw}"
                        )));
                    }
                }
                Err(err) => {
                    let reason = format!("Batch probe session failed: {err}");
                    while outcomes.len() < self.probe_count {
                        outcomes.push(ProbeOutcome::Failed(reason.clone()));
                    }
                    return outcomes;
                }
            }
        }

        if transport.send_command("QUIT").is_ok() {
            let _ = transport.read_response();
        }

        outcomes
    }

    /// GREETING, HELO, MAIL FROM: each must complete positively before any
    /// probe goes out.
    fn open_envelope(&self, transport: &mut dyn Transport) -> Result<(), String> {
        let greeting = transport
            .read_response()
            .map_err(|err| format!("Batch probe session failed: {err}"))?;
        if !is_positive(&greeting) {
            return Err(format!("Connection rejected: {greeting}"));
        }

        let helo = exchange(transport, &format!("HELO {}", self.helo_domain))?;
        if !is_positive(&helo) {
            return Err(format!("HELO rejected: {helo}"));
        }

        let mail_from = exchange(transport, &format!("MAIL FROM:<{}>", self.mail_from))?;
        if !is_positive(&mail_from) {
            return Err(format!("MAIL FROM rejected: {mail_from}"));
        }

        Ok(())
    }

    fn all_failed(&self, reason: String) -> Vec<ProbeOutcome> {
        vec![ProbeOutcome::Failed(reason); self.probe_count]
    }

    /// Random local parts, pairwise distinct within the session.
    fn probe_local_parts(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        let mut locals: HashSet<String> = HashSet::with_capacity(self.probe_count);
        while locals.len() < self.probe_count {
            locals.insert(format!("probe-{:032x}", rng.gen::<u128>()));
        }
        locals.into_iter().collect()
    }
}

fn exchange(transport: &mut dyn Transport, command: &str) -> Result<String, String> {
    transport
        .send_command(command)
        .and_then(|()| transport.read_response())
        .map_err(|err| format!("Batch probe session failed: {err}"))
}

fn is_positive(raw: &str) -> bool {
    SmtpResponse::parse(raw, SmtpPhase::RcptTo).is_positive_completion()
}

fn aggregate_probes(outcomes: &[ProbeOutcome]) -> CatchAllDetectionResult {
    let total = outcomes.len();
    let accepted = outcomes
        .iter()
        .filter(|o| matches!(o, ProbeOutcome::Accepted(_)))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, ProbeOutcome::Rejected(_)))
        .count();
    let failed = total - accepted - rejected;

    if rejected > 0 {
        return CatchAllDetectionResult::not_detected(format!(
            "Random address probe rejected ({rejected}/{total} probes) - server is selective"
        ));
    }

    if accepted == total {
        return CatchAllDetectionResult::confirmed(format!(
            "All random address probes accepted ({accepted}/{total}) - catch-all confirmed"
        ));
    }

    if failed == total {
        return CatchAllDetectionResult::suspected(format!(
            "Probes failed to complete ({failed}/{total}) - catch-all suspected but not confirmed"
        ));
    }

    CatchAllDetectionResult::suspected(format!(
        "Mixed probe results ({accepted} accepted, {failed} failed) - catch-all suspected"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smtp::NO_RESPONSE_CODE;
    use crate::smtp::testing::ScriptedConnector;

    fn detector(probe_count: u8) -> CatchAllDetector {
        let options = VerifierOptions {
            probe_count,
            ..VerifierOptions::default()
        };
        CatchAllDetector::new(&options)
    }

    fn primary_session(rcpt_code: i32) -> Vec<SmtpResponse> {
        vec![
            SmtpResponse::new(220, "mail.test", SmtpPhase::Greeting),
            SmtpResponse::new(250, "mail.test", SmtpPhase::Helo),
            SmtpResponse::new(250, "Ok", SmtpPhase::MailFrom),
            SmtpResponse::new(rcpt_code, "detail", SmtpPhase::RcptTo),
            SmtpResponse::new(221, "Bye", SmtpPhase::Quit),
        ]
    }

    fn envelope_replies() -> Vec<&'static str> {
        vec!["220 mail.test ESMTP", "250 mail.test", "250 Ok"]
    }

    #[test]
    fn single_probe_rejection_means_selective() {
        let result = detector(2).analyze_single_probe(&primary_session(550));
        assert_eq!(result.confidence, Confidence::NotDetected);
    }

    #[test]
    fn single_probe_acceptance_is_only_suspicion() {
        let result = detector(2).analyze_single_probe(&primary_session(250));
        assert_eq!(result.confidence, Confidence::Suspected);
    }

    #[test]
    fn single_probe_transient_is_indeterminate() {
        let result = detector(2).analyze_single_probe(&primary_session(451));
        assert_eq!(result.confidence, Confidence::Indeterminate);
    }

    #[test]
    fn single_probe_without_rcpt_is_indeterminate() {
        let responses = vec![SmtpResponse::new(220, "hi", SmtpPhase::Greeting)];
        let result = detector(2).analyze_single_probe(&responses);
        assert_eq!(result.confidence, Confidence::Indeterminate);
    }

    #[test]
    fn rejected_primary_skips_probe_session() {
        let connector = ScriptedConnector::new(vec![]);
        let detector = detector(2);
        let result = detector.analyze_multi_probe(
            &connector,
            &primary_session(550),
            "mx.selective.example",
            "selective.example",
        );
        assert_eq!(result.confidence, Confidence::NotDetected);
        assert_eq!(connector.connect_count(), 0);
    }

    #[test]
    fn batched_session_emits_exact_command_sequence() {
        let mut replies = envelope_replies();
        replies.extend(["250 Ok", "250 Ok", "221 Bye"]);
        let connector = ScriptedConnector::new(vec![replies]);
        let detector = detector(2);

        let result = detector.analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.catchall.example",
            "catchall.example",
        );
        assert_eq!(result.confidence, Confidence::Confirmed);
        assert!(
            result
                .diagnostic
                .as_deref()
                .unwrap()
                .contains("catch-all confirmed")
        );

        let sent = connector.sent_commands();
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[0], "HELO verification.localhost");
        assert_eq!(sent[1], "MAIL FROM:<verifier@localhost>");
        assert!(sent[2].starts_with("RCPT TO:<probe-"));
        assert!(sent[2].ends_with("@catchall.example>"));
        assert!(sent[3].starts_with("RCPT TO:<probe-"));
        assert_eq!(sent[4], "QUIT");
        assert_ne!(sent[2], sent[3], "probe local parts must differ");
    }

    #[test]
    fn any_probe_rejection_means_selective() {
        let mut replies = envelope_replies();
        replies.extend(["250 Ok", "550 no such user", "221 Bye"]);
        let connector = ScriptedConnector::new(vec![replies]);
        let result = detector(2).analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.strict.example",
            "strict.example",
        );
        assert_eq!(result.confidence, Confidence::NotDetected);
    }

    #[test]
    fn all_probes_failing_is_suspected() {
        // Connection drops after MAIL FROM; both probe slots fail.
        let connector = ScriptedConnector::new(vec![envelope_replies()]);
        let result = detector(2).analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.flaky.example",
            "flaky.example",
        );
        assert_eq!(result.confidence, Confidence::Suspected);
        assert!(
            result
                .diagnostic
                .as_deref()
                .unwrap()
                .contains("failed to complete")
        );
    }

    #[test]
    fn mixed_probe_results_are_suspected() {
        let mut replies = envelope_replies();
        replies.extend(["250 Ok", "421 service shutting down", "221 Bye"]);
        let connector = ScriptedConnector::new(vec![replies]);
        let result = detector(2).analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.odd.example",
            "odd.example",
        );
        assert_eq!(result.confidence, Confidence::Suspected);
        assert!(result.diagnostic.as_deref().unwrap().contains("Mixed"));
    }

    #[test]
    fn helo_rejection_fails_all_probes() {
        let connector =
            ScriptedConnector::new(vec![vec!["220 mail.test", "554 policy rejection"]]);
        let result = detector(3).analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.blocked.example",
            "blocked.example",
        );
        assert_eq!(result.confidence, Confidence::Suspected);
        assert!(result.diagnostic.as_deref().unwrap().contains("failed"));
    }

    #[test]
    fn connect_failure_degrades_to_suspected() {
        let connector = ScriptedConnector::new(vec![]);
        let result = detector(2).analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.down.example",
            "down.example",
        );
        assert_eq!(result.confidence, Confidence::Suspected);
    }

    #[test]
    fn second_analysis_within_ttl_hits_cache() {
        let mut replies = envelope_replies();
        replies.extend(["250 Ok", "250 Ok", "221 Bye"]);
        // Only one script: a second probe session would fail to connect.
        let connector = ScriptedConnector::new(vec![replies]);
        let detector = detector(2);

        let first = detector.analyze_multi_probe(
            &connector,
            &primary_session(250),
            "mx.catchall.example",
            "catchall.example",
        );
        let second = detector.analyze_multi_probe(
            &connector,
            &primary_session(250),
            "CatchAll.Example",
            "Catchall.Example",
        );
        assert_eq!(first, second);
        assert_eq!(connector.connect_count(), 1);

        let stats = detector.cache_statistics();
        assert!(stats.enabled);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn indeterminate_primary_is_not_cached() {
        let connector = ScriptedConnector::new(vec![]);
        let detector = detector(2);
        let responses = primary_session(NO_RESPONSE_CODE);
        let result = detector.analyze_multi_probe(
            &connector,
            &responses,
            "mx.example",
            "odd.example",
        );
        assert_eq!(result.confidence, Confidence::Indeterminate);
        assert_eq!(detector.cache_statistics().size, 0);
    }

    #[test]
    fn disabled_cache_reports_disabled_statistics() {
        let options = VerifierOptions {
            caching_enabled: false,
            ..VerifierOptions::default()
        };
        let detector = CatchAllDetector::new(&options);
        let stats = detector.cache_statistics();
        assert!(!stats.enabled);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn probe_local_parts_are_distinct() {
        let detector = detector(5);
        let locals = detector.probe_local_parts();
        assert_eq!(locals.len(), 5);
        for local in &locals {
            let token = local.strip_prefix("probe-").expect("probe- prefix");
            assert_eq!(token.len(), 32);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
