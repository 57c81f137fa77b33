mod blocklist;
mod builder;
mod csrf;
mod error;
mod submit;

pub use blocklist::DomainList;
pub use builder::{ Submitter, SubmitterBuilder };
pub use csrf::{ parse_csrf_token, CredentialProvider, CsrfToken, MetaTagToken, StaticToken, CSRF_HEADER };
pub use error::{ ConfigError, CredentialError, DomainListError, SubmitError };
pub use submit::{ interpret_response, BlocklistEntry, HttpSubmit, Submit, BLOCKLIST_PATH };

use futures::stream::{ self, StreamExt };
use serde::Serialize;

/// How the submissions of one run are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Each submission completes before the next one starts.
    #[default]
    Sequential,
    /// Up to `limit` submissions in flight; completion order is unspecified. A limit of 0
    /// behaves as 1.
    Concurrent {
        limit: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Acknowledged {
        domain: String,
    },
    Failed {
        domain: String,
        status: Option<u16>,
        diagnostic: String,
    },
}

impl SubmissionOutcome {
    pub fn domain(&self) -> &str {
        match self {
            SubmissionOutcome::Acknowledged { domain } => domain,
            SubmissionOutcome::Failed { domain, .. } => domain,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, SubmissionOutcome::Acknowledged { .. })
    }
}

/// Submits every domain in `domains` once, attaching `token` to each request.
///
/// Failures are logged and recorded, never propagated: a rejected domain does not stop the
/// ones after it, and nothing is retried. Outcomes come back in completion order, which is
/// list order in `SubmitMode::Sequential`.
pub async fn submit_all<S>(
    domains: &DomainList,
    token: &CsrfToken,
    submit: &S,
    mode: SubmitMode
) -> Vec<SubmissionOutcome>
    where S: Submit + ?Sized
{
    match mode {
        SubmitMode::Sequential => {
            let mut outcomes = Vec::with_capacity(domains.len());
            for domain in domains.iter() {
                outcomes.push(submit_one(domain, token, submit).await);
            }
            outcomes
        }
        SubmitMode::Concurrent { limit } => {
            stream::iter(domains.iter())
                .map(|domain| submit_one(domain, token, submit))
                .buffer_unordered(limit.max(1))
                .collect().await
        }
    }
}

async fn submit_one<S>(domain: &str, token: &CsrfToken, submit: &S) -> SubmissionOutcome
    where S: Submit + ?Sized
{
    match submit.submit(domain, token).await {
        Ok(()) => {
            tracing::info!(domain, "url '{}' added", domain);
            SubmissionOutcome::Acknowledged {
                domain: domain.to_string(),
            }
        }
        Err(err) => {
            let status = err.status().map(|s| s.as_u16());
            tracing::error!(domain, status, error = %err, "error adding '{}'", domain);
            SubmissionOutcome::Failed {
                domain: domain.to_string(),
                status,
                diagnostic: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call and rejects the domains listed in `reject`.
    #[derive(Default)]
    struct RecordingSubmit {
        calls: Mutex<Vec<(String, String)>>,
        reject: Vec<(&'static str, StatusCode)>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl Submit for RecordingSubmit {
        async fn submit(&self, domain: &str, token: &CsrfToken) -> Result<(), SubmitError> {
            self.calls.lock().unwrap().push((domain.to_string(), token.as_str().to_string()));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.reject.iter().find(|(d, _)| *d == domain) {
                Some((_, status)) =>
                    Err(SubmitError::Rejected {
                        status: *status,
                        body: r#"{"error":"not allowed"}"#.to_string(),
                    }),
                None => Ok(()),
            }
        }
    }

    fn token() -> CsrfToken {
        CsrfToken::new("tok").unwrap()
    }

    #[tokio::test]
    async fn test_mixed_outcomes() {
        let domains = DomainList::new(["a.com", "b.com"]).unwrap();
        let submit = RecordingSubmit {
            reject: vec![("b.com", StatusCode::FORBIDDEN)],
            ..Default::default()
        };

        let outcomes = submit_all(&domains, &token(), &submit, SubmitMode::Sequential).await;

        assert_eq!(submit.calls.lock().unwrap().len(), 2);
        assert_eq!(outcomes[0], SubmissionOutcome::Acknowledged { domain: "a.com".to_string() });
        match &outcomes[1] {
            SubmissionOutcome::Failed { domain, status, diagnostic } => {
                assert_eq!(domain, "b.com");
                assert_eq!(*status, Some(403));
                assert!(diagnostic.contains("403"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_domains() {
        let domains = DomainList::new(["a.com", "b.com", "c.com", "d.com"]).unwrap();
        let submit = RecordingSubmit {
            reject: vec![("a.com", StatusCode::INTERNAL_SERVER_ERROR)],
            ..Default::default()
        };

        let outcomes = submit_all(&domains, &token(), &submit, SubmitMode::Sequential).await;

        let called: Vec<String> = submit.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect();
        assert_eq!(called, vec!["a.com", "b.com", "c.com", "d.com"]);
        assert_eq!(outcomes.iter().filter(|o| o.is_acknowledged()).count(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_submitted_twice() {
        let domains = DomainList::new(["fool.com", "fool.com"]).unwrap();
        let submit = RecordingSubmit::default();

        let outcomes = submit_all(&domains, &token(), &submit, SubmitMode::Sequential).await;

        assert_eq!(submit.calls.lock().unwrap().len(), 2);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.domain() == "fool.com" && o.is_acknowledged()));
    }

    #[tokio::test]
    async fn test_token_attached_to_every_call() {
        let domains = DomainList::new(["a.com", "b.com", "c.com"]).unwrap();
        let submit = RecordingSubmit::default();

        submit_all(&domains, &token(), &submit, SubmitMode::Concurrent { limit: 2 }).await;

        assert!(
            submit.calls
                .lock()
                .unwrap()
                .iter()
                .all(|(_, t)| t == "tok")
        );
    }

    #[tokio::test]
    async fn test_sequential_has_one_in_flight() {
        let domains = DomainList::new(["a.com", "b.com", "c.com"]).unwrap();
        let submit = RecordingSubmit {
            delay: Some(Duration::from_millis(5)),
            ..Default::default()
        };

        submit_all(&domains, &token(), &submit, SubmitMode::Sequential).await;

        assert_eq!(submit.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_respects_limit() {
        let names: Vec<String> = (0..12).map(|i| format!("site{}.com", i)).collect();
        let domains = DomainList::new(&names).unwrap();
        let submit = RecordingSubmit {
            delay: Some(Duration::from_millis(10)),
            reject: vec![("site3.com", StatusCode::UNPROCESSABLE_ENTITY)],
            ..Default::default()
        };

        let outcomes = submit_all(&domains, &token(), &submit, SubmitMode::Concurrent {
            limit: 3,
        }).await;

        assert_eq!(outcomes.len(), 12);
        assert!(submit.peak.load(Ordering::SeqCst) <= 3);

        let started: Vec<String> = submit.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect();
        assert_eq!(started, names);

        let mut seen: Vec<&str> = outcomes
            .iter()
            .map(|o| o.domain())
            .collect();
        seen.sort();
        let mut expected: Vec<&str> = names.iter().map(String::as_str).collect();
        expected.sort();
        assert_eq!(seen, expected);

        let failed: Vec<&SubmissionOutcome> = outcomes
            .iter()
            .filter(|o| !o.is_acknowledged())
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].domain(), "site3.com");
    }

    #[tokio::test]
    async fn test_zero_limit_still_submits() {
        let domains = DomainList::new(["a.com", "b.com"]).unwrap();
        let submit = RecordingSubmit::default();

        let outcomes = submit_all(&domains, &token(), &submit, SubmitMode::Concurrent {
            limit: 0,
        }).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(submit.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = SubmissionOutcome::Failed {
            domain: "b.com".to_string(),
            status: Some(403),
            diagnostic: "forbidden".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["status"], 403);
    }
}
