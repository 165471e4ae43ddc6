//! Link creation, resolution and stats lookup.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, LinkStatus};
use crate::domain::errors::{CreateError, RepositoryError, ResolveError};
use crate::domain::repositories::LinkRepository;
use crate::domain::telemetry::{LogLevel, SOURCE_CONTROLLER, SOURCE_SERVICE, Telemetry};
use crate::utils::code_generator::{generate_code, is_reserved, validate_custom_code};
use crate::utils::link_input::{validate_target_url, validity_window};

/// Attempts at drawing an unused random code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Registry of short links.
///
/// Owns creation (validation, code assignment, expiry computation) and the two
/// lookups: [`Self::resolve`], which refuses expired links, and
/// [`Self::lookup_for_stats`], which does not.
pub struct LinkRegistry<R: LinkRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    telemetry: Telemetry,
}

impl<R: LinkRepository> LinkRegistry<R> {
    /// Creates a new registry.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, telemetry: Telemetry) -> Self {
        Self {
            repository,
            clock,
            telemetry,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `target_url` - Absolute destination URL, stored exactly as given
    /// - `validity_minutes` - Lifetime in minutes (default 30, range 1-1440)
    /// - `code` - Optional custom short code; generated when omitted
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::Validation`] if any input is malformed.
    /// Returns [`CreateError::CodeConflict`] if the custom code exists, even if
    /// the existing link has expired.
    /// Returns [`CreateError::CodeSpaceExhausted`] if no free code could be drawn.
    pub async fn create(
        &self,
        target_url: String,
        validity_minutes: Option<i64>,
        code: Option<String>,
    ) -> Result<LinkRecord, CreateError> {
        validate_target_url(&target_url)?;
        let validity = validity_window(validity_minutes)?;
        if let Some(custom) = &code {
            validate_custom_code(custom)?;
        }

        let created_at = self.clock.now();

        let record = match code {
            Some(custom) => {
                let record = LinkRecord::new(custom, target_url, created_at, validity);
                self.repository
                    .insert(record)
                    .await
                    .map_err(|e| match e {
                        RepositoryError::Conflict { code } | RepositoryError::NotFound { code } => {
                            CreateError::CodeConflict { code }
                        }
                    })?
            }
            None => {
                self.insert_with_generated_code(target_url, created_at, validity)
                    .await?
            }
        };

        info!(code = %record.code, "Short link created, expires at {}", record.expires_at);
        metrics::counter!("links_created_total").increment(1);
        self.telemetry.emit(
            LogLevel::Info,
            SOURCE_CONTROLLER,
            "short url created",
            json!({ "code": record.code, "url": record.target_url }),
        );

        Ok(record)
    }

    /// Looks up a link for redirection.
    ///
    /// The code is lowercased before matching. Does not record a click; the
    /// caller does that through [`super::ClickRecorder`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] for unknown codes.
    /// Returns [`ResolveError::Expired`] once the clock has reached `expires_at`.
    pub async fn resolve(&self, code: &str) -> Result<LinkRecord, ResolveError> {
        let record = self.lookup(code).await?;

        if record.status_at(self.clock.now()) == LinkStatus::Expired {
            debug!(code = %record.code, "Resolve refused, link expired");
            return Err(ResolveError::Expired {
                code: record.code,
                expired_at: record.expires_at,
            });
        }

        Ok(record)
    }

    /// Looks up a link for reporting. Expired links are returned as well.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] only for codes never created.
    pub async fn lookup_for_stats(&self, code: &str) -> Result<LinkRecord, ResolveError> {
        self.lookup(code).await
    }

    /// Number of links held, expired ones included.
    pub async fn count(&self) -> usize {
        self.repository.count().await
    }

    async fn lookup(&self, code: &str) -> Result<LinkRecord, ResolveError> {
        let normalized = code.to_lowercase();

        self.repository
            .find_by_code(&normalized)
            .await
            .ok_or(ResolveError::NotFound { code: normalized })
    }

    /// Inserts a record under a freshly drawn code, retrying on collision.
    ///
    /// The insert itself is the uniqueness check, so a code taken by a
    /// concurrent request between draw and insert is simply redrawn.
    async fn insert_with_generated_code(
        &self,
        target_url: String,
        created_at: chrono::DateTime<chrono::Utc>,
        validity: chrono::Duration,
    ) -> Result<LinkRecord, CreateError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();
            if is_reserved(&code) {
                continue;
            }

            let record = LinkRecord::new(code, target_url.clone(), created_at, validity);
            match self.repository.insert(record).await {
                Ok(stored) => return Ok(stored),
                Err(e) => debug!(attempt, "Generated code collided: {}", e),
            }
        }

        error!("Failed to generate a unique code after {MAX_CODE_ATTEMPTS} attempts");
        self.telemetry.emit_error(
            SOURCE_SERVICE,
            "failed to generate unique code",
            None,
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        );

        Err(CreateError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockLinkRepository;
    use crate::domain::telemetry::LogEntry;
    use chrono::{Duration, Utc};
    use tokio::sync::mpsc;

    fn create_test_link(code: &str, url: &str, clock: &ManualClock, minutes: i64) -> LinkRecord {
        LinkRecord::new(
            code.to_string(),
            url.to_string(),
            clock.now(),
            Duration::minutes(minutes),
        )
    }

    fn registry(
        repo: MockLinkRepository,
        clock: Arc<ManualClock>,
    ) -> (LinkRegistry<MockLinkRepository>, mpsc::Receiver<LogEntry>) {
        let (telemetry, rx) = Telemetry::channel(16);
        let telemetry = telemetry.with_clock(clock.clone());
        (LinkRegistry::new(Arc::new(repo), clock, telemetry), rx)
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(1).returning(Ok);

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let (service, mut rx) = registry(mock_repo, clock.clone());

        let link = service
            .create("https://example.com".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.code.len(), 6);
        assert_eq!(link.created_at, clock.now());
        assert_eq!(link.expires_at, clock.now() + Duration::minutes(30));
        assert!(link.clicks.is_empty());

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.message, "short url created");
        assert_eq!(entry.package, "controller");
        assert_eq!(entry.context["code"], link.code);
        assert_eq!(entry.context["url"], "https://example.com");
        assert_eq!(entry.timestamp, clock.now());
    }

    #[tokio::test]
    async fn test_create_with_custom_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_insert()
            .withf(|record| record.code == "abcd")
            .times(1)
            .returning(Ok);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let link = service
            .create(
                "https://a.com".to_string(),
                Some(5),
                Some("abcd".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.code, "abcd");
        assert_eq!(link.expires_at - link.created_at, Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_create_accepts_route_names_as_custom_codes() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(2).returning(Ok);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        for code in ["health", "shorturls"] {
            let link = service
                .create(
                    "https://a.com".to_string(),
                    None,
                    Some(code.to_string()),
                )
                .await
                .unwrap();
            assert_eq!(link.code, code);
        }
    }

    #[tokio::test]
    async fn test_create_custom_code_conflict() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(1).returning(|record| {
            Err(RepositoryError::Conflict {
                code: record.code,
            })
        });

        let (service, mut rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service
            .create(
                "https://b.com".to_string(),
                None,
                Some("abcd".to_string()),
            )
            .await;

        assert_eq!(
            result.unwrap_err(),
            CreateError::CodeConflict {
                code: "abcd".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_retries_generated_collisions() {
        let mut mock_repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|record| {
                Err(RepositoryError::Conflict {
                    code: record.code,
                })
            });
        mock_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(Ok);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service
            .create("https://example.com".to_string(), None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().returning(|record| {
            Err(RepositoryError::Conflict {
                code: record.code,
            })
        });

        let (service, mut rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service
            .create("https://example.com".to_string(), None, None)
            .await;

        assert_eq!(
            result.unwrap_err(),
            CreateError::CodeSpaceExhausted {
                attempts: MAX_CODE_ATTEMPTS
            }
        );

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.package, "service");
    }

    #[tokio::test]
    async fn test_create_invalid_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service.create("not-a-url".to_string(), None, None).await;

        assert!(matches!(result, Err(CreateError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_validity() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        for validity in [0, -1, 1441] {
            let result = service
                .create("https://example.com".to_string(), Some(validity), None)
                .await;
            assert!(matches!(result, Err(CreateError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_create_invalid_custom_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_insert().times(0);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        for code in ["ABCD", "abc", "abcdefghijk", "ab-cd"] {
            let result = service
                .create(
                    "https://example.com".to_string(),
                    None,
                    Some(code.to_string()),
                )
                .await;
            assert!(
                matches!(result, Err(CreateError::Validation(_))),
                "code '{}' should be rejected",
                code
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_normalizes_case() {
        let clock = Arc::new(ManualClock::default());
        let link = create_test_link("abcd", "https://example.com", &clock, 30);

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "abcd")
            .times(1)
            .returning(move |_| Some(link.clone()));

        let (service, _rx) = registry(mock_repo, clock);

        let resolved = service.resolve("ABcd").await.unwrap();
        assert_eq!(resolved.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().returning(|_| None);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service.resolve("missing").await;
        assert_eq!(
            result.unwrap_err(),
            ResolveError::NotFound {
                code: "missing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_expired_but_stats_visible() {
        let clock = Arc::new(ManualClock::default());
        let link = create_test_link("old1", "https://example.com", &clock, 1);
        let expires_at = link.expires_at;

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_code()
            .returning(move |_| Some(link.clone()));

        let (service, _rx) = registry(mock_repo, clock.clone());

        assert!(service.resolve("old1").await.is_ok());

        clock.advance(Duration::minutes(1));

        assert_eq!(
            service.resolve("old1").await.unwrap_err(),
            ResolveError::Expired {
                code: "old1".to_string(),
                expired_at: expires_at,
            }
        );
        assert!(service.lookup_for_stats("old1").await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_for_stats_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_code().returning(|_| None);

        let (service, _rx) = registry(mock_repo, Arc::new(ManualClock::default()));

        let result = service.lookup_for_stats("nothere").await;
        assert!(matches!(result, Err(ResolveError::NotFound { .. })));
    }
}
