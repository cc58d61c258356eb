use chrono::{DateTime, Utc};

use super::Companion;
use crate::api::RecordApi;
use crate::credentials::CredentialSource;
use crate::presenter::{NoticeKind, Presenter};

/// What a refresh check decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    NoCredentials,
    /// Auto-refresh is turned off.
    Disabled,
    /// There is no recorded fetch to measure staleness against.
    NeverFetched,
    /// The last fetch is recent enough.
    Fresh,
    Refreshed,
    RefreshFailed,
    /// The stored interval or fetch time could not be read.
    Unreadable,
}

impl<A, C, P> Companion<A, C, P>
where
    A: RecordApi,
    C: CredentialSource,
    P: Presenter,
{
    /// Refreshes the vehicle list if the last fetch is older than the
    /// configured refresh interval.
    pub async fn refresh_if_stale(&mut self) -> RefreshDecision {
        self.refresh_if_stale_at(Utc::now()).await
    }

    pub(crate) async fn refresh_if_stale_at(&mut self, now: DateTime<Utc>) -> RefreshDecision {
        let Some(credentials) = self.credentials.credentials() else {
            return RefreshDecision::NoCredentials;
        };

        let interval = match self.store.refresh_interval() {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!("Failed to read refresh interval: {}", e);
                return RefreshDecision::Unreadable;
            }
        };
        let Some(threshold) = interval.threshold() else {
            return RefreshDecision::Disabled;
        };

        let last_fetch = match self.store.last_fetch_time() {
            Ok(Some(at)) => at,
            Ok(None) => return RefreshDecision::NeverFetched,
            Err(e) => {
                tracing::warn!("Failed to read last fetch time: {}", e);
                return RefreshDecision::Unreadable;
            }
        };

        if now - last_fetch <= threshold {
            tracing::debug!("Vehicle list is fresh (fetched {})", last_fetch);
            return RefreshDecision::Fresh;
        }

        self.presenter
            .notify("Refreshing vehicle list...", NoticeKind::Info);
        match self.refresh_vehicles_at(&credentials, now).await {
            Ok(_) => RefreshDecision::Refreshed,
            Err(_) => RefreshDecision::RefreshFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::super::test_support::*;
    use super::*;
    use crate::models::RefreshInterval;

    fn fetched_ago(ctx: &TestContext, now: DateTime<Utc>, hours: i64) {
        ctx.companion
            .store()
            .set_last_fetch_time(now - Duration::hours(hours))
            .unwrap();
    }

    #[tokio::test]
    async fn test_stale_after_one_day() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 25);

        let decision = ctx.companion.refresh_if_stale_at(now).await;

        assert_eq!(decision, RefreshDecision::Refreshed);
        assert_eq!(ctx.companion.api().fetches.get(), 1);
        assert_eq!(ctx.companion.store().last_fetch_time().unwrap(), Some(now));
        assert!(ctx
            .companion
            .presenter()
            .has_notice("Refreshing vehicle list..."));
    }

    #[tokio::test]
    async fn test_fresh_within_one_day() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 23);

        let decision = ctx.companion.refresh_if_stale_at(now).await;

        assert_eq!(decision, RefreshDecision::Fresh);
        assert_eq!(ctx.companion.api().fetches.get(), 0);
    }

    #[tokio::test]
    async fn test_repeated_checks_fetch_once() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 48);

        let first = ctx.companion.refresh_if_stale_at(now).await;
        let second = ctx.companion.refresh_if_stale_at(now).await;
        let third = ctx
            .companion
            .refresh_if_stale_at(now + Duration::hours(1))
            .await;

        assert_eq!(first, RefreshDecision::Refreshed);
        assert_eq!(second, RefreshDecision::Fresh);
        assert_eq!(third, RefreshDecision::Fresh);
        assert_eq!(ctx.companion.api().fetches.get(), 1);
    }

    #[tokio::test]
    async fn test_disabled_never_fetches() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 24 * 365);
        ctx.companion
            .store()
            .set_refresh_interval(RefreshInterval::Disabled)
            .unwrap();

        for _ in 0..3 {
            assert_eq!(
                ctx.companion.refresh_if_stale_at(now).await,
                RefreshDecision::Disabled
            );
        }
        assert_eq!(ctx.companion.api().fetches.get(), 0);
    }

    #[tokio::test]
    async fn test_longer_interval() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 24 * 6);
        ctx.companion
            .store()
            .set_refresh_interval(RefreshInterval::Days(7))
            .unwrap();

        assert_eq!(
            ctx.companion.refresh_if_stale_at(now).await,
            RefreshDecision::Fresh
        );
        assert_eq!(
            ctx.companion
                .refresh_if_stale_at(now + Duration::hours(25))
                .await,
            RefreshDecision::Refreshed
        );
    }

    #[tokio::test]
    async fn test_never_fetched_is_noop() {
        let mut ctx = setup();

        let decision = ctx.companion.refresh_if_stale_at(Utc::now()).await;

        assert_eq!(decision, RefreshDecision::NeverFetched);
        assert_eq!(ctx.companion.api().fetches.get(), 0);
    }

    #[tokio::test]
    async fn test_no_credentials_is_noop() {
        let mut ctx = setup_logged_out();
        let now = Utc::now();
        fetched_ago(&ctx, now, 100);

        let decision = ctx.companion.refresh_if_stale_at(now).await;

        assert_eq!(decision, RefreshDecision::NoCredentials);
        assert_eq!(ctx.companion.api().fetches.get(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_is_noop() {
        let mut ctx = setup();
        std::fs::create_dir_all(ctx.companion.store().data_dir()).unwrap();
        std::fs::write(
            ctx.companion.store().data_dir().join("last_fetch_time"),
            "yesterday-ish",
        )
        .unwrap();

        let decision = ctx.companion.refresh_if_stale_at(Utc::now()).await;

        assert_eq!(decision, RefreshDecision::Unreadable);
        assert_eq!(ctx.companion.api().fetches.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_timestamp() {
        let mut ctx = setup();
        let now = Utc::now();
        fetched_ago(&ctx, now, 30);
        ctx.companion.api().fail_fetch.set(true);

        let decision = ctx.companion.refresh_if_stale_at(now).await;

        assert_eq!(decision, RefreshDecision::RefreshFailed);
        assert_eq!(
            ctx.companion.store().last_fetch_time().unwrap(),
            Some(now - Duration::hours(30))
        );
    }
}
