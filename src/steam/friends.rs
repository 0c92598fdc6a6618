//! Friend-list aggregation.
//!
//! Resolves a user and every one of their friends into display records and
//! answers once all of them have landed:
//!
//! 1. Look up the user's friend SteamIDs.
//! 2. A hidden friend list falls back to resolving the user alone and
//!    answering with the hidden-profile payload.
//! 3. Otherwise resolve the user plus each friend in one concurrent fan-out.
//!    Results are slotted by position, so ids/names/avatars stay aligned and
//!    keep the upstream friend order regardless of completion order.
//! 4. The first failed resolve aborts the request; the remaining in-flight
//!    lookups are dropped.
//!
//! The whole request runs under a timeout.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

use super::client::SteamApi;
use super::types::{FriendListResponse, HiddenProfileResponse, ProfileRecord};
use crate::error::{HubError, UpstreamError, HIDDEN_MESSAGE};

/// Sent when the hidden-profile fallback cannot resolve the user's name.
pub const CONVERT_ID_ERROR: &str = "An error has occurred while converting ID to name.";

/// Sent when any resolve in the fan-out fails.
pub const CONVERT_IDS_ERROR: &str = "An error has occurred while converting IDs to names.";

/// Terminal result of a friend-list request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendListOutcome {
    Complete(FriendListResponse),
    Hidden(HiddenProfileResponse),
}

/// Per-request accumulator.
///
/// Slot 0 is the requesting user; slot `i + 1` is friend `i`. Each slot is
/// filled at most once and the request is complete when none are
/// outstanding.
#[derive(Debug)]
struct AggregationState {
    steam_id: String,
    friend_ids: Vec<String>,
    own_profile: Option<ProfileRecord>,
    friend_profiles: Vec<Option<ProfileRecord>>,
    outstanding: usize,
}

impl AggregationState {
    fn new(steam_id: &str, friend_ids: Vec<String>) -> Self {
        let friend_profiles = vec![None; friend_ids.len()];
        Self {
            steam_id: steam_id.to_string(),
            outstanding: friend_ids.len() + 1,
            friend_ids,
            own_profile: None,
            friend_profiles,
        }
    }

    /// The requesting user followed by each friend, in friend-list order.
    fn resolution_set(&self) -> Vec<String> {
        std::iter::once(self.steam_id.clone())
            .chain(self.friend_ids.iter().cloned())
            .collect()
    }

    fn record(&mut self, slot: usize, profile: ProfileRecord) {
        let target = if slot == 0 {
            &mut self.own_profile
        } else {
            match self.friend_profiles.get_mut(slot - 1) {
                Some(entry) => entry,
                None => return,
            }
        };

        if target.is_none() {
            *target = Some(profile);
            self.outstanding -= 1;
        }
    }

    fn is_complete(&self) -> bool {
        self.outstanding == 0
    }

    fn into_response(self) -> Option<FriendListResponse> {
        if !self.is_complete() {
            return None;
        }
        let own = self.own_profile?;

        let mut friendnames = Vec::with_capacity(self.friend_ids.len());
        let mut friend_avatars = Vec::with_capacity(self.friend_ids.len());
        for profile in self.friend_profiles.into_iter().flatten() {
            friendnames.push(profile.display_name);
            friend_avatars.push(profile.avatar_url);
        }

        Some(FriendListResponse {
            steamusername: own.display_name,
            steamuseravatar: own.avatar_url,
            usercreated: own.created_at,
            steamuserid: self.steam_id,
            player_status: own.status,
            friendids: self.friend_ids,
            friendnames,
            friend_avatars,
        })
    }
}

/// Friend aggregation engine.
#[derive(Clone)]
pub struct FriendAggregator {
    api: Arc<dyn SteamApi>,
    timeout: Duration,
}

impl FriendAggregator {
    pub fn new(api: Arc<dyn SteamApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Resolve `steam_id` and all of its friends.
    pub async fn resolve_friends(&self, steam_id: &str) -> Result<FriendListOutcome, HubError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("friendlist", %request_id, steam_id);

        async {
            match tokio::time::timeout(self.timeout, self.aggregate(steam_id)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.timeout.as_secs(),
                        "Friend list resolution timed out"
                    );
                    Err(HubError::TimedOut)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn aggregate(&self, steam_id: &str) -> Result<FriendListOutcome, HubError> {
        let friend_ids = match self.api.lookup_relations(steam_id).await {
            Ok(ids) => ids,
            Err(UpstreamError::Hidden) => return self.hidden_fallback(steam_id).await,
            Err(e) => {
                tracing::info!(error = %e, "Friend list lookup failed");
                return Err(e.into());
            }
        };

        tracing::debug!(friends = friend_ids.len(), "Resolving friend names");

        let mut state = AggregationState::new(steam_id, friend_ids);
        let mut pending: FuturesUnordered<_> = state
            .resolution_set()
            .into_iter()
            .enumerate()
            .map(|(slot, id)| {
                let api = Arc::clone(&self.api);
                async move { (slot, api.resolve_identity(&id).await) }
            })
            .collect();

        while !state.is_complete() {
            let Some((slot, result)) = pending.next().await else {
                break;
            };
            match result {
                Ok(profile) => state.record(slot, profile),
                Err(e) => {
                    tracing::warn!(slot, error = %e, "Failed to resolve SteamID");
                    return Err(HubError::ConversionFailure(CONVERT_IDS_ERROR));
                }
            }
        }

        let response = state
            .into_response()
            .ok_or(HubError::ConversionFailure(CONVERT_IDS_ERROR))?;

        tracing::info!(friends = response.friendids.len(), "Friend list resolved");
        Ok(FriendListOutcome::Complete(response))
    }

    async fn hidden_fallback(&self, steam_id: &str) -> Result<FriendListOutcome, HubError> {
        match self.api.resolve_identity(steam_id).await {
            Ok(profile) => {
                tracing::info!("Friend list hidden; answering with username only");
                Ok(FriendListOutcome::Hidden(HiddenProfileResponse {
                    error: HIDDEN_MESSAGE.to_string(),
                    username: profile.display_name,
                    hidden: "true".to_string(),
                }))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve hidden user's name");
                Err(HubError::ConversionFailure(CONVERT_ID_ERROR))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::steam::fake::{profile, FakeSteam};
    use crate::steam::types::PersonaStatus;

    fn aggregator(fake: FakeSteam) -> (FriendAggregator, Arc<FakeSteam>) {
        let fake = Arc::new(fake);
        (
            FriendAggregator::new(fake.clone(), Duration::from_secs(5)),
            fake,
        )
    }

    fn three_friends() -> FakeSteam {
        FakeSteam::default()
            .with_profile("U1", profile("Alice"))
            .with_profile("F1", profile("Bob"))
            .with_profile("F2", profile("Carol"))
            .with_relations("U1", Ok(vec!["F1".to_string(), "F2".to_string()]))
    }

    #[tokio::test]
    async fn test_resolves_user_and_friends() {
        let (engine, fake) = aggregator(three_friends());

        let outcome = engine.resolve_friends("U1").await.unwrap();
        let FriendListOutcome::Complete(response) = outcome else {
            panic!("expected a complete friend list");
        };

        assert_eq!(response.steamusername, "Alice");
        assert_eq!(response.steamuserid, "U1");
        assert_eq!(response.player_status, PersonaStatus::Online);
        assert_eq!(response.friendids, vec!["F1", "F2"]);
        assert_eq!(response.friendnames, vec!["Bob", "Carol"]);
        assert_eq!(
            response.friend_avatars,
            vec!["https://avatars.example/Bob.jpg", "https://avatars.example/Carol.jpg"]
        );
        assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_does_not_reorder_friends() {
        let fake = three_friends()
            .with_delay("F1", Duration::from_millis(500))
            .with_delay("U1", Duration::from_millis(250));
        let (engine, _fake) = aggregator(fake);

        let FriendListOutcome::Complete(response) = engine.resolve_friends("U1").await.unwrap()
        else {
            panic!("expected a complete friend list");
        };

        assert_eq!(response.friendids, vec!["F1", "F2"]);
        assert_eq!(response.friendnames, vec!["Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_parallel_sequences_stay_aligned() {
        let ids: Vec<String> = (0..25).map(|i| format!("F{}", i)).collect();
        let mut fake = FakeSteam::default()
            .with_profile("U1", profile("Alice"))
            .with_relations("U1", Ok(ids.clone()));
        for id in &ids {
            fake = fake.with_profile(id, profile(&format!("name-{}", id)));
        }
        let (engine, _fake) = aggregator(fake);

        let FriendListOutcome::Complete(response) = engine.resolve_friends("U1").await.unwrap()
        else {
            panic!("expected a complete friend list");
        };

        assert_eq!(response.friendids.len(), 25);
        assert_eq!(response.friendnames.len(), 25);
        assert_eq!(response.friend_avatars.len(), 25);
        for (i, id) in response.friendids.iter().enumerate() {
            assert_eq!(response.friendnames[i], format!("name-{}", id));
            assert_eq!(
                response.friend_avatars[i],
                format!("https://avatars.example/name-{}.jpg", id)
            );
        }
    }

    #[tokio::test]
    async fn test_repeated_requests_are_stable() {
        let (engine, _fake) = aggregator(three_friends());

        let first = engine.resolve_friends("U1").await.unwrap();
        let second = engine.resolve_friends("U1").await.unwrap();

        let triples = |outcome: FriendListOutcome| -> HashSet<(String, String, String)> {
            let FriendListOutcome::Complete(r) = outcome else {
                panic!("expected a complete friend list");
            };
            r.friendids
                .into_iter()
                .zip(r.friendnames)
                .zip(r.friend_avatars)
                .map(|((id, name), avatar)| (id, name, avatar))
                .collect()
        };
        assert_eq!(triples(first), triples(second));
    }

    #[tokio::test]
    async fn test_empty_friend_list() {
        let fake = FakeSteam::default()
            .with_profile("U3", profile("Erin"))
            .with_relations("U3", Ok(vec![]));
        let (engine, _fake) = aggregator(fake);

        let FriendListOutcome::Complete(response) = engine.resolve_friends("U3").await.unwrap()
        else {
            panic!("expected a complete friend list");
        };
        assert_eq!(response.steamusername, "Erin");
        assert!(response.friendids.is_empty());
        assert!(response.friendnames.is_empty());
        assert!(response.friend_avatars.is_empty());
    }

    #[tokio::test]
    async fn test_hidden_profile_falls_back_to_username() {
        let fake = FakeSteam::default()
            .with_profile("U2", profile("Dana"))
            .with_relations("U2", Err(UpstreamError::Hidden));
        let (engine, fake) = aggregator(fake);

        let outcome = engine.resolve_friends("U2").await.unwrap();
        assert_eq!(
            outcome,
            FriendListOutcome::Hidden(HiddenProfileResponse {
                error: HIDDEN_MESSAGE.to_string(),
                username: "Dana".to_string(),
                hidden: "true".to_string(),
            })
        );
        assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hidden_profile_fallback_failure() {
        let fake = FakeSteam::default().with_relations("U2", Err(UpstreamError::Hidden));
        let (engine, _fake) = aggregator(fake);

        assert_eq!(
            engine.resolve_friends("U2").await,
            Err(HubError::ConversionFailure(CONVERT_ID_ERROR))
        );
    }

    #[tokio::test]
    async fn test_lookup_error_skips_resolution() {
        for (lookup_error, expected) in [
            (UpstreamError::InvalidIdentifier, HubError::InvalidIdentifier),
            (
                UpstreamError::Unavailable("HTTP 503".to_string()),
                HubError::UpstreamUnavailable,
            ),
        ] {
            let fake = FakeSteam::default()
                .with_profile("BAD", profile("Nobody"))
                .with_relations("BAD", Err(lookup_error));
            let (engine, fake) = aggregator(fake);

            assert_eq!(engine.resolve_friends("BAD").await, Err(expected));
            assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_friend_failure_aborts_request() {
        let fake = FakeSteam::default()
            .with_profile("U1", profile("Alice"))
            .with_profile("F1", profile("Bob"))
            .with_relations("U1", Ok(vec!["F1".to_string(), "GONE".to_string()]));
        let (engine, _fake) = aggregator(fake);

        assert_eq!(
            engine.resolve_friends("U1").await,
            Err(HubError::ConversionFailure(CONVERT_IDS_ERROR))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_wait_for_stalled_lookups() {
        let fake = three_friends()
            .with_relations("U1", Ok(vec!["STUCK".to_string(), "GONE".to_string()]))
            .stalled("STUCK");
        let (engine, _fake) = aggregator(fake);

        assert_eq!(
            engine.resolve_friends("U1").await,
            Err(HubError::ConversionFailure(CONVERT_IDS_ERROR))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_run_concurrently() {
        let ids: Vec<String> = (0..10).map(|i| format!("F{}", i)).collect();
        let mut fake = FakeSteam::default()
            .with_profile("U1", profile("Alice"))
            .with_relations("U1", Ok(ids.clone()))
            .with_delay("U1", Duration::from_secs(1));
        for id in &ids {
            fake = fake
                .with_profile(id, profile(id))
                .with_delay(id, Duration::from_secs(1));
        }
        let engine = FriendAggregator::new(Arc::new(fake), Duration::from_secs(60));

        let started = tokio::time::Instant::now();
        let outcome = engine.resolve_friends("U1").await.unwrap();
        let elapsed = started.elapsed();

        assert!(matches!(outcome, FriendListOutcome::Complete(_)));
        assert!(
            elapsed < Duration::from_secs(2),
            "11 one-second lookups took {:?}",
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_hidden_fallback_times_out() {
        let fake = FakeSteam::default()
            .with_profile("U2", profile("Dana"))
            .with_relations("U2", Err(UpstreamError::Hidden))
            .stalled("U2");
        let (engine, _fake) = aggregator(fake);

        assert_eq!(engine.resolve_friends("U2").await, Err(HubError::TimedOut));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_lookup_times_out() {
        let fake = three_friends().stalled("F2");
        let (engine, _fake) = aggregator(fake);

        assert_eq!(engine.resolve_friends("U1").await, Err(HubError::TimedOut));
    }

    #[test]
    fn test_state_counts_each_slot_once() {
        let mut state = AggregationState::new("U1", vec!["F1".to_string()]);
        assert_eq!(state.resolution_set(), vec!["U1", "F1"]);
        assert!(!state.is_complete());

        state.record(1, profile("Bob"));
        state.record(1, profile("Bob again"));
        assert!(!state.is_complete());

        state.record(7, profile("Out of range"));
        assert!(!state.is_complete());

        state.record(0, profile("Alice"));
        assert!(state.is_complete());

        let response = state.into_response().unwrap();
        assert_eq!(response.friendnames, vec!["Bob"]);
        assert_eq!(response.steamusername, "Alice");
    }

    #[test]
    fn test_incomplete_state_has_no_response() {
        let state = AggregationState::new("U1", vec!["F1".to_string()]);
        assert!(state.into_response().is_none());
    }
}
