// ABOUTME: Re-evaluates a route guard every time the session store changes
// ABOUTME: Exposes the decisions as an async pull API and as a futures Stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clinic Access Contributors

use super::{GuardDecision, RouteGuard};
use crate::permissions::RoutePolicy;
use crate::session::SessionHandle;
use futures_util::stream::{self, Stream, StreamExt};

/// Guard bound to one route and one session handle
#[derive(Debug)]
pub struct GuardWatcher {
    guard: RouteGuard,
    route: RoutePolicy,
    session: SessionHandle,
}

impl GuardWatcher {
    pub(super) const fn new(guard: RouteGuard, route: RoutePolicy, session: SessionHandle) -> Self {
        Self {
            guard,
            route,
            session,
        }
    }

    /// Decision for the current session snapshot
    #[must_use]
    pub fn current(&mut self) -> GuardDecision {
        let state = self.session.current();
        self.guard.evaluate(&state, &self.route)
    }

    /// Wait for the session to change and return the new decision
    ///
    /// Returns `None` once the session provider has gone away.
    pub async fn next_decision(&mut self) -> Option<GuardDecision> {
        let state = self.session.changed().await?;
        Some(self.guard.evaluate(&state, &self.route))
    }

    /// Current decision followed by one decision per session change
    pub fn into_stream(mut self) -> impl Stream<Item = GuardDecision> {
        let first = self.current();
        stream::once(async move { first }).chain(stream::unfold(self, |mut watcher| async move {
            let decision = watcher.next_decision().await?;
            Some((decision, watcher))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::GuardState;
    use crate::permissions::RoutePolicyTable;
    use crate::session;
    use clinic_core::models::{Role, Session, SessionState};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_stream_follows_session_changes() {
        let guard = RouteGuard::new(Arc::new(RoutePolicyTable::standard().unwrap()));
        let route = RoutePolicy::new("/doctor-dashboard", [Role::Doctor, Role::Admin]);
        let (publisher, handle) = session::channel(SessionState::loading());

        let mut decisions = Box::pin(guard.watch(route, handle).into_stream());
        assert_eq!(decisions.next().await.unwrap().state, GuardState::Pending);

        publisher.publish(SessionState::authenticated(Session::new(
            Uuid::new_v4(),
            "doc@x.com",
            Some(Role::Doctor),
        )));
        assert_eq!(decisions.next().await.unwrap().state, GuardState::Allowed);

        publisher.publish(SessionState::unauthenticated());
        assert_eq!(
            decisions.next().await.unwrap().state,
            GuardState::DeniedUnauthenticated
        );

        drop(publisher);
        assert!(decisions.next().await.is_none());
    }
}
