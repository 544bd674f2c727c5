use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::MoyaResult;
use crate::response::Response;

type Waiters = Vec<oneshot::Sender<MoyaResult<Response>>>;

/// Requests currently on the wire, keyed by endpoint, with the callers waiting on each.
#[derive(Default)]
pub(super) struct InflightRequests {
    entries: Mutex<HashMap<Endpoint, Waiters>>,
}

pub(super) enum Joined<'requests> {
    /// The caller sends the request and shares its result.
    Leader(LeaderGuard<'requests>),
    /// An identical request is already running.
    Waiter(oneshot::Receiver<MoyaResult<Response>>),
}

impl InflightRequests {
    pub(super) fn join(&self, endpoint: &Endpoint) -> Joined<'_> {
        let mut entries = self.lock();
        if let Some(waiters) = entries.get_mut(endpoint) {
            let (sender, receiver) = oneshot::channel();
            waiters.push(sender);
            debug!("Joining in-flight request to {}", endpoint.url);
            return Joined::Waiter(receiver);
        }
        entries.insert(endpoint.clone(), Vec::new());
        Joined::Leader(LeaderGuard {
            requests: self,
            endpoint: endpoint.clone(),
            completed: false,
        })
    }

    pub(super) fn len(&self) -> usize {
        self.lock().len()
    }

    fn take(&self, endpoint: &Endpoint) -> Waiters {
        self.lock().remove(endpoint).unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Endpoint, Waiters>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes the in-flight entry when dropped; waiters left behind observe a closed channel.
pub(super) struct LeaderGuard<'requests> {
    requests: &'requests InflightRequests,
    endpoint: Endpoint,
    completed: bool,
}

impl LeaderGuard<'_> {
    /// Hands the leader's result to every waiter.
    pub(super) fn complete(mut self, result: &MoyaResult<Response>) {
        self.completed = true;
        for waiter in self.requests.take(&self.endpoint) {
            if waiter.send(result.clone()).is_err() {
                debug!("In-flight waiter for {} went away", self.endpoint.url);
            }
        }
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        // A completed leader already took its entry; a newer leader may own the key now.
        if self.completed {
            return;
        }
        let orphaned = self.requests.take(&self.endpoint);
        if !orphaned.is_empty() {
            debug!(
                "Dropping {} in-flight waiters for {}",
                orphaned.len(),
                self.endpoint.url
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::endpoint::EndpointSampleResponse;
    use crate::target::Method;
    use crate::task::Task;

    fn endpoint(url: &str) -> Endpoint {
        Endpoint::new(
            url,
            || EndpointSampleResponse::NetworkResponse(200, Bytes::new()),
            Method::Get,
            Task::RequestPlain,
            None,
        )
    }

    #[tokio::test(flavor = "current_thread")]
    async fn waiters_receive_leader_result() -> Result<(), String> {
        let requests = InflightRequests::default();
        let Joined::Leader(leader) = requests.join(&endpoint("https://example.com/a")) else {
            return Err("First caller should lead".to_owned());
        };
        let Joined::Waiter(waiter) = requests.join(&endpoint("https://example.com/a")) else {
            return Err("Second caller should wait".to_owned());
        };
        if requests.len() != 1 {
            return Err(format!("Expected one entry, got {}", requests.len()));
        }
        leader.complete(&Ok(Response::new(200, "shared")));
        let result = waiter.await.map_err(|err| err.to_string())?;
        match result {
            Ok(response) if response.data == "shared" => {}
            other => return Err(format!("Unexpected result: {:?}", other)),
        }
        if requests.len() != 0 {
            return Err("Entry should be removed after completion".to_owned());
        }
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn dropped_leader_releases_waiters() -> Result<(), String> {
        let requests = InflightRequests::default();
        let leader = requests.join(&endpoint("https://example.com/b"));
        let Joined::Waiter(waiter) = requests.join(&endpoint("https://example.com/b")) else {
            return Err("Second caller should wait".to_owned());
        };
        drop(leader);
        if waiter.await.is_ok() {
            return Err("Waiter should see a closed channel".to_owned());
        }
        if requests.len() != 0 {
            return Err("Entry should be removed on drop".to_owned());
        }
        Ok(())
    }

    #[test]
    fn distinct_endpoints_lead_separately() -> Result<(), String> {
        let requests = InflightRequests::default();
        let first = requests.join(&endpoint("https://example.com/a"));
        let second = requests.join(&endpoint("https://example.com/c"));
        if !matches!((&first, &second), (Joined::Leader(_), Joined::Leader(_))) {
            return Err("Distinct endpoints should both lead".to_owned());
        }
        if requests.len() != 2 {
            return Err(format!("Expected two entries, got {}", requests.len()));
        }
        Ok(())
    }
}
