//! Request Orchestration
//!
//! `ShardRouter` drives one client request through
//! `Decoding -> Partitioning -> Dispatching -> Aggregating`; the handler layer
//! writes the result back. Any decoding failure returns before a backend is
//! contacted.

use super::error::RouteError;
use crate::cluster::config::RouterConfig;
use crate::cluster::types::Backends;
use crate::fanout::aggregator::{AggregateResult, FetchMerge, Merge, QueryMerge, SetMerge};
use crate::fanout::client::BackendClient;
use crate::fanout::dispatcher::{Dispatcher, SubRequest};
use crate::fanout::protocol::{
    ENDPOINT_FETCH, ENDPOINT_QUERY, ENDPOINT_SET, Encoded, KeyRequest, SetRequest,
};
use crate::sharding::partitioner::Partitioner;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// The client-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /fetch`
    FetchAll,
    /// `POST /fetch`
    Fetch,
    /// `POST /query`
    Query,
    /// `PUT /set`
    Set,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::FetchAll => "fetch_all",
            Operation::Fetch => "fetch",
            Operation::Query => "query",
            Operation::Set => "set",
        }
    }
}

/// Shared, read-only routing context: one per process.
pub struct ShardRouter {
    backends: Backends,
    partitioner: Partitioner,
    dispatcher: Dispatcher,
}

impl ShardRouter {
    pub fn new(backends: Backends, dispatcher: Dispatcher) -> Self {
        Self {
            partitioner: Partitioner::new(&backends),
            backends,
            dispatcher,
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(
            config.backends.clone(),
            Dispatcher::new(BackendClient::new(config.backend_timeout)),
        )
    }

    pub async fn handle(&self, op: Operation, body: &[u8]) -> Result<AggregateResult, RouteError> {
        match op {
            Operation::FetchAll => self.fetch_all().await,
            Operation::Fetch => {
                let keys: Vec<KeyRequest> = decode_body(body)?;
                self.fetch(keys).await
            }
            Operation::Query => {
                let keys: Vec<KeyRequest> = decode_body(body)?;
                self.query(keys).await
            }
            Operation::Set => {
                let pairs: Vec<SetRequest> = decode_body(body)?;
                self.set(pairs).await
            }
        }
    }

    /// Asks every backend for everything it holds.
    pub async fn fetch_all(&self) -> Result<AggregateResult, RouteError> {
        let requests = self
            .backends
            .iter()
            .enumerate()
            .map(|(index, backend)| SubRequest {
                index,
                backend: backend.clone(),
                method: Method::GET,
                endpoint: ENDPOINT_FETCH,
                body: None,
            })
            .collect();

        let results = self.dispatcher.dispatch(requests).await;
        Ok(FetchMerge::aggregate(results))
    }

    pub async fn fetch(&self, keys: Vec<KeyRequest>) -> Result<AggregateResult, RouteError> {
        self.route_keys::<FetchMerge>(keys, ENDPOINT_FETCH).await
    }

    pub async fn query(&self, keys: Vec<KeyRequest>) -> Result<AggregateResult, RouteError> {
        self.route_keys::<QueryMerge>(keys, ENDPOINT_QUERY).await
    }

    pub async fn set(&self, pairs: Vec<SetRequest>) -> Result<AggregateResult, RouteError> {
        let groups = self.partitioner.group(pairs, |pair| &pair.key)?;
        tracing::debug!("set: {} key(s) spread over {} backend(s)", count(&groups), groups.len());

        let requests = self.sub_requests(groups, Method::PUT, ENDPOINT_SET, |bucket| bucket)?;
        let results = self.dispatcher.dispatch(requests).await;
        Ok(SetMerge::aggregate(results))
    }

    // Backends receive the bare key list for /fetch and /query.
    async fn route_keys<M: Merge>(
        &self,
        keys: Vec<KeyRequest>,
        endpoint: &'static str,
    ) -> Result<AggregateResult, RouteError> {
        let groups = self.partitioner.group(keys, |item| &item.key)?;
        tracing::debug!(
            "{}: {} key(s) spread over {} backend(s)",
            M::OPERATION,
            count(&groups),
            groups.len()
        );

        let requests = self.sub_requests(groups, Method::POST, endpoint, |bucket| {
            bucket.into_iter().map(|item| item.key).collect::<Vec<Encoded>>()
        })?;
        let results = self.dispatcher.dispatch(requests).await;
        Ok(M::aggregate(results))
    }

    fn sub_requests<T, B, F>(
        &self,
        groups: BTreeMap<usize, Vec<T>>,
        method: Method,
        endpoint: &'static str,
        to_body: F,
    ) -> Result<Vec<SubRequest>, RouteError>
    where
        B: Serialize,
        F: Fn(Vec<T>) -> B,
    {
        groups
            .into_iter()
            .map(|(index, bucket)| -> Result<SubRequest, RouteError> {
                let backend = self
                    .backends
                    .get(index)
                    .ok_or(RouteError::UnknownBackend(index))?
                    .clone();
                let body = serde_json::to_vec(&to_body(bucket)).map_err(RouteError::Encode)?;
                Ok(SubRequest {
                    index,
                    backend,
                    method: method.clone(),
                    endpoint,
                    body: Some(Bytes::from(body)),
                })
            })
            .collect()
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RouteError> {
    serde_json::from_slice(body).map_err(RouteError::BadBody)
}

fn count<T>(groups: &BTreeMap<usize, Vec<T>>) -> usize {
    groups.values().map(Vec::len).sum()
}
