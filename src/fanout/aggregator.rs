//! Response Aggregation
//!
//! Folds the per-backend results of one fan-out into a single client reply.
//!
//! Each operation has its own merge strategy (`FetchMerge`, `QueryMerge`,
//! `SetMerge`), all sharing the status policy implemented by
//! [`Merge::aggregate`]:
//!
//! - Start at `Success`.
//! - A reply with status `>= 200` is decoded and merged; a `206` reply
//!   downgrades the aggregate to `Partial`.
//! - A transport failure, a status below `200` or an undecodable body
//!   downgrades to `Partial`. One dead backend never turns the reply into a
//!   server error, since the other backends' data is still returned.
//! - Failing to serialize the merged body is the only path to `ServerError`.
//!
//! Merging is concatenation or summation, so the result does not depend on the
//! order replies arrived in.

use super::dispatcher::BackendResult;
use super::protocol::{
    FetchItem, QueryItem, STATUS_PARTIAL, STATUS_SERVER_ERROR, STATUS_SUCCESS, SetResponse,
};
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStatus {
    Success,
    Partial,
    ServerError,
}

impl AggregateStatus {
    pub fn code(self) -> u16 {
        match self {
            AggregateStatus::Success => STATUS_SUCCESS,
            AggregateStatus::Partial => STATUS_PARTIAL,
            AggregateStatus::ServerError => STATUS_SERVER_ERROR,
        }
    }
}

/// Merged reply, ready to be written to the client.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub body: Bytes,
    pub status: AggregateStatus,
}

/// Merge strategy for one operation type.
pub trait Merge {
    /// Shape of a single backend's reply body.
    type Reply: DeserializeOwned;
    /// Shape of the merged client reply.
    type Output: Serialize;

    const OPERATION: &'static str;

    fn empty() -> Self::Output;

    fn absorb(output: &mut Self::Output, reply: Self::Reply);

    /// Final say on the status once every reply is merged.
    fn classify(_output: &Self::Output, status: AggregateStatus) -> AggregateStatus {
        status
    }

    fn aggregate(results: Vec<BackendResult>) -> AggregateResult {
        let mut output = Self::empty();
        let mut status = AggregateStatus::Success;

        for result in results {
            match result.outcome {
                Ok(reply) if reply.status >= STATUS_SUCCESS => {
                    match serde_json::from_slice::<Self::Reply>(&reply.body) {
                        Ok(parsed) => {
                            Self::absorb(&mut output, parsed);
                            if reply.status == STATUS_PARTIAL {
                                status = AggregateStatus::Partial;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                "{}: undecodable reply from backend {}: {}",
                                Self::OPERATION,
                                result.index,
                                e
                            );
                            status = AggregateStatus::Partial;
                        }
                    }
                }
                Ok(reply) => {
                    tracing::warn!(
                        "{}: backend {} answered with status {}",
                        Self::OPERATION,
                        result.index,
                        reply.status
                    );
                    status = AggregateStatus::Partial;
                }
                Err(e) => {
                    tracing::warn!("{}: {}", Self::OPERATION, e);
                    status = AggregateStatus::Partial;
                }
            }
        }

        let status = Self::classify(&output, status);

        match serde_json::to_vec(&output) {
            Ok(body) => AggregateResult {
                body: body.into(),
                status,
            },
            Err(e) => {
                tracing::error!("{}: failed to encode merged reply: {}", Self::OPERATION, e);
                AggregateResult {
                    body: Bytes::new(),
                    status: AggregateStatus::ServerError,
                }
            }
        }
    }
}

/// Concatenates `/fetch` item lists.
pub struct FetchMerge;

impl Merge for FetchMerge {
    type Reply = Vec<FetchItem>;
    type Output = Vec<FetchItem>;

    const OPERATION: &'static str = "fetch";

    fn empty() -> Self::Output {
        Vec::new()
    }

    fn absorb(output: &mut Self::Output, reply: Self::Reply) {
        output.extend(reply);
    }
}

/// Concatenates `/query` item lists.
pub struct QueryMerge;

impl Merge for QueryMerge {
    type Reply = Vec<QueryItem>;
    type Output = Vec<QueryItem>;

    const OPERATION: &'static str = "query";

    fn empty() -> Self::Output {
        Vec::new()
    }

    fn absorb(output: &mut Self::Output, reply: Self::Reply) {
        output.extend(reply);
    }
}

/// Sums `keys_added` and concatenates `keys_failed`.
pub struct SetMerge;

impl Merge for SetMerge {
    type Reply = SetResponse;
    type Output = SetResponse;

    const OPERATION: &'static str = "set";

    fn empty() -> Self::Output {
        SetResponse::default()
    }

    fn absorb(output: &mut Self::Output, reply: Self::Reply) {
        output.keys_added = output.keys_added.saturating_add(reply.keys_added);
        output.keys_failed.extend(reply.keys_failed);
    }

    // Any failed key makes the write partial even if every backend said 200.
    fn classify(output: &Self::Output, status: AggregateStatus) -> AggregateStatus {
        if output.keys_failed.is_empty() {
            status
        } else {
            AggregateStatus::Partial
        }
    }
}
