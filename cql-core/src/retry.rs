mod retry_policy;

pub use crate::retry::retry_policy::{
    FallthroughRetryPolicy, FallthroughRetrySession, QueryInfo, RetryDecision, RetryPolicy,
    RetrySession, SimpleRetryPolicy, SimpleRetrySession,
};
