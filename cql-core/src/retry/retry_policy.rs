use derive_more::{Constructor, Display};

use crate::error::Error;

#[derive(Debug, PartialEq, Eq, Ord, PartialOrd, Hash, Copy, Clone, Display)]
pub enum RetryDecision {
    RetrySameNode,
    RetryNextNode,
    DontRetry,
}

/// Information about a failed query.
pub struct QueryInfo<'a> {
    pub error: &'a Error,
    /// Number of attempts made so far, including the failed one.
    pub attempt: usize,
}

/// Query-specific information about current state of retrying.
pub trait RetrySession {
    /// Decide what to do with the failing query.
    fn decide(&mut self, query_info: QueryInfo) -> RetryDecision;
}

/// Retry policy determines what to do in case of communication error.
pub trait RetryPolicy {
    /// Called for each new query, starts a session of deciding about retries.
    fn new_session(&self) -> Box<dyn RetrySession + Send + Sync>;
}

/// Forwards all errors directly to the user, never retries
#[derive(Default, Debug)]
pub struct FallthroughRetryPolicy;

impl RetryPolicy for FallthroughRetryPolicy {
    fn new_session(&self) -> Box<dyn RetrySession + Send + Sync> {
        Box::new(FallthroughRetrySession)
    }
}

#[derive(Default)]
pub struct FallthroughRetrySession;

impl RetrySession for FallthroughRetrySession {
    fn decide(&mut self, _query_info: QueryInfo) -> RetryDecision {
        RetryDecision::DontRetry
    }
}

/// Retries any failure on a freshly picked connection, up to `num_retries` times, so a request
/// is attempted at most `num_retries + 1` times. No backoff is applied between attempts.
#[derive(Default, Debug, Clone, Copy, Constructor)]
pub struct SimpleRetryPolicy {
    num_retries: usize,
}

impl SimpleRetryPolicy {
    #[inline]
    pub fn num_retries(&self) -> usize {
        self.num_retries
    }
}

impl RetryPolicy for SimpleRetryPolicy {
    fn new_session(&self) -> Box<dyn RetrySession + Send + Sync> {
        Box::new(SimpleRetrySession::new(self.num_retries))
    }
}

#[derive(Constructor)]
pub struct SimpleRetrySession {
    remaining: usize,
}

impl RetrySession for SimpleRetrySession {
    fn decide(&mut self, _query_info: QueryInfo) -> RetryDecision {
        if self.remaining == 0 {
            return RetryDecision::DontRetry;
        }

        self.remaining -= 1;
        RetryDecision::RetryNextNode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide_all(session: &mut dyn RetrySession, count: usize) -> Vec<RetryDecision> {
        let error = Error::Timeout("read".into());
        (1..=count)
            .map(|attempt| {
                session.decide(QueryInfo {
                    error: &error,
                    attempt,
                })
            })
            .collect()
    }

    #[test]
    fn simple_policy_should_retry_num_retries_times() {
        let mut session = SimpleRetryPolicy::new(2).new_session();
        assert_eq!(
            decide_all(session.as_mut(), 3),
            vec![
                RetryDecision::RetryNextNode,
                RetryDecision::RetryNextNode,
                RetryDecision::DontRetry
            ]
        );
    }

    #[test]
    fn simple_policy_sessions_should_be_independent() {
        let policy = SimpleRetryPolicy::new(1);
        let mut first = policy.new_session();
        let mut second = policy.new_session();

        assert_eq!(
            decide_all(first.as_mut(), 2),
            vec![RetryDecision::RetryNextNode, RetryDecision::DontRetry]
        );
        assert_eq!(
            decide_all(second.as_mut(), 1),
            vec![RetryDecision::RetryNextNode]
        );
    }

    #[test]
    fn fallthrough_policy_should_never_retry() {
        let mut session = FallthroughRetryPolicy.new_session();
        assert_eq!(decide_all(session.as_mut(), 2), vec![RetryDecision::DontRetry; 2]);
    }
}
