//! Batch executor
//!
//! Submits change requests as continue-on-error batches and reports every
//! item outcome as an event. When the service refuses a batch because it is
//! larger than its maximum batch size M, the batch is cut into consecutive
//! chunks of at most M requests which are executed one after another, each
//! with the same protocol. Every other call-level failure propagates.

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::client::{BatchItemResponse, MetadataService};
use crate::errors::{ServiceError, ServiceResult};
use crate::events::EventSink;
use crate::models::ChangeRequest;

/// Outcome of executing a list of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Items the service reported as successful.
    pub succeeded: usize,
    /// Messages of the items the service rejected.
    pub faults: Vec<String>,
}

impl BatchResult {
    pub fn merge(&mut self, other: BatchResult) {
        self.succeeded += other.succeeded;
        self.faults.extend(other.faults);
    }
}

pub struct BatchExecutor<'a> {
    service: &'a dyn MetadataService,
    events: &'a dyn EventSink,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(service: &'a dyn MetadataService, events: &'a dyn EventSink) -> Self {
        Self { service, events }
    }

    /// Execute `requests`, splitting on the service's batch size limit.
    pub async fn execute(&self, requests: &[ChangeRequest]) -> ServiceResult<BatchResult> {
        if requests.is_empty() {
            return Ok(BatchResult::default());
        }
        self.execute_batch(requests).await
    }

    fn execute_batch<'b>(&'b self, requests: &'b [ChangeRequest]) -> BoxFuture<'b, ServiceResult<BatchResult>> {
        Box::pin(async move {
            debug!("Executing batch of {} requests", requests.len());
            match self.service.execute_batch(requests, true).await {
                Ok(responses) => self.report(requests, responses),
                Err(ServiceError::BatchSizeExceeded { max_batch_size, .. })
                    if max_batch_size > 0 && max_batch_size < requests.len() =>
                {
                    info!(
                        "Batch of {} requests exceeds the maximum batch size of {}, splitting into {} batches",
                        requests.len(),
                        max_batch_size,
                        requests.len().div_ceil(max_batch_size)
                    );
                    let mut total = BatchResult::default();
                    for chunk in requests.chunks(max_batch_size) {
                        total.merge(self.execute_batch(chunk).await?);
                    }
                    Ok(total)
                }
                Err(err) => Err(err),
            }
        })
    }

    /// Every index is checked before any event goes out, so a malformed
    /// reply reports nothing.
    fn report(&self, requests: &[ChangeRequest], responses: Vec<BatchItemResponse>) -> ServiceResult<BatchResult> {
        let mut seen = vec![false; requests.len()];
        for response in &responses {
            match seen.get_mut(response.request_index) {
                Some(seen) if !*seen => *seen = true,
                Some(_) => {
                    return Err(ServiceError::protocol(format!(
                        "Response repeats request {} of a batch of {}",
                        response.request_index,
                        requests.len()
                    )));
                }
                None => {
                    return Err(ServiceError::protocol(format!(
                        "Response refers to request {} of a batch of {}",
                        response.request_index,
                        requests.len()
                    )));
                }
            }
        }

        let mut result = BatchResult::default();
        for response in responses {
            let request = &requests[response.request_index];
            match response.fault {
                None => {
                    result.succeeded += 1;
                    self.events.success(success_message(request));
                }
                Some(fault) => {
                    self.events.error(fault.message.clone());
                    result.faults.push(fault.message);
                }
            }
        }
        Ok(result)
    }
}

fn in_solution(message: String, solution: Option<&str>) -> String {
    match solution.filter(|s| !s.is_empty()) {
        Some(solution) => format!("{message} in solution {solution}."),
        None => format!("{message}."),
    }
}

/// Human-readable line for a request the service accepted.
pub fn success_message(request: &ChangeRequest) -> String {
    match request {
        ChangeRequest::CreateRecordType(r) => in_solution(
            format!("Created record type {}", r.record_type.schema_name),
            r.solution_unique_name.as_deref(),
        ),
        ChangeRequest::CreateField(r) => in_solution(
            format!("Added field {} to {}", r.field.schema_name, r.record_type_logical_name),
            r.solution_unique_name.as_deref(),
        ),
        ChangeRequest::CreateOptionSet(r) => in_solution(
            format!(
                "Created global option set {} with {} options",
                r.option_set.name,
                r.option_set.options.len()
            ),
            r.solution_unique_name.as_deref(),
        ),
        ChangeRequest::CreateOneToMany(r) => in_solution(
            format!(
                "Added 1:N relationship {} from {} to {}",
                r.relationship.schema_name,
                r.relationship.referencing_record_type,
                r.relationship.referenced_record_type
            ),
            r.solution_unique_name.as_deref(),
        ),
        ChangeRequest::CreateManyToMany(r) => in_solution(
            format!(
                "Added N:N relationship {} between {} and {}",
                r.relationship.schema_name,
                r.relationship.record_type_1_logical_name,
                r.relationship.record_type_2_logical_name
            ),
            r.solution_unique_name.as_deref(),
        ),
        ChangeRequest::DeleteRecordType(r) => format!("Deleted record type {}.", r.logical_name),
        ChangeRequest::DeleteField(r) => {
            format!("Deleted field {} from {}.", r.logical_name, r.record_type_logical_name)
        }
        ChangeRequest::DeleteRelationship(r) => format!("Deleted relationship {}.", r.name),
        ChangeRequest::DeleteOptionSet(r) => format!("Deleted option set {}.", r.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::models::{DeleteOptionSet, DeleteRelationship};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Service double with a batch size limit and a set of names it rejects.
    struct LimitedService {
        max_batch_size: usize,
        rejected: HashSet<String>,
        calls: Mutex<Vec<usize>>,
    }

    impl LimitedService {
        fn new(max_batch_size: usize) -> Self {
            Self {
                max_batch_size,
                rejected: HashSet::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataService for LimitedService {
        async fn execute_batch(
            &self,
            requests: &[ChangeRequest],
            _continue_on_error: bool,
        ) -> ServiceResult<Vec<BatchItemResponse>> {
            self.calls.lock().unwrap().push(requests.len());
            if requests.len() > self.max_batch_size {
                return Err(ServiceError::BatchSizeExceeded {
                    max_batch_size: self.max_batch_size,
                    message: "too many requests".to_string(),
                });
            }
            Ok(requests
                .iter()
                .enumerate()
                .map(|(index, request)| match request {
                    ChangeRequest::DeleteOptionSet(r) if self.rejected.contains(&r.name) => {
                        BatchItemResponse::fault(index, format!("{} not found", r.name))
                    }
                    _ => BatchItemResponse::success(index),
                })
                .collect())
        }

        async fn publish_all(&self) -> ServiceResult<()> {
            Ok(())
        }

        async fn current_locale(&self) -> ServiceResult<Option<crate::models::Locale>> {
            Ok(None)
        }
    }

    fn requests(count: usize) -> Vec<ChangeRequest> {
        (0..count)
            .map(|i| {
                ChangeRequest::DeleteOptionSet(DeleteOptionSet {
                    name: format!("set_{i}"),
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn oversized_batch_is_split_into_chunks() {
        let service = LimitedService::new(100);
        let events = CollectingEventSink::new();
        let executor = BatchExecutor::new(&service, &events);

        let result = executor.execute(&requests(250)).await.unwrap();

        assert_eq!(result.succeeded, 250);
        assert_eq!(service.calls(), vec![250, 100, 100, 50]);
        assert_eq!(events.successes().len(), 250);
    }

    #[tokio::test]
    async fn item_faults_are_reported_without_stopping_the_batch() {
        let mut service = LimitedService::new(10);
        service.rejected.insert("set_1".to_string());
        let events = CollectingEventSink::new();
        let executor = BatchExecutor::new(&service, &events);

        let result = executor.execute(&requests(3)).await.unwrap();

        assert_eq!(result.succeeded, 2);
        assert_eq!(result.faults, vec!["set_1 not found"]);
        assert_eq!(events.errors(), vec!["set_1 not found"]);
        assert_eq!(events.successes(), vec!["Deleted option set set_0.", "Deleted option set set_2."]);
    }

    #[tokio::test]
    async fn empty_input_makes_no_call() {
        let service = LimitedService::new(10);
        let events = CollectingEventSink::new();
        let result = BatchExecutor::new(&service, &events).execute(&[]).await.unwrap();
        assert_eq!(result, BatchResult::default());
        assert!(service.calls().is_empty());
    }

    struct FailingService(fn() -> ServiceError);

    #[async_trait]
    impl MetadataService for FailingService {
        async fn execute_batch(
            &self,
            _requests: &[ChangeRequest],
            _continue_on_error: bool,
        ) -> ServiceResult<Vec<BatchItemResponse>> {
            Err((self.0)())
        }

        async fn publish_all(&self) -> ServiceResult<()> {
            Ok(())
        }

        async fn current_locale(&self) -> ServiceResult<Option<crate::models::Locale>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn other_call_failures_propagate() {
        let service = FailingService(|| ServiceError::fault("service unavailable"));
        let events = CollectingEventSink::new();
        let err = BatchExecutor::new(&service, &events).execute(&requests(5)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Fault { .. }));
    }

    #[tokio::test]
    async fn size_fault_that_cannot_shrink_the_batch_propagates() {
        let service = FailingService(|| ServiceError::BatchSizeExceeded {
            max_batch_size: 10,
            message: "limit".to_string(),
        });
        let events = CollectingEventSink::new();
        let err = BatchExecutor::new(&service, &events).execute(&requests(5)).await.unwrap_err();
        assert_eq!(err.max_batch_size(), Some(10));
    }

    /// Replies with a fixed list of responses whatever the batch holds.
    struct ScriptedService(Vec<BatchItemResponse>);

    #[async_trait]
    impl MetadataService for ScriptedService {
        async fn execute_batch(
            &self,
            _requests: &[ChangeRequest],
            _continue_on_error: bool,
        ) -> ServiceResult<Vec<BatchItemResponse>> {
            Ok(self.0.clone())
        }

        async fn publish_all(&self) -> ServiceResult<()> {
            Ok(())
        }

        async fn current_locale(&self) -> ServiceResult<Option<crate::models::Locale>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn repeated_response_index_is_rejected_before_any_event() {
        let service = ScriptedService(vec![
            BatchItemResponse::success(0),
            BatchItemResponse::success(1),
            BatchItemResponse::success(0),
        ]);
        let events = CollectingEventSink::new();

        let err = BatchExecutor::new(&service, &events).execute(&requests(2)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Protocol { .. }));
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_response_index_is_rejected_before_any_event() {
        let service = ScriptedService(vec![BatchItemResponse::success(0), BatchItemResponse::success(5)]);
        let events = CollectingEventSink::new();

        let err = BatchExecutor::new(&service, &events).execute(&requests(2)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Protocol { .. }));
        assert!(events.events().is_empty());
    }

    #[test]
    fn messages_name_the_solution_when_given() {
        use crate::models::{CreateOptionSet, OptionSetMetadata};
        let request = ChangeRequest::CreateOptionSet(CreateOptionSet {
            solution_unique_name: Some("core".to_string()),
            option_set: OptionSetMetadata {
                name: "new_colour".to_string(),
                display_name: None,
                description: None,
                is_global: true,
                options: Vec::new(),
            },
        });
        assert_eq!(
            success_message(&request),
            "Created global option set new_colour with 0 options in solution core."
        );
        assert_eq!(
            success_message(&ChangeRequest::DeleteRelationship(DeleteRelationship {
                name: "new_a_b".to_string()
            })),
            "Deleted relationship new_a_b."
        );
    }

    proptest! {
        #[test]
        fn split_issues_ceil_n_over_m_sub_batches(count in 1usize..400, max in 1usize..150) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let service = LimitedService::new(max);
            let events = CollectingEventSink::new();
            let result = runtime
                .block_on(BatchExecutor::new(&service, &events).execute(&requests(count)))
                .unwrap();

            prop_assert_eq!(result.succeeded, count);
            let calls = service.calls();
            let sub_batches: Vec<usize> = if count > max { calls[1..].to_vec() } else { calls.clone() };
            prop_assert_eq!(sub_batches.len(), count.div_ceil(max));
            prop_assert!(sub_batches.iter().all(|&size| size <= max));
            prop_assert_eq!(sub_batches.iter().sum::<usize>(), count);
        }
    }
}
