//! Jobs, job types, and running-job queries.

use std::sync::Arc;

use crate::config::{DeckConfig, PollIntervals};
use crate::models::{
    Job, JobDetails, JobType, JobTypeStatus, JobUpdate, ResultPage, RunningJobGroup,
};
use crate::poll::{PollPolicy, PollerFactory};
use crate::resource::{JobsParams, ResourceDescriptor};
use crate::traits::FetchError;
use crate::transform;

use super::{patch_value, ServiceSubscription};

/// Queries over `jobs/`, `job-types/`, and the running-jobs rollup.
#[derive(Clone)]
pub struct JobsService {
    factory: PollerFactory,
    config: Arc<DeckConfig>,
    policy: PollPolicy,
}

impl JobsService {
    pub fn new(factory: PollerFactory, config: Arc<DeckConfig>) -> Self {
        Self {
            factory,
            config,
            policy: PollPolicy::StopOnError,
        }
    }

    /// Use `policy` for the polls this service starts.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn jobs_resource(&self, params: &JobsParams) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("jobs/")).with_params(params.to_query())
    }

    /// Poll the jobs grid.
    pub fn jobs(&self, params: &JobsParams) -> ServiceSubscription<ResultPage<Job>> {
        let sub = self.factory.poll_with_policy(
            &self.jobs_resource(params),
            PollIntervals::duration(self.config.poll_intervals.jobs),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch one page of the jobs grid.
    pub async fn jobs_once(&self, params: &JobsParams) -> Result<ResultPage<Job>, FetchError> {
        let value = self.factory.fetch_once(&self.jobs_resource(params)).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// Fetch one job with its executions, recipes, and products.
    pub async fn job_details_once(&self, id: i64) -> Result<JobDetails, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url(&format!("jobs/{}/", id)));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(transform::build(Some(value)))
    }

    /// Fetch the job type catalog.
    pub async fn job_types_once(&self) -> Result<ResultPage<JobType>, FetchError> {
        let resource = ResourceDescriptor::new(self.config.url("job-types/"));
        let value = self.factory.fetch_once(&resource).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    fn job_type_status_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("job-types/status/"))
    }

    /// Poll per-type status counts.
    pub fn job_type_status(&self) -> ServiceSubscription<ResultPage<JobTypeStatus>> {
        let sub = self.factory.poll_with_policy(
            &self.job_type_status_resource(),
            PollIntervals::duration(self.config.poll_intervals.job_type_status),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch per-type status counts once.
    pub async fn job_type_status_once(&self) -> Result<ResultPage<JobTypeStatus>, FetchError> {
        let value = self
            .factory
            .fetch_once(&self.job_type_status_resource())
            .await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    fn running_jobs_resource(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.config.url("job-types/running/"))
    }

    /// Poll the running-jobs rollup.
    pub fn running_jobs(&self) -> ServiceSubscription<ResultPage<RunningJobGroup>> {
        let sub = self.factory.poll_with_policy(
            &self.running_jobs_resource(),
            PollIntervals::duration(self.config.poll_intervals.running_jobs),
            self.policy,
        );
        ServiceSubscription::new(sub, |value| ResultPage::from_value(Some(value)))
    }

    /// Fetch the running-jobs rollup once.
    pub async fn running_jobs_once(&self) -> Result<ResultPage<RunningJobGroup>, FetchError> {
        let value = self.factory.fetch_once(&self.running_jobs_resource()).await?;
        Ok(ResultPage::from_value(Some(value)))
    }

    /// PATCH a job's status (cancel, for instance) and return the updated
    /// details record.
    pub async fn update_job_once(
        &self,
        id: i64,
        update: &JobUpdate,
    ) -> Result<JobDetails, FetchError> {
        let url = self.config.url(&format!("jobs/{}/", id));
        let value = patch_value(self.factory.fetcher().as_ref(), &url, update).await?;
        Ok(transform::build(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockFetcher, MockResponse};
    use crate::models::JobStatus;
    use crate::traits::FetchResponse;
    use bytes::Bytes;
    use serde_json::json;

    fn service_with_mock() -> (JobsService, MockFetcher) {
        let mock = MockFetcher::new();
        let factory = PollerFactory::new(Arc::new(mock.clone()));
        let config = Arc::new(DeckConfig::default().with_api_root("http://smelter/api"));
        (JobsService::new(factory, config), mock)
    }

    fn ok(body: serde_json::Value) -> MockResponse {
        MockResponse::Success(FetchResponse::new(200, Bytes::from(body.to_string())))
    }

    #[tokio::test]
    async fn test_jobs_once_decodes_page() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/jobs/",
            ok(json!({
                "count": 2,
                "next": null,
                "previous": null,
                "results": [
                    {"id": 3, "status": "RUNNING", "job_type": {"name": "landsat-parse"}},
                    {"id": 4, "status": "COMPLETED", "job_type": {"name": "scale-clock"}}
                ]
            })),
        );

        let page = service.jobs_once(&JobsParams::default()).await.unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results[0].status, JobStatus::Running);
        assert_eq!(page.results[1].job_type.name, "scale-clock");
    }

    #[tokio::test]
    async fn test_jobs_once_sends_grid_defaults() {
        let (service, mock) = service_with_mock();
        mock.set_response("http://smelter/api/v4/jobs/", ok(json!({"results": []})));

        service.jobs_once(&JobsParams::default()).await.unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert!(requests[0].url.starts_with("http://smelter/api/v4/jobs/?"));
        assert!(requests[0].url.contains("page=1"));
        assert!(requests[0].url.contains("page_size=25"));
        assert!(requests[0].url.contains("order=-last_modified"));
    }

    #[tokio::test]
    async fn test_job_details_once_hits_id_path() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/jobs/42/",
            ok(json!({
                "id": 42,
                "status": "FAILED",
                "job_exes": [{"id": 7, "status": "FAILED", "exit_code": 1}]
            })),
        );

        let details = service.job_details_once(42).await.unwrap();
        assert_eq!(details.id, Some(42));
        assert_eq!(details.status, JobStatus::Failed);
        assert_eq!(details.latest_execution().unwrap().exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_running_jobs_once() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/job-types/running/",
            ok(json!({
                "count": 1,
                "results": [
                    {"job_type": {"name": "landsat-parse"}, "count": 9,
                     "longest_running": "2015-09-08T15:24:53.503Z"}
                ]
            })),
        );

        let page = service.running_jobs_once().await.unwrap();
        assert_eq!(page.results[0].count, 9);
        assert_eq!(page.results[0].job_type.name, "landsat-parse");
    }

    #[tokio::test]
    async fn test_update_job_once_patches_status() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/jobs/42/",
            ok(json!({"id": 42, "status": "CANCELED"})),
        );

        let update = JobUpdate {
            status: JobStatus::Canceled,
        };
        let details = service.update_job_once(42, &update).await.unwrap();
        assert_eq!(details.status, JobStatus::Canceled);

        let requests = mock.get_requests();
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(requests[0].url, "http://smelter/api/v4/jobs/42/");
        assert_eq!(
            requests[0].body.as_deref(),
            Some(r#"{"status":"CANCELED"}"#)
        );
    }

    #[tokio::test]
    async fn test_update_job_once_propagates_status_error() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/jobs/42/",
            MockResponse::Success(FetchResponse::new(400, Bytes::from("bad transition"))),
        );

        let update = JobUpdate {
            status: JobStatus::Canceled,
        };
        let err = service.update_job_once(42, &update).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 400, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_jobs_poll_delivers_typed_pages() {
        let (service, mock) = service_with_mock();
        mock.set_response(
            "http://smelter/api/v4/jobs/",
            ok(json!({"count": 1, "results": [{"id": 5, "status": "QUEUED"}]})),
        );

        let mut sub = service.jobs(&JobsParams::default());
        let tick = sub.next_tick().await.unwrap();
        let page = tick.data().unwrap();
        assert_eq!(page.results[0].id, Some(5));
        assert_eq!(page.results[0].status, JobStatus::Queued);
        sub.stop();
        assert!(sub.is_stopped());
    }
}
