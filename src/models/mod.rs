pub mod ingest;
pub mod job;
pub mod node;
pub mod page;
pub mod recipe;
pub mod status;

pub use ingest::{
    FeedValue, Ingest, IngestFileRule, IngestStatus, Scan, Strike, StrikeConfiguration,
    StrikeFeed, Workspace,
};
pub use job::{
    Job, JobCount, JobData, JobDataEntry, JobDetails, JobError, JobEvent, JobExecution,
    JobStatus, JobType, JobTypeStatus, JobUpdate, Performance, PerformanceLevel, Product,
    RunningJobGroup,
};
pub use node::{Node, NodeState, NodeStatus, NodeUpdate};
pub use page::ResultPage;
pub use recipe::{Recipe, RecipeDetails, RecipeJob, RecipeType};
pub use status::{
    JobLoad, MasterInfo, QueueStatus, QueueStatusReport, ResourceGauge, ResourceSlice,
    SchedulerInfo, SchedulerUpdate, SystemStatus, VersionInfo,
};
