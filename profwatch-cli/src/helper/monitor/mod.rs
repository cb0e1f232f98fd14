use std::future::Future;

use profwatch_api::model::monitor::{ListPolicy, MonitorRequest, MonitorStatus};
use profwatch_api::serde_json::{self, Value};
use profwatch_api::{ApiError, API};
use tracing::{debug, error, info};

use crate::helper::form::Component;
use crate::helper::view::{Failure, FailureReason, Outcome, Render, View};

pub const MONITOR_ERROR: &str = "Error monitoring profiles. Please try again.";

const BLOCK_RULE: &str = "----";

/// Results of one monitor round, in backend order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusList(pub Vec<MonitorStatus>);

impl Render for StatusList {
    fn render_text(&self) -> String {
        self.0
            .iter()
            .map(|row| format!("Status: {}\n{BLOCK_RULE}", row.status))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(&self.0).unwrap_or_default()
    }
}

/// Batch monitor over a comma-separated username list.
#[derive(Debug, Default)]
pub struct Monitor {
    policy: ListPolicy,
    profiles: Vec<String>,
    view: View<StatusList>,
}

impl Monitor {
    pub fn new(policy: ListPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Profiles sent by the latest submission.
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }
}

impl Component for Monitor {
    type Request = MonitorRequest;
    type Response = Vec<MonitorStatus>;
    type Data = StatusList;

    fn prepare(&mut self, input: &str) -> MonitorRequest {
        let req = MonitorRequest::from_input(input, self.policy);
        self.profiles = req.profiles.clone();
        req
    }

    fn dispatch(
        api: API,
        req: MonitorRequest,
    ) -> impl Future<Output = Result<Vec<MonitorStatus>, ApiError>> + Send + 'static {
        async move { api.monitor(&req).await }
    }

    fn accept(&mut self, result: Result<Vec<MonitorStatus>, ApiError>) {
        let outcome = match result {
            Ok(rows) => {
                info!("{} of {} profiles reported", rows.len(), self.profiles.len());
                for row in &rows {
                    if let Some(username) = &row.username {
                        debug!("{username}: {}", row.status);
                    }
                }
                Outcome::Success(StatusList(rows))
            }
            Err(e) => {
                error!("Error monitoring {:?}: {e}", self.profiles);
                Outcome::Failure(Failure::new(FailureReason::from(&e), MONITOR_ERROR))
            }
        };
        self.view.apply(outcome);
    }

    fn view(&self) -> &View<StatusList> {
        &self.view
    }
}
