use std::future::Future;

use profwatch_api::model::profile_record::{DetectRequest, ProfileRecord};
use profwatch_api::serde_json::{self, Value};
use profwatch_api::{ApiError, API};
use tracing::{error, info, warn};

use crate::helper::form::Component;
use crate::helper::view::{Failure, FailureReason, Outcome, Render, View};

pub const FETCH_ERROR: &str = "Error fetching profile data. Please try again.";
pub const EMPTY_RESULT: &str = "No profile data returned. Please check the username and try again.";

/// Single-username detector.
#[derive(Debug, Default)]
pub struct Detector {
    username: String,
    view: View<ProfileRecord>,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Username of the latest submission.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Component for Detector {
    type Request = DetectRequest;
    type Response = Vec<ProfileRecord>;
    type Data = ProfileRecord;

    fn prepare(&mut self, input: &str) -> DetectRequest {
        self.username = input.to_owned();
        DetectRequest::new(input)
    }

    fn dispatch(
        api: API,
        req: DetectRequest,
    ) -> impl Future<Output = Result<Vec<ProfileRecord>, ApiError>> + Send + 'static {
        async move { api.detect_profile(&req).await }
    }

    fn accept(&mut self, result: Result<Vec<ProfileRecord>, ApiError>) {
        let outcome = match result {
            Ok(records) => match records.into_iter().next() {
                Some(first) => {
                    info!("{}: {}", first.username, first.status);
                    Outcome::Success(first)
                }
                None => {
                    warn!("no profile returned for {}", self.username);
                    Outcome::Failure(Failure::new(FailureReason::Empty, EMPTY_RESULT))
                }
            },
            Err(e) => {
                error!("Error fetching profile data for {}: {e}", self.username);
                Outcome::Failure(Failure::new(FailureReason::from(&e), FETCH_ERROR))
            }
        };
        self.view.apply(outcome);
    }

    fn view(&self) -> &View<ProfileRecord> {
        &self.view
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

impl Render for ProfileRecord {
    fn render_text(&self) -> String {
        let ProfileRecord {
            username,
            followers_count,
            following_count,
            subscriptions_count,
            is_verified,
            status,
        } = self;
        format!(
            "Profile Data\n\
             Username: {username}\n\
             Followers Count: {followers_count}\n\
             Following Count: {following_count}\n\
             Subscriptions Count: {subscriptions_count}\n\
             Is Verified: {}\n\
             Status: {status}",
            yes_no(*is_verified)
        )
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
