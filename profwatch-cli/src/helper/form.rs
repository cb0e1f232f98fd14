use std::future::Future;

use profwatch_api::{ApiError, API};
use tracing::debug;

use crate::helper::view::{Render, View};

/// One submit-and-render flow.
pub trait Component {
    type Request: Send + 'static;
    type Response: Send + 'static;
    type Data: Render;

    /// Records the raw input and turns it into the request payload.
    fn prepare(&mut self, input: &str) -> Self::Request;

    fn dispatch(
        api: API,
        req: Self::Request,
    ) -> impl Future<Output = Result<Self::Response, ApiError>> + Send + 'static;

    /// Folds a settled response into the view.
    fn accept(&mut self, result: Result<Self::Response, ApiError>);

    fn view(&self) -> &View<Self::Data>;
}

/// Identifies one submission. Only the latest ticket may touch the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

pub struct Form<C> {
    component: C,
    issued: u64,
}

impl<C: Component> Form<C> {
    pub fn new(component: C) -> Self {
        Self {
            component,
            issued: 0,
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    /// Starts a submission, superseding every earlier one.
    pub fn begin(&mut self, input: &str) -> (Ticket, C::Request) {
        self.issued += 1;
        let req = self.component.prepare(input);
        (Ticket(self.issued), req)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Returns false when the response belongs to a superseded submission
    /// and was dropped.
    pub fn settle(&mut self, ticket: Ticket, result: Result<C::Response, ApiError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "dropped stale response for submission {} (latest {})",
                ticket.0, self.issued
            );
            return false;
        }
        self.component.accept(result);
        true
    }

    pub async fn submit(&mut self, api: &API, input: &str) -> &C {
        let (ticket, req) = self.begin(input);
        let result = C::dispatch(api.clone(), req).await;
        self.settle(ticket, result);
        &self.component
    }
}
