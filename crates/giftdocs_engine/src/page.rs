/* 📖 # Why tickets?

Execution finishes after a simulated delay. By then the reader may have pressed
Execute again or reset the page. Each execution gets a fresh ticket and a
completion is only accepted while the page is still executing that ticket, so a
late result can never overwrite a newer one.
*/

use tracing::debug;

use crate::endpoint::EndpointId;
use crate::representation::Representation;
use crate::samples::CodeSampleSet;
use crate::simulate::{ExecutionResult, ResultStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionState {
    Idle,
    Executing { ticket: u64 },
    Success(ExecutionResult),
    Error(ExecutionResult),
}

impl ExecutionState {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Executing { .. } => "executing",
            ExecutionState::Success(_) => "success",
            ExecutionState::Error(_) => "error",
        }
    }
}

/// Everything the delayed run needs, captured when Execute is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub ticket: u64,
    pub endpoint: EndpointId,
    pub representation: Representation,
    pub text: String,
}

/// State of one open endpoint page.
#[derive(Debug, Clone)]
pub struct PageState {
    endpoint: EndpointId,
    active: Representation,
    samples: CodeSampleSet,
    execution: ExecutionState,
    last_ticket: u64,
}

impl PageState {
    pub fn new(endpoint: EndpointId, base_url: &str) -> Self {
        Self {
            endpoint,
            active: Representation::Curl,
            samples: CodeSampleSet::defaults(endpoint, base_url),
            execution: ExecutionState::Idle,
            last_ticket: 0,
        }
    }

    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    pub fn active(&self) -> Representation {
        self.active
    }

    pub fn samples(&self) -> &CodeSampleSet {
        &self.samples
    }

    pub fn execution(&self) -> &ExecutionState {
        &self.execution
    }

    pub fn active_text(&self) -> &str {
        self.samples.get(self.active)
    }

    pub fn switch_tab(&mut self, representation: Representation) {
        self.active = representation;
    }

    /// Replace the text of the active representation only.
    pub fn edit_active(&mut self, text: impl Into<String>) {
        self.samples.set(self.active, text);
    }

    /// Enter `Executing` with a new ticket. Any earlier ticket becomes stale.
    pub fn begin_execution(&mut self) -> ExecutionRequest {
        self.last_ticket += 1;
        self.execution = ExecutionState::Executing {
            ticket: self.last_ticket,
        };
        ExecutionRequest {
            ticket: self.last_ticket,
            endpoint: self.endpoint,
            representation: self.active,
            text: self.active_text().to_string(),
        }
    }

    /// Accept a result for `ticket`. Returns false, and changes nothing, if the ticket is stale.
    pub fn complete(&mut self, ticket: u64, result: ExecutionResult) -> bool {
        if self.execution != (ExecutionState::Executing { ticket }) {
            debug!(endpoint = %self.endpoint, ticket, "Ignoring stale completion");
            return false;
        }
        self.execution = match result.status {
            ResultStatus::Success => ExecutionState::Success(result),
            ResultStatus::Error => ExecutionState::Error(result),
        };
        true
    }

    /// Back to `Idle` with default samples. A pending ticket is invalidated.
    pub fn reset(&mut self) {
        self.samples.reset();
        self.execution = ExecutionState::Idle;
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        match &self.execution {
            ExecutionState::Success(result) | ExecutionState::Error(result) => Some(result),
            ExecutionState::Idle | ExecutionState::Executing { .. } => None,
        }
    }

    /// Text for the copy button, if there is a response.
    pub fn copy_response(&self) -> Option<String> {
        self.result().map(ExecutionResult::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::simulate;

    fn page() -> PageState {
        PageState::new(EndpointId::Login, "https://api.99gift.in")
    }

    fn run(request: &ExecutionRequest) -> ExecutionResult {
        simulate(request.endpoint, &request.text, request.representation)
    }

    #[test]
    fn test_execute_then_complete() {
        let mut page = page();
        assert_eq!(page.execution().name(), "idle");

        let request = page.begin_execution();
        assert_eq!(page.execution().name(), "executing");
        assert!(page.complete(request.ticket, run(&request)));
        assert_eq!(page.execution().name(), "success");
        assert!(page.copy_response().unwrap().contains("Login Success!"));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut page = page();
        let first = page.begin_execution();
        page.edit_active("curl -X POST");
        let second = page.begin_execution();

        assert!(!page.complete(first.ticket, run(&first)));
        assert_eq!(page.execution(), &ExecutionState::Executing { ticket: second.ticket });

        assert!(page.complete(second.ticket, run(&second)));
        assert_eq!(page.execution().name(), "error");
        // a ticket completes at most once
        assert!(!page.complete(second.ticket, run(&second)));
    }

    #[test]
    fn test_reset_invalidates_pending_ticket() {
        let mut page = page();
        page.edit_active("changed");
        let request = page.begin_execution();
        page.reset();

        assert!(!page.complete(request.ticket, run(&request)));
        assert_eq!(page.execution(), &ExecutionState::Idle);
        assert!(!page.samples().is_modified(Representation::Curl));
        assert_eq!(page.copy_response(), None);
    }

    #[test]
    fn test_edit_only_changes_active_tab() {
        let mut page = page();
        page.switch_tab(Representation::Python);
        page.edit_active("login_data = {}");
        assert_eq!(page.active_text(), "login_data = {}");
        assert!(!page.samples().is_modified(Representation::Curl));
        assert!(page.samples().is_modified(Representation::Python));

        let request = page.begin_execution();
        assert_eq!(request.representation, Representation::Python);
        assert_eq!(request.text, "login_data = {}");
    }
}
