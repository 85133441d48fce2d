//! The execution pipeline: resolve, authorize, validate, run, stream.

use crate::ExecutionRequest;
use relay_auth::AuthEngine;
use relay_command::{CommandDef, CommandRegistry, ExecContext, Outcome, RunError};
use relay_types::{ErrorReason, Principal, ProgressEvent};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::Instrument;

/// Bounded per-execution event buffer. Provides backpressure only;
/// events are never reordered.
const EVENT_BUFFER: usize = 32;

/// Drives command executions and streams their progress events.
///
/// Cheap to clone conceptually (holds `Arc`s); one engine serves many
/// concurrent executions, each on its own tokio task with its own
/// event stream.
///
/// # Failure Model
///
/// `execute` itself never fails — every failure path terminates the
/// returned stream with exactly one `error` event carrying an
/// [`ErrorReason`]:
///
/// | Step | Reason |
/// |------|--------|
/// | Registry lookup | `unknown_command` |
/// | Authorization | `unauthorized` |
/// | Parameter validation | `invalid_parameters` |
/// | Unit error / panic | `execution_failed` |
/// | Deadline expiry | `timeout` |
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    registry: Arc<CommandRegistry>,
    auth: AuthEngine,
}

impl ExecutionEngine {
    /// Creates an engine over a composed registry and auth engine.
    #[must_use]
    pub fn new(registry: Arc<CommandRegistry>, auth: AuthEngine) -> Self {
        Self { registry, auth }
    }

    /// The command catalog.
    #[must_use]
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// The authorization engine.
    #[must_use]
    pub fn auth(&self) -> &AuthEngine {
        &self.auth
    }

    /// Lists the commands a principal may invoke, in registration
    /// order. Discovery surface for any presentation layer.
    #[must_use]
    pub fn list(&self, principal: &Principal) -> Vec<Arc<CommandDef>> {
        self.registry.list(principal, &self.auth)
    }

    /// Executes a command, returning its ordered event stream.
    ///
    /// The stream yields zero or more `running` events followed by
    /// exactly one terminal event, after which it closes. Dropping the
    /// receiver cancels the execution cooperatively: the unit observes
    /// a closed stream at its next emission; side effects already
    /// performed are not rolled back.
    #[must_use]
    pub fn execute(&self, request: ExecutionRequest) -> mpsc::Receiver<ProgressEvent> {
        self.execute_with_deadline(request, None)
    }

    /// Executes a command with an optional transport-imposed deadline.
    ///
    /// When the deadline expires before the unit finishes, the stream
    /// is terminated with an `error` event, reason `timeout`, and the
    /// engine detaches from the unit — the unit is signalled through
    /// its closed event channel but not preemptively stopped.
    #[must_use]
    pub fn execute_with_deadline(
        &self,
        request: ExecutionRequest,
        deadline: Option<Duration>,
    ) -> mpsc::Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let registry = Arc::clone(&self.registry);
        let auth = self.auth.clone();
        let span = tracing::info_span!(
            "execute",
            id = %request.id,
            command = %request.command,
            principal = %request.principal,
        );
        tokio::spawn(run_execution(registry, auth, request, deadline, tx).instrument(span));
        rx
    }
}

/// One execution, start to terminal event.
async fn run_execution(
    registry: Arc<CommandRegistry>,
    auth: AuthEngine,
    request: ExecutionRequest,
    deadline: Option<Duration>,
    tx: mpsc::Sender<ProgressEvent>,
) {
    // Step 1: resolve. No authorization or validation on failure.
    let def = match registry.lookup(&request.command) {
        Ok(def) => def,
        Err(err) => {
            send_terminal(
                &tx,
                ProgressEvent::error(ErrorReason::UnknownCommand, err.to_string()),
            )
            .await;
            return;
        }
    };

    // Step 2: authorize before validation, so schema details are not
    // leaked to unauthorized callers.
    if !auth.authorize(&request.principal, def.permission()) {
        tracing::debug!("authorization denied");
        send_terminal(
            &tx,
            ProgressEvent::error(
                ErrorReason::Unauthorized,
                format!(
                    "principal '{}' is not authorized to run '{}'",
                    request.principal, request.command
                ),
            ),
        )
        .await;
        return;
    }

    // Step 3: validate.
    let params = match def.schema().validate(&request.params) {
        Ok(params) => params,
        Err(violations) => {
            send_terminal(
                &tx,
                ProgressEvent::error(ErrorReason::InvalidParameters, violations.to_string())
                    .with_data("violations", violations.to_data()),
            )
            .await;
            return;
        }
    };

    // Step 4: run the unit on its own task, forwarding its events.
    let (unit_tx, mut unit_rx) = mpsc::channel(EVENT_BUFFER);
    let runnable = def.runnable();
    let unit: JoinHandle<Result<Outcome, RunError>> = tokio::spawn(
        async move {
            let ctx = ExecContext::new(unit_tx);
            runnable.run(params, &ctx).await
        }
        .in_current_span(),
    );

    let deadline_at = deadline.map(|d| Instant::now() + d);

    loop {
        let next = match deadline_at {
            Some(at) => match tokio::time::timeout_at(at, unit_rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    // Deadline expired: terminate the stream and detach.
                    // Closing unit_rx signals the unit cooperatively;
                    // it is not preemptively stopped.
                    tracing::debug!("deadline expired, detaching from unit");
                    unit_rx.close();
                    send_terminal(
                        &tx,
                        ProgressEvent::error(ErrorReason::Timeout, "execution deadline expired"),
                    )
                    .await;
                    return;
                }
            },
            None => unit_rx.recv().await,
        };

        match next {
            Some(event) => {
                // Forwarded unmodified, in emission order.
                if tx.send(event).await.is_err() {
                    tracing::debug!("caller disconnected, cancelling execution");
                    unit_rx.close();
                    return;
                }
            }
            // Unit finished and its context was dropped; buffer drained.
            None => break,
        }
    }

    // Step 5: synthesize the single terminal event from the unit's
    // result. A panic is caught here rather than propagated, so the
    // stream always terminates.
    let terminal = match unit.await {
        Ok(Ok(outcome)) => {
            let (message, data) = outcome.into_parts();
            ProgressEvent::success(message).with_payload(data)
        }
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "command failed");
            let (message, data) = err.into_parts();
            ProgressEvent::error(ErrorReason::ExecutionFailed, message).with_payload(data)
        }
        Err(join_err) => {
            let message = failure_message(join_err);
            tracing::warn!(%message, "command aborted abnormally");
            ProgressEvent::error(ErrorReason::ExecutionFailed, message)
                .with_data("panic", json!(true))
        }
    };
    send_terminal(&tx, terminal).await;
}

async fn send_terminal(tx: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
    if tx.send(event).await.is_err() {
        tracing::debug!("caller disconnected before terminal event");
    }
}

fn failure_message(err: JoinError) -> String {
    if err.is_panic() {
        match err.into_panic().downcast::<String>() {
            Ok(message) => format!("command panicked: {message}"),
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => format!("command panicked: {message}"),
                Err(_) => "command panicked".to_string(),
            },
        }
    } else {
        "command task was aborted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_auth::{GroupSnapshot, GroupStore, PermissionRule};
    use relay_command::{ParamSchema, Params, Runnable};
    use relay_types::EventStatus;

    struct Quick;

    #[async_trait::async_trait]
    impl Runnable for Quick {
        async fn run(&self, _params: Params, ctx: &ExecContext) -> Result<Outcome, RunError> {
            ctx.progress("working", 0.5).await?;
            Ok(Outcome::new("done"))
        }
    }

    fn engine() -> ExecutionEngine {
        let store = Arc::new(GroupStore::from_snapshot(
            &GroupSnapshot::new().with_group("users", ["jane"]),
        ));
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandDef::new(
                "quick",
                "A quick command",
                ParamSchema::new(),
                PermissionRule::groups(["users"]),
                Arc::new(Quick),
            ))
            .expect("register");
        ExecutionEngine::new(Arc::new(registry), AuthEngine::new(store))
    }

    async fn collect(mut rx: mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn happy_path_streams_then_terminates() {
        let events = collect(
            engine().execute(ExecutionRequest::new("quick", "jane", json!({}))),
        )
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, EventStatus::Running);
        assert_eq!(events[1].status, EventStatus::Success);
        assert_eq!(events[1].progress, 1.0);
    }

    #[tokio::test]
    async fn list_is_authorization_filtered() {
        let engine = engine();
        assert_eq!(engine.list(&"jane".into()).len(), 1);
        assert!(engine.list(&"mallory".into()).is_empty());
    }

    #[tokio::test]
    async fn panic_payload_surfaces_in_failure_message() {
        let unit: JoinHandle<Result<Outcome, RunError>> =
            tokio::spawn(async { panic!("bad state") });
        let err = unit.await.expect_err("panicked");
        assert_eq!(failure_message(err), "command panicked: bad state");
    }
}
