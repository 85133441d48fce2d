use async_trait::async_trait;
use relay_auth::PermissionRule;
use relay_command::{
    CommandDef, ExecContext, FieldSpec, FieldType, Outcome, ParamSchema, Params, RunError,
    Runnable,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Pause between ticks when the caller does not supply `interval_ms`.
const DEFAULT_INTERVAL_MS: u64 = 100;

struct Countdown;

#[async_trait]
impl Runnable for Countdown {
    async fn run(&self, params: Params, ctx: &ExecContext) -> Result<Outcome, RunError> {
        let steps = params.i64("steps").unwrap_or_default();
        if steps < 1 {
            return Err(RunError::new("steps must be at least 1"));
        }
        let interval = Duration::from_millis(
            params
                .i64("interval_ms")
                .and_then(|ms| u64::try_from(ms).ok())
                .unwrap_or(DEFAULT_INTERVAL_MS),
        );

        for remaining in (1..=steps).rev() {
            let done = (steps - remaining) as f64 / steps as f64;
            let mut data = serde_json::Map::new();
            data.insert("remaining".to_string(), json!(remaining));
            ctx.progress_with_data(format!("{remaining} remaining"), done, data)
                .await?;
            tokio::time::sleep(interval).await;
            if ctx.is_cancelled() {
                return Err(RunError::new("countdown cancelled"));
            }
        }

        Ok(Outcome::new("countdown finished").with_data("steps", json!(steps)))
    }
}

/// The `countdown` builtin: ticks down from `steps`, emitting one
/// `running` event per tick. Exists to exercise long-lived streaming
/// paths (ordering, backpressure, cancellation, deadlines) end to end.
#[must_use]
pub fn countdown() -> CommandDef {
    CommandDef::new(
        "countdown",
        "Counts down from the given number of steps, one event per tick",
        ParamSchema::new()
            .field(
                FieldSpec::required("steps", FieldType::Integer)
                    .with_description("number of ticks, at least 1"),
            )
            .field(
                FieldSpec::optional("interval_ms", FieldType::Integer)
                    .with_description("pause between ticks in milliseconds"),
            ),
        PermissionRule::groups(["users"]),
        Arc::new(Countdown),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::EventStatus;
    use tokio::sync::mpsc;

    fn params(raw: serde_json::Value) -> Params {
        countdown().schema().validate(&raw).expect("valid")
    }

    #[tokio::test]
    async fn emits_one_event_per_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = ExecContext::new(tx);

        let outcome = Countdown
            .run(params(json!({"steps": 3, "interval_ms": 1})), &ctx)
            .await
            .expect("runs");
        drop(ctx);

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|ev| ev.status == EventStatus::Running));
        assert_eq!(events[0].data["remaining"], json!(3));
        assert_eq!(events[2].data["remaining"], json!(1));
        assert!(events[0].progress < events[2].progress);

        let (_, data) = outcome.into_parts();
        assert_eq!(data["steps"], json!(3));
    }

    #[tokio::test]
    async fn zero_steps_is_a_run_error() {
        let (tx, _rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);

        let err = Countdown
            .run(params(json!({"steps": 0})), &ctx)
            .await
            .expect_err("rejected");
        assert!(err.message().contains("at least 1"));
    }

    #[tokio::test]
    async fn stops_when_stream_closes() {
        let (tx, rx) = mpsc::channel(8);
        let ctx = ExecContext::new(tx);
        drop(rx);

        let err = Countdown
            .run(params(json!({"steps": 100, "interval_ms": 1})), &ctx)
            .await
            .expect_err("cancelled");
        assert!(err.message().contains("cancelled"));
    }

    #[test]
    fn schema_shape() {
        let def = countdown();
        assert!(def.schema().validate(&json!({"steps": 5})).is_ok());
        assert!(def.schema().validate(&json!({})).is_err());
        assert!(def
            .schema()
            .validate(&json!({"steps": 5, "interval_ms": "fast"}))
            .is_err());
    }
}
