use async_trait::async_trait;
use relay_auth::PermissionRule;
use relay_command::{
    CommandDef, ExecContext, FieldSpec, FieldType, Outcome, ParamSchema, Params, RunError,
    Runnable,
};
use serde_json::json;
use std::sync::Arc;

struct Echo;

#[async_trait]
impl Runnable for Echo {
    async fn run(&self, params: Params, ctx: &ExecContext) -> Result<Outcome, RunError> {
        // "text" is required by the schema, so it is always present here.
        let text = params.str("text").unwrap_or_default().to_string();
        ctx.progress("echoing", 0.5).await?;
        Ok(Outcome::new("echoed").with_data("result", json!(text)))
    }
}

/// The `echo` builtin: returns its `text` parameter unchanged under the
/// `result` key. Open to the `users` group.
#[must_use]
pub fn echo() -> CommandDef {
    CommandDef::new(
        "echo",
        "Echoes the given text back to the caller",
        ParamSchema::new()
            .field(FieldSpec::required("text", FieldType::String).with_description("text to echo")),
        PermissionRule::groups(["users"]),
        Arc::new(Echo),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn echoes_text_under_result_key() {
        let (tx, mut rx) = mpsc::channel(4);
        let ctx = ExecContext::new(tx);
        let params = echo()
            .schema()
            .validate(&json!({"text": "hello"}))
            .expect("valid");

        let outcome = Echo.run(params, &ctx).await.expect("runs");
        let (_, data) = outcome.into_parts();
        assert_eq!(data["result"], json!("hello"));

        // One intermediate event, no terminal from the unit itself.
        assert!(rx.recv().await.is_some());
        drop(ctx);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn schema_requires_text() {
        let def = echo();
        assert!(def.schema().validate(&Value::Null).is_err());
        assert!(def.schema().validate(&json!({"text": 42})).is_err());
        assert!(def.schema().validate(&json!({"text": "ok"})).is_ok());
    }

    #[test]
    fn open_to_users_group() {
        assert!(echo().permission().names_group("users"));
    }
}
