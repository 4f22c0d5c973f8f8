//! Lesson record extraction from teaching notes

use mustakhrij_core::error::Result;
use mustakhrij_core::recover::recover_json;
use mustakhrij_core::schema::ExtractionSchema;
use mustakhrij_core::validate::validate;
use mustakhrij_core::validate::ValidationReport;
use mustakhrij_llm::CompletionParams;
use mustakhrij_llm::LLMClient;
use mustakhrij_llm::Message;
use tracing::info;
use tracing::warn;

use crate::models::LessonSystemContext;
use crate::models::SubjectContext;
use crate::PromptEngine;

/// Extract lesson records from the subject text.
///
/// Renders the extraction prompt, makes one JSON-mode model call, recovers
/// the JSON from the reply and validates it against the schema. The
/// subject text is truncated to the prompt character budget before it is
/// embedded.
///
/// # Errors
///
/// Fails on transport errors, on replies with no parseable JSON, and on
/// parsed replies with no record-shaped payload. Incomplete records are
/// not errors; they come back sentinel-filled in the report.
pub async fn extract_lessons(
    engine: &PromptEngine,
    client: &dyn LLMClient,
    schema: &ExtractionSchema,
    subject_text: &str,
) -> Result<ValidationReport> {
    info!(schema = %schema.name, "extracting records from notes");

    let system = engine.lesson_system(&LessonSystemContext::new(schema))?;
    let user = engine.subject_user(&SubjectContext::new(subject_text))?;

    let messages = vec![Message::system(system), Message::user(user)];
    let params = CompletionParams {
        max_tokens: Some(4000),
        temperature: Some(0.1),
        ..Default::default()
    };

    let reply = client.complete_json(&messages, &params).await?;
    let value = recover_json(&reply)?;
    let report = validate(&value, schema)?;

    info!(
        records = report.records.len(),
        incomplete = report.incomplete,
        "extraction finished"
    );
    if report.invalid > 0 {
        warn!(
            invalid = report.invalid,
            first = report.first_invalid.as_deref().unwrap_or(""),
            "reply carried non-record candidates"
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedClient {
        reply: String,
    }

    #[async_trait]
    impl LLMClient for CannedClient {
        async fn complete(&self, _: &[Message], _: &CompletionParams) -> Result<String> {
            Ok(self.reply.clone())
        }

        async fn complete_streaming(
            &self,
            _: &[Message],
            _: &CompletionParams,
            on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
        ) -> Result<String> {
            on_delta(&self.reply);
            Ok(self.reply.clone())
        }

        async fn complete_json(&self, _: &[Message], _: &CompletionParams) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_fenced_wrapped_reply_end_to_end() {
        let engine = PromptEngine::new().unwrap();
        let schema = ExtractionSchema::lesson();
        let client = CannedClient {
            reply: "```json\n{\"lessons\":[{\"النشاط\":\"رياضيات\",\"الموضوع\":\"الجمع\"}]}\n```"
                .to_string(),
        };

        let report = extract_lessons(&engine, &client, &schema, "النشاط: رياضيات الموضوع: الجمع")
            .await
            .unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.text("النشاط"), "رياضيات");
        assert_eq!(record.text("الموضوع"), "الجمع");
        // the two fields the model skipped carry the sentinel
        assert_eq!(record.text("الكفاءة_القاعدية"), "غير مذكور");
        assert_eq!(record.text("مؤشر_الكفاءة"), "غير مذكور");
    }

    #[tokio::test]
    async fn test_proseful_reply_is_extraction_failure() {
        let engine = PromptEngine::new().unwrap();
        let schema = ExtractionSchema::lesson();
        let client = CannedClient {
            reply: "عذراً، لا أستطيع إيجاد أي دروس في هذا النص.".to_string(),
        };

        let err = extract_lessons(&engine, &client, &schema, "نص فارغ")
            .await
            .unwrap_err();
        assert!(err.is_extraction_failed());
        assert!(err.raw_reply().unwrap().contains("عذراً"));
    }

    #[test]
    fn test_prompt_states_fields_and_sentinel() {
        let engine = PromptEngine::new().unwrap();
        let schema = ExtractionSchema::lesson();
        let system = engine
            .lesson_system(&LessonSystemContext::new(&schema))
            .unwrap();
        assert!(system.contains("النشاط"));
        assert!(system.contains("مؤشر_الكفاءة"));
        assert!(system.contains("غير مذكور"));
        assert!(system.contains("lessons"));
    }
}
