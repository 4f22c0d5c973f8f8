//! Structured movie critiques, single and comparison mode

use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use mustakhrij_core::recover::recover_json;
use mustakhrij_core::schema::ExtractionSchema;
use mustakhrij_core::validate::validate;
use mustakhrij_core::validate::validate_comparison;
use mustakhrij_core::validate::ComparisonReport;
use mustakhrij_core::validate::ValidationReport;
use mustakhrij_llm::CompletionParams;
use mustakhrij_llm::LLMClient;
use mustakhrij_llm::Message;
use tracing::info;

use crate::models::ComparisonUserContext;
use crate::models::MovieUserContext;
use crate::models::SentinelContext;
use crate::PromptEngine;

/// Wrapper key the comparison prompt requests for the per-film records
pub const MOVIES_KEY: &str = "movies";
/// Wrapper key the comparison prompt requests for the summary record
pub const COMPARISON_KEY: &str = "comparison";

/// Comparison mode takes between two and five films
pub const COMPARISON_SUBJECTS: std::ops::RangeInclusive<usize> = 2..=5;

/// Produce one structured critique record for a single film.
///
/// # Errors
///
/// Fails on transport errors, unparseable replies and replies with no
/// record-shaped payload.
pub async fn extract_movie_report(
    engine: &PromptEngine,
    client: &dyn LLMClient,
    schema: &ExtractionSchema,
    title: &str,
) -> Result<ValidationReport> {
    info!(title = %title, "requesting movie report");

    let system = engine.movie_system(&SentinelContext::new(schema))?;
    let user = engine.movie_user(&MovieUserContext {
        title: title.to_string(),
    })?;

    let messages = vec![Message::system(system), Message::user(user)];
    let params = CompletionParams {
        max_tokens: Some(1200),
        temperature: Some(0.7),
        ..Default::default()
    };

    let reply = client.complete_json(&messages, &params).await?;
    let value = recover_json(&reply)?;
    validate(&value, schema)
}

/// Produce per-film critique records plus one comparison summary.
///
/// # Errors
///
/// Fails when the title count is outside [`COMPARISON_SUBJECTS`], and on
/// the same transport/extraction failures as a single report. A film
/// record that fails validation never discards its neighbours; a missing
/// summary is reported as `None`, not an error.
pub async fn extract_movie_comparison(
    engine: &PromptEngine,
    client: &dyn LLMClient,
    subject_schema: &ExtractionSchema,
    summary_schema: &ExtractionSchema,
    titles: &[String],
) -> Result<ComparisonReport> {
    if !COMPARISON_SUBJECTS.contains(&titles.len()) {
        return Err(Error::configuration(format!(
            "comparison mode takes {} to {} films, got {}",
            COMPARISON_SUBJECTS.start(),
            COMPARISON_SUBJECTS.end(),
            titles.len()
        )));
    }

    info!(count = titles.len(), "requesting movie comparison");

    let system = engine.comparison_system(&SentinelContext::new(subject_schema))?;
    let user = engine.comparison_user(&ComparisonUserContext {
        titles: titles.to_vec(),
    })?;

    let messages = vec![Message::system(system), Message::user(user)];
    let params = CompletionParams {
        max_tokens: Some(3000),
        temperature: Some(0.7),
        ..Default::default()
    };

    let reply = client.complete_json(&messages, &params).await?;
    let value = recover_json(&reply)?;
    validate_comparison(
        &value,
        subject_schema,
        summary_schema,
        MOVIES_KEY,
        COMPARISON_KEY,
    )
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

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_single_report() {
        let engine = PromptEngine::new().unwrap();
        let schema = ExtractionSchema::movie();
        let client = CannedClient {
            reply: r#"{"title":"Ran","year":1985,"director":"Akira Kurosawa",
                       "genres":["drama","war"],"review":"Vast and merciless.","score":9.4}"#
                .to_string(),
        };

        let report = extract_movie_report(&engine, &client, &schema, "Ran")
            .await
            .unwrap();
        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].is_complete());
        assert_eq!(report.records[0].text("director"), "Akira Kurosawa");
    }

    #[tokio::test]
    async fn test_comparison_partial_second_record_keeps_first() {
        let engine = PromptEngine::new().unwrap();
        let subject = ExtractionSchema::movie();
        let summary = ExtractionSchema::movie_comparison();
        let client = CannedClient {
            reply: r#"{"movies":[
                {"title":"Ran","year":1985,"director":"Akira Kurosawa",
                 "genres":["drama"],"review":"Vast.","score":9.4},
                {"title":"Kagemusha"}
            ],"comparison":{"winner":"Ran","rationale":"Wider scope."}}"#
                .to_string(),
        };

        let report = extract_movie_comparison(
            &engine,
            &client,
            &subject,
            &summary,
            &titles(&["Ran", "Kagemusha"]),
        )
        .await
        .unwrap();

        assert_eq!(report.subjects.records.len(), 2);
        assert!(report.subjects.records[0].is_complete());
        assert!(!report.subjects.records[1].is_complete());
        assert_eq!(report.summary.as_ref().unwrap().text("winner"), "Ran");
    }

    #[tokio::test]
    async fn test_comparison_rejects_bad_subject_count() {
        let engine = PromptEngine::new().unwrap();
        let subject = ExtractionSchema::movie();
        let summary = ExtractionSchema::movie_comparison();
        let client = CannedClient {
            reply: "{}".to_string(),
        };

        for names in [vec!["Ran"], vec!["a", "b", "c", "d", "e", "f"]] {
            let err = extract_movie_comparison(&engine, &client, &subject, &summary, &titles(&names))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
        }
    }

    #[test]
    fn test_comparison_prompt_declares_wrapper() {
        let engine = PromptEngine::new().unwrap();
        let schema = ExtractionSchema::movie();
        let system = engine
            .comparison_system(&SentinelContext::new(&schema))
            .unwrap();
        assert!(system.contains("\"movies\""));
        assert!(system.contains("\"comparison\""));
        assert!(system.contains("not a bare list"));
    }
}
