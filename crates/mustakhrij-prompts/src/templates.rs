//! Prompt templates for the supported extraction tasks

/// System instruction for extracting lesson records from teaching notes
pub const LESSON_SYSTEM_TEMPLATE: &str = r#"
أنت مساعد تربوي خبير في تحليل المذكرات التربوية الجزائرية.
استخرج البيانات التالية لكل نشاط/درس تجده في النص:
{{#each fields}}
- "{{this}}"
{{/each}}

القواعد:
- المخرج يجب أن يكون JSON صالحاً فقط: كائن يحمل قائمة من الكائنات تحت المفتاح "lessons".
- إذا كانت المعلومة مفقودة اكتب "{{sentinel}}".
- لا تضف أي شرح ولا أسوار كود، فقط الـ JSON.
"#;

/// User message embedding the (already truncated) subject text
pub const SUBJECT_USER_TEMPLATE: &str = r#"استخرج البيانات من هذا النص:
{{subject}}"#;

/// System instruction for a single structured movie critique
pub const MOVIE_SYSTEM_TEMPLATE: &str = r#"
You are a seasoned film critic. Write a structured report for the film the
user names.

Return a JSON object with exactly this structure:
{
  "title": "canonical film title",
  "year": 1985,
  "director": "director name",
  "genres": ["genre", "genre"],
  "review": "four to six sentences of critique",
  "score": 8.5
}

Rules:
- Output JSON only: no prose, no code fences.
- If a detail is unknown, write "{{sentinel}}".
"#;

/// User message for a single movie report
pub const MOVIE_USER_TEMPLATE: &str = r#"Write the structured report for "{{title}}"."#;

/// System instruction for comparison mode. The wrapper shape is declared
/// explicitly so the model does not fall back to a bare list.
pub const COMPARISON_SYSTEM_TEMPLATE: &str = r#"
You are a seasoned film critic. Write one structured report per film the
user names, then compare them.

Return a JSON object with exactly this wrapper structure — not a bare list:
{
  "movies": [
    {
      "title": "canonical film title",
      "year": 1985,
      "director": "director name",
      "genres": ["genre", "genre"],
      "review": "four to six sentences of critique",
      "score": 8.5
    }
  ],
  "comparison": {
    "winner": "title of the stronger film",
    "rationale": "two to four sentences explaining the verdict"
  }
}

Rules:
- "movies" holds one record per film, in the order the user listed them.
- "comparison" holds exactly one summary object.
- Output JSON only: no prose, no code fences.
- If a detail is unknown, write "{{sentinel}}".
"#;

/// User message for comparison mode
pub const COMPARISON_USER_TEMPLATE: &str = r#"Compare the following films:
{{#each titles}}
- "{{this}}"
{{/each}}"#;
