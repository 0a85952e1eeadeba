//! Prompt templates for Vidra.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub qa: QaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for grounded question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub system: String,
    pub user: String,
    pub context_chunk: String,
    pub no_context_response: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful AI assistant that answers questions about YouTube videos based on their transcripts.

You will be provided with relevant excerpts from a video transcript, along with position markers.
Your task is to answer the user's question using ONLY the information provided in the context.

Guidelines:
- Base your answer strictly on the provided context
- Include the specific position markers (e.g. "Part 3") when referencing information
- If the context doesn't contain enough information to answer, say so honestly
- Be concise but complete
- Use natural language, as if explaining to a friend
- If multiple parts of the video discuss the topic, synthesize the information"#
                .to_string(),

            user: r#"Video: {{title}}
Channel: {{channel}}

Context from video:
{{context}}

Question: {{question}}

Answer the question based on the context above. Include the relevant position markers in your response."#
                .to_string(),

            context_chunk: "[{{position}}] {{text}}".to_string(),

            no_context_response: "I don't have enough information from the video to answer that question. The video might not cover that topic, or its text might be incomplete.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load QA prompts if file exists
            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
