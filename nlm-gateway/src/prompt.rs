//! Conversation modes and system prompt compilation.
//!
//! A mode is a named behavioral profile that selects which addendum is
//! appended to the fixed base instruction. Compilation is a pure function
//! over the closed mode set; anything unrecognized falls back to `General`.

use serde::{Deserialize, Serialize};

/// Behavioral profile for a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unrestricted general-knowledge answering
    General,
    /// CS/software-engineering academic focus
    Mca,
    /// Formal tone for interview preparation
    Interview,
    /// Code explanation and review
    Code,
}

impl Mode {
    /// Parse a mode token, case-insensitively. Unknown tokens map to
    /// `General`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mca" => Self::Mca,
            "interview" => Self::Interview,
            "code" => Self::Code,
            _ => Self::General,
        }
    }

    /// String representation for logging and the transcript sink.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Mca => "mca",
            Self::Interview => "interview",
            Self::Code => "code",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed base instruction shared by every mode.
const BASE_PROMPT: &str = "You are NLM Chatbot, a helpful assistant that can answer questions on any topic, \
with extra skill in MCA-related subjects. \
Always answer the user's latest message in the context of the full conversation. \
Start every reply with 1-2 sentences that directly answer the question. \
Then, if useful, add at most 2-3 short supporting sentences or bullet points. \
Answer directly without long introductions, self-descriptions, or disclaimers. \
Use clear, simple English and usually keep answers to 3-5 concise sentences, \
unless the user explicitly asks for a very detailed explanation of the topic. \
If you are not sure about a factual detail, say you are uncertain instead of guessing. \
Refuse harmful or illegal requests politely and suggest safer alternatives. \
Do not give medical, legal, or financial advice; instead suggest consulting a qualified professional. \
You do not have real-time internet or current date access; never pretend you browsed the web. ";

const MCA_EXTRA: &str = "Focus mainly on MCA-related topics: programming, algorithms, data structures, \
databases, operating systems, networking, software engineering, and exam preparation. \
Use simple examples a college student in India would understand. ";

const INTERVIEW_EXTRA: &str = "Answer in a slightly formal tone, suitable for technical or HR interview preparation. \
When appropriate, end with one short sentence suggesting how the user might phrase this \
answer in an interview. ";

const CODE_EXTRA: &str = "Assume the user may paste code. Explain clearly what the code does, point out bugs, \
and suggest improvements. When showing corrected code, use a single fenced code block \
and then one short explanatory sentence. ";

const GENERAL_EXTRA: &str = "You may also answer general knowledge, reasoning, or everyday questions clearly and briefly. ";

/// Compile the system instruction for a mode.
pub fn system_prompt(mode: Mode) -> String {
    let extra = match mode {
        Mode::Mca => MCA_EXTRA,
        Mode::Interview => INTERVIEW_EXTRA,
        Mode::Code => CODE_EXTRA,
        Mode::General => GENERAL_EXTRA,
    };

    format!("{BASE_PROMPT}{extra}")
}
