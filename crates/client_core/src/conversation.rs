//! Append-only question/answer transcript with a single in-flight query.

use shared::{
    domain::{SourceCitation, Turn},
    protocol::ChatResponse,
};
use tracing::warn;

use crate::error::{ClientError, RequestKind};

/// Assistant reply recorded when a query fails for any reason.
pub const FALLBACK_ANSWER: &str = "Sorry, system error.";

/// Proof that a query was accepted; handed back to [`Conversation::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub question: String,
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    transcript: Vec<Turn>,
    draft: String,
    querying: bool,
}

impl Conversation {
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.transcript.last()
    }

    pub fn is_querying(&self) -> bool {
        self.querying
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the send affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.querying && !self.draft.trim().is_empty()
    }

    /// Accepts `question`: records the user turn, raises the in-flight flag
    /// and clears the draft.
    pub fn begin(&mut self, question: &str) -> Result<QueryTicket, ClientError> {
        if self.querying {
            return Err(ClientError::Busy(RequestKind::Query));
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::validation("question is empty"));
        }

        self.transcript.push(Turn::user(question));
        self.querying = true;
        self.draft.clear();
        Ok(QueryTicket {
            question: question.to_string(),
        })
    }

    pub fn submit_draft(&mut self) -> Result<QueryTicket, ClientError> {
        let draft = self.draft.clone();
        self.begin(&draft)
    }

    /// Records the assistant turn for `ticket` and lowers the in-flight flag.
    /// Returns the citation the viewer should open, if any.
    pub fn complete(
        &mut self,
        ticket: QueryTicket,
        outcome: Result<ChatResponse, ClientError>,
    ) -> Option<SourceCitation> {
        self.querying = false;
        match outcome {
            Ok(response) => {
                let first = response.sources.first().cloned();
                self.transcript
                    .push(Turn::assistant(response.answer, response.sources));
                first
            }
            Err(err) => {
                warn!(question = %ticket.question, "chat request failed: {err}");
                self.transcript
                    .push(Turn::assistant(FALLBACK_ANSWER, Vec::new()));
                None
            }
        }
    }

    /// Looks up a citation from an earlier assistant turn.
    pub fn citation(&self, turn_index: usize, citation_index: usize) -> Option<&SourceCitation> {
        self.transcript
            .get(turn_index)?
            .sources()
            .get(citation_index)
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
