use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use taskops_chat::domain::repository::{Mailer, ParticipantStore, UserDirectory};
use taskops_chat::domain::types::ParticipantRole;
use taskops_chat::error::ChatServiceError;
use taskops_chat::usecase::chat::{JoinChatInput, PostMessageInput};

// ── MockParticipantStore ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockParticipantStore {
    completed: Arc<Mutex<HashSet<i64>>>,
    participants: HashSet<(i64, i64, ParticipantRole)>,
    fail: bool,
}

impl MockParticipantStore {
    pub fn new() -> Self {
        Self {
            completed: Arc::new(Mutex::new(HashSet::new())),
            participants: HashSet::new(),
            fail: false,
        }
    }

    /// Store whose every lookup errors, for fail-closed assertions.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_participant(mut self, request_id: i64, user_id: i64, role: ParticipantRole) -> Self {
        self.participants.insert((request_id, user_id, role));
        self
    }

    /// Handle for flipping a request to completed mid-test.
    pub fn completed_handle(&self) -> Arc<Mutex<HashSet<i64>>> {
        Arc::clone(&self.completed)
    }
}

impl ParticipantStore for MockParticipantStore {
    async fn is_request_completed(&self, request_id: i64) -> Result<bool, ChatServiceError> {
        if self.fail {
            return Err(ChatServiceError::Internal(anyhow::anyhow!("store down")));
        }
        Ok(self.completed.lock().unwrap().contains(&request_id))
    }

    async fn is_participant(
        &self,
        request_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<bool, ChatServiceError> {
        if self.fail {
            return Err(ChatServiceError::Internal(anyhow::anyhow!("store down")));
        }
        Ok(self.participants.contains(&(request_id, user_id, role)))
    }
}

// ── MockUserDirectory ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserDirectory {
    existing_emails: HashSet<String>,
    assignment_emails: HashMap<i64, String>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str) -> Self {
        self.existing_emails.insert(email.to_owned());
        self
    }

    pub fn with_assignment_email(mut self, assignment_id: i64, email: &str) -> Self {
        self.assignment_emails.insert(assignment_id, email.to_owned());
        self
    }
}

impl UserDirectory for MockUserDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, ChatServiceError> {
        Ok(self.existing_emails.contains(email))
    }

    async fn customer_email_for_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<String>, ChatServiceError> {
        Ok(self.assignment_emails.get(&assignment_id).cloned())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Clone)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Shared handle to the outbox for post-execution inspection.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<SentMail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ChatServiceError> {
        if self.fail {
            return Err(ChatServiceError::Internal(anyhow::anyhow!(
                "mail provider unavailable"
            )));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            html: html.to_owned(),
        });
        Ok(())
    }
}

/// Pull the OTP code out of a captured email body (the `<h2>` block).
pub fn code_from_email(html: &str) -> String {
    let digits: String = html.chars().filter(|c| c.is_ascii_digit()).collect();
    // The body mentions the expiry in minutes too, so take the 6-digit run.
    html.split("</h2>")
        .next()
        .and_then(|head| head.rsplit('>').next())
        .map(|s| s.trim().to_owned())
        .unwrap_or(digits)
}

// ── Frame builders ───────────────────────────────────────────────────────────

pub fn join_input(request_id: i64, user_id: i64, user_type: &str, name: &str) -> JoinChatInput {
    JoinChatInput {
        request_id: Some(request_id),
        user_id: Some(user_id),
        user_type: Some(user_type.to_owned()),
        name: Some(name.to_owned()),
    }
}

pub fn message_input(
    request_id: i64,
    text: &str,
    user_id: i64,
    user_type: &str,
    name: &str,
) -> PostMessageInput {
    PostMessageInput {
        request_id: Some(request_id),
        text: Some(text.to_owned()),
        user_id: Some(user_id),
        user_type: Some(user_type.to_owned()),
        name: Some(name.to_owned()),
        ts: None,
    }
}
