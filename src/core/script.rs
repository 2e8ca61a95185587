//! # Scripted Content
//!
//! The opening transcript and the canned assistant answers. Nothing here is
//! generated: the assistant says one of two things depending on whether the
//! user typed or picked a quick reply.

use serde::{Deserialize, Serialize};

use crate::core::message::{Message, MessageId};

/// Shape of a canned assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplyTemplate {
    pub content: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub quick_replies: Vec<String>,
}

impl ReplyTemplate {
    /// Instantiate the template as a fresh assistant message.
    pub fn to_message(&self, id: MessageId) -> Message {
        let mut message =
            Message::assistant(id, self.content.clone()).with_quick_replies(self.quick_replies.clone());
        message.is_list = self.is_list;
        message
    }

    /// Answer given after the user types free text.
    pub fn typed_default() -> Self {
        Self {
            content: "That's a great question! I'd be happy to help you with that. \
                      Let me provide some personalized advice based on your needs."
                .to_string(),
            is_list: false,
            quick_replies: vec![
                "Tell me more".to_string(),
                "Show examples".to_string(),
                "Next steps".to_string(),
            ],
        }
    }

    /// Answer given after the user picks a quick reply.
    pub fn quick_reply_default() -> Self {
        Self {
            content: "Perfect! Here are some tips for that:\n\n\
                      • Focus on measurable achievements\n\
                      • Use action verbs\n\
                      • Keep it concise and relevant\n\
                      • Tailor to the job description"
                .to_string(),
            is_list: true,
            quick_replies: vec![
                "More tips".to_string(),
                "Review my draft".to_string(),
                "What's next?".to_string(),
            ],
        }
    }
}

/// Both canned answers, keyed by what triggered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedReplies {
    pub typed: ReplyTemplate,
    pub quick_reply: ReplyTemplate,
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self {
            typed: ReplyTemplate::typed_default(),
            quick_reply: ReplyTemplate::quick_reply_default(),
        }
    }
}

/// The three-message transcript every session starts with.
pub fn seed_transcript() -> Vec<Message> {
    vec![
        Message::assistant(
            MessageId(1),
            "Hi there! 👋 I'm your Diskarte.ai Career Assistant. I'm here to help you with \
             resume improvements, interview prep, job search, and career advice. \
             How can I assist you today?",
        )
        .with_quick_replies(["Improve Resume", "Practice Interview", "Find Jobs"]),
        Message::user(MessageId(2), "I need help with my resume"),
        Message::assistant(
            MessageId(3),
            "Great! I can help you improve your resume. Here are some key areas we can work on:\n\n\
             • Strengthen your professional summary\n\
             • Optimize your work experience descriptions\n\
             • Highlight relevant skills\n\
             • Format for ATS (Applicant Tracking Systems)\n\
             • Tailor it for specific job applications",
        )
        .as_list()
        .with_quick_replies(["Professional Summary", "Work Experience", "Skills Section"]),
    ]
}
