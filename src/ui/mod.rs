//! Front-end logic for the chat UI, independent of any rendering toolkit.

mod citations;
mod client;
mod conversation;
mod message;

pub use citations::{tokenize_citations, Segment};
pub use client::{ChatClient, ClientError, HttpChatClient};
pub use conversation::{
    should_submit_on_key, Conversation, Notification, WELCOME_DESCRIPTION, WELCOME_TITLE,
};
pub use message::{render_message, Alignment, Message, Role, SourceDetail, SourceDialog};
