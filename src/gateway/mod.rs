pub mod client;
pub mod http;
pub mod types;

pub use client::{ChatGateway, GatewayError};
pub use http::HttpGateway;
pub use types::{
    ChatContext, ChatReply, ChatRequest, ConversationStats, Language, MessageEntry, Sender,
};
