//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: brand, connection indicator, language, status
//! - `Message`: one transcript entry
//! - `QuickReplyBar`: F1..F9 hints
//! - `Dialog`: modal confirmation / notice
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: multi-line input with placeholder
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Components receive external data as "props" (struct fields), never by
//! reaching into `App`. The event loop copies what they need each frame:
//!
//! ```rust,ignore
//! TitleBar::new(app.brand.clone(), app.connection.status(), ...).render(frame, area);
//! ```
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── quick_replies.rs
//! ├── dialog.rs
//! └── input_box/
//! ```

pub mod dialog;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod quick_replies;
mod title_bar;

pub use dialog::Dialog;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use quick_replies::QuickReplyBar;
pub use title_bar::TitleBar;
