//! # TUI Components
//!
//! All UI pieces of the chat screen.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as fields:
//! - `TitleBar`: Header with brand, screen name and status
//! - `MessageBubble`: One message, drawn from a `MessageView`
//! - `TypingIndicator`: Three-dot bubble shown while a reply is pending
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Single-line text field with a send button
//! - `MessageList`: Scrollable transcript with layout caching and chip hit testing
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props (struct fields), never by
//! reaching into the `Conversation` directly.
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(status, has_unseen);
//! title_bar.render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs               (this file)
//! ├── title_bar.rs         (Header line)
//! ├── message.rs           (MessageView, layout, MessageBubble)
//! ├── message_list.rs      (Scrollable message container)
//! ├── typing_indicator.rs  (Composing indicator)
//! └── input_box/           (Text field + send button)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState, ReplyTarget};
pub mod typing_indicator;
pub use typing_indicator::TypingIndicator;
