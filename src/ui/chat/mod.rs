//! Chat panel components.

mod header;
mod input_area;
mod message_list;
mod shell;

pub use header::{ChatHeader, phase_label};
pub use input_area::ChatInputArea;
pub use message_list::{ChatMessageList, MessageItems};
pub use shell::ChatShell;
