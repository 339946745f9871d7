//! Courier engine: transport adapter, caption pipeline and the forwarding
//! run loop.
mod caption;
mod filter;
mod markup;
mod runner;
mod transport;
mod types;

pub use caption::{format_file_size, CaptionPipeline};
pub use filter::{FilterVerdict, MessageFilter};
pub use markup::{parse_buttons, InlineKeyboard, InlineKeyboardButton};
pub use runner::{run_forward_job, ChannelEventSink, EventSink, RunnerConfig};
pub use transport::{is_channel_admin, BotApi, TelegramBotApi, DEFAULT_BASE_URL};
pub use types::{ApiError, BotIdentity, ChatMemberStatus, CopyOutcome, MessageMeta, StartError};
