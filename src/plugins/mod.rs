//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding a variant to [`Command`] and an arm to [`execute`]

pub mod ban;
pub mod mute;
pub mod report;
pub mod rules;
pub mod settings;
pub mod start;
pub mod verify;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::bot::dispatcher::AppState;
use crate::database::FilterKind;
use crate::events::security_gate;
use crate::gateway::best_effort;
use crate::moderation::ChatMessage;

pub const NOT_ADMIN: &str = "Only administrators can use this command.";
pub const GROUP_ONLY: &str = "This command can only be used in groups.";

/// All bot commands.
///
/// Every command except `/help` takes the rest of the line as its argument,
/// so trailing text never turns a command into a plain message.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "about this bot")]
    Start(String),

    #[command(description = "show this list")]
    Help,

    // Onboarding
    #[command(description = "set the captcha welcome template")]
    Setwelcome(String),

    #[command(description = "set the chat rules")]
    Setrules(String),

    #[command(description = "show the chat rules")]
    Rules(String),

    // Moderation
    #[command(description = "mute the replied user for N seconds")]
    Mute(String),

    #[command(description = "unmute the replied user")]
    Unmute(String),

    #[command(description = "ban the replied user")]
    Ban(String),

    #[command(description = "unban the replied user")]
    Unban(String),

    #[command(description = "mark the replied user (or yourself) as verified")]
    Verify(String),

    #[command(description = "show warnings of the replied user (or yourself)")]
    Warns(String),

    #[command(description = "report the replied message to the administrators")]
    Report(String),

    // Filters
    #[command(description = "delete links: on/off")]
    Deletelinks(String),

    #[command(description = "delete forwarded messages: on/off")]
    Deleteforwards(String),

    #[command(description = "delete files: on/off")]
    Deletefiles(String),

    #[command(description = "post moderation actions to a channel")]
    Setlogchannel(String),
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    teloxide::filter_command::<Command, _>().endpoint(handle_command)
}

async fn handle_command(msg: Message, cmd: Command, state: AppState) -> anyhow::Result<()> {
    let Some(message) = ChatMessage::from_telegram(&msg) else {
        return Ok(());
    };
    debug!("Command {:?} from {} in chat {}", cmd, message.sender.id, message.chat_id);
    execute(&state, &message, cmd).await
}

/// Run a parsed command. Banned and muted senders are stopped first.
pub async fn execute(state: &AppState, msg: &ChatMessage, cmd: Command) -> anyhow::Result<()> {
    if let Some(verdict) = security_gate(state, msg).await? {
        debug!("Command {:?} from {} dropped: {:?}", cmd, msg.sender.id, verdict);
        return Ok(());
    }

    match cmd {
        Command::Start(_) => start::start_command(state, msg).await,
        Command::Help => start::help_command(state, msg).await,
        Command::Setwelcome(args) => welcome::setwelcome_command(state, msg, &args).await,
        Command::Setrules(args) => rules::setrules_command(state, msg, &args).await,
        Command::Rules(_) => rules::rules_command(state, msg).await,
        Command::Mute(args) => mute::mute_command(state, msg, &args).await,
        Command::Unmute(_) => mute::unmute_command(state, msg).await,
        Command::Ban(_) => ban::ban_command(state, msg).await,
        Command::Unban(_) => ban::unban_command(state, msg).await,
        Command::Verify(_) => verify::verify_command(state, msg).await,
        Command::Warns(_) => verify::warns_command(state, msg).await,
        Command::Report(_) => report::report_command(state, msg).await,
        Command::Deletelinks(args) => settings::filter_command(state, msg, FilterKind::Links, &args).await,
        Command::Deleteforwards(args) => {
            settings::filter_command(state, msg, FilterKind::Forwards, &args).await
        }
        Command::Deletefiles(args) => settings::filter_command(state, msg, FilterKind::Files, &args).await,
        Command::Setlogchannel(args) => settings::setlogchannel_command(state, msg, &args).await,
    }
}

/// Reply to the command message, best-effort.
pub(crate) async fn reply(state: &AppState, msg: &ChatMessage, text: &str) {
    best_effort(
        state.gateway.reply_to(msg.chat_id, msg.message_id, text).await,
        "reply to command",
    );
}

/// Gate for moderation commands: group chats and chat administrators only.
/// Replies with the reason and returns `false` when the caller may not
/// proceed.
pub(crate) async fn require_admin(state: &AppState, msg: &ChatMessage) -> bool {
    if !msg.is_group {
        reply(state, msg, GROUP_ONLY).await;
        return false;
    }
    if !state.permissions.is_admin(msg.chat_id, msg.sender.id).await {
        reply(state, msg, NOT_ADMIN).await;
        return false;
    }
    true
}
