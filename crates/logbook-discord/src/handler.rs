use std::sync::Arc;

use chrono::Utc;
use serenity::async_trait;
use serenity::builder::EditMember;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::{Context, EventHandler};
use tracing::{info, warn};

use logbook_duty::policy;

use crate::commands::{self, Command};
use crate::context::AppContext;
use crate::format;
use crate::roles;
use crate::send;

/// Serenity event handler: parses text commands, applies the channel and
/// role gates, and drives the duty ledger.
///
/// Per the error-handling contract, a command that fails a gate (wrong
/// channel, missing role) or does not parse gets no reply at all; ledger
/// failures reply with short failure text.
pub struct LogbookHandler {
    pub app: Arc<AppContext>,
}

#[async_trait]
impl EventHandler for LogbookHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(name = %ready.user.name, "Discord bot connected");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(cmd) = commands::parse(&self.app.config.command_prefix, &msg.content) else {
            return;
        };

        for reply in self.dispatch(&ctx, &msg, cmd).await {
            if let Err(e) = send::send_text(&ctx.http, msg.channel_id, &reply).await {
                warn!(channel_id = msg.channel_id.get(), error = %e, "reply send failed");
            }
        }
    }
}

impl LogbookHandler {
    /// Run one command to completion, returning the replies to send.
    /// An empty vec means silence (failed gate or ignored input).
    async fn dispatch(&self, ctx: &Context, msg: &Message, cmd: Command) -> Vec<String> {
        let cfg = &self.app.config;
        let tz = self.app.tz;
        let channel = msg.channel_id.get();
        let user_id = msg.author.id.get();
        let now = Utc::now();

        // Role names are only needed for gated commands; skip the lookup
        // for the plain logbook/general ones.
        let author_roles = if needs_roles(&cmd) {
            roles::author_role_names(ctx, msg).await
        } else {
            Vec::new()
        };
        let can_override =
            policy::can_override(&author_roles, &cfg.admin_role, &cfg.higherups_role);
        let is_admin = policy::is_admin(&author_roles, &cfg.admin_role);

        match cmd {
            Command::Help => vec![format::help_text(&cfg.command_prefix)],

            Command::Id => vec![format!("`{}`", user_id)],

            Command::SetNickname(name) => self.set_nickname(ctx, msg, &name).await,

            Command::Status => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) {
                    return Vec::new();
                }
                let (open_minutes, week_total) = {
                    let ledger = self.app.ledger();
                    let open = ledger
                        .session(user_id)
                        .map(|s| (now - s.start).num_minutes());
                    (open, ledger.weekly_minutes(user_id, now))
                };
                vec![format::status_reply(open_minutes, week_total)]
            }

            Command::ClockIn => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) {
                    return Vec::new();
                }
                let result = self.app.ledger().clock_in(user_id, now);
                match result {
                    Ok(()) => {
                        let name = author_display_name(msg);
                        vec![format::clock_in_reply(&name, now, tz)]
                    }
                    Err(_) => vec![format::code_block("Already clocked in")],
                }
            }

            Command::ClockOut => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) {
                    return Vec::new();
                }
                let result = self.app.ledger().clock_out(user_id, now);
                match result {
                    Ok(record) => {
                        let name = author_display_name(msg);
                        vec![format::clock_out_reply(&name, &record)]
                    }
                    Err(_) => vec![format::code_block("Not clocked in")],
                }
            }

            Command::OverrideUsage => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) || !can_override {
                    return Vec::new();
                }
                vec![format::override_usage(&cfg.command_prefix)]
            }

            Command::OverrideClockIn(target) => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) || !can_override {
                    return Vec::new();
                }
                let Some(guild_id) = msg.guild_id else {
                    return Vec::new();
                };
                let target_name = roles::display_name_or_mention(ctx, guild_id, target).await;
                self.app.ledger().force_clock_in(target, now);
                let actor = author_display_name(msg);
                vec![format::force_clock_in_reply(&target_name, &actor, now, tz)]
            }

            Command::OverrideClockOut(target) => {
                if !policy::channel_allowed(channel, cfg.logbook_channel_id) || !can_override {
                    return Vec::new();
                }
                let Some(guild_id) = msg.guild_id else {
                    return Vec::new();
                };
                let result = self.app.ledger().force_clock_out(target, now);
                match result {
                    Ok(record) => {
                        let target_name =
                            roles::display_name_or_mention(ctx, guild_id, target).await;
                        let actor = author_display_name(msg);
                        vec![format::force_clock_out_reply(&target_name, &actor, &record)]
                    }
                    Err(_) => vec![format::code_block("User not clocked in")],
                }
            }

            Command::Report => {
                if !policy::channel_allowed(channel, cfg.reports_channel_id) || !is_admin {
                    return Vec::new();
                }
                let Some(guild_id) = msg.guild_id else {
                    return Vec::new();
                };
                let report = self.app.ledger().weekly_report(now);
                if report.is_empty() {
                    return vec![format::code_block("No duties or reports")];
                }
                // One message per user, matching the reporting format.
                let mut replies = Vec::with_capacity(report.len());
                for (uid, records) in report {
                    let name = roles::display_name_or_mention(ctx, guild_id, uid).await;
                    replies.push(format::report_block(&name, uid, &records, tz));
                }
                replies
            }

            Command::SingleReport(target) => {
                if !policy::channel_allowed(channel, cfg.reports_channel_id) || !can_override {
                    return Vec::new();
                }
                let Some(guild_id) = msg.guild_id else {
                    return Vec::new();
                };
                let records = self.app.ledger().single_history(target).to_vec();
                if records.is_empty() {
                    return vec![format::code_block("No duties found")];
                }
                let name = roles::display_name_or_mention(ctx, guild_id, target).await;
                vec![format::single_report_block(&name, target, &records, tz)]
            }

            Command::Void { user_id, duty_id } => {
                if !policy::channel_allowed(channel, cfg.reports_channel_id) || !can_override {
                    return Vec::new();
                }
                let outcome = {
                    let mut ledger = self.app.ledger();
                    if ledger.single_history(user_id).is_empty() {
                        None
                    } else {
                        Some(ledger.void_duty(user_id, &duty_id))
                    }
                };
                match outcome {
                    None => vec![format::code_block("User has no duties")],
                    Some(Ok(())) => vec![format::code_block("Duty voided")],
                    Some(Err(_)) => vec![format::code_block("Duty ID not found")],
                }
            }

            Command::Admin => {
                if !policy::channel_allowed(channel, cfg.admin_channel_id) || !is_admin {
                    return Vec::new();
                }
                let Some(guild_id) = msg.guild_id else {
                    return Vec::new();
                };
                let names = roles::members_with_role(ctx, guild_id, &cfg.admin_role).await;
                vec![format::admin_list_reply(&names)]
            }

            Command::AddAdmin(target) => {
                if !policy::channel_allowed(channel, cfg.admin_channel_id) || !is_admin {
                    return Vec::new();
                }
                self.edit_admin_role(ctx, msg, target, true).await
            }

            Command::RemoveAdmin(target) => {
                if !policy::channel_allowed(channel, cfg.admin_channel_id) || !is_admin {
                    return Vec::new();
                }
                self.edit_admin_role(ctx, msg, target, false).await
            }

            Command::EmployeeDelete(target) => {
                if !policy::channel_allowed(channel, cfg.admin_channel_id) || !is_admin {
                    return Vec::new();
                }
                self.app.ledger().delete_user(target);
                vec![format::code_block(&format!("Employee {} removed", target))]
            }
        }
    }

    async fn set_nickname(&self, ctx: &Context, msg: &Message, name: &str) -> Vec<String> {
        let Some(guild_id) = msg.guild_id else {
            return Vec::new();
        };
        let edit = EditMember::new().nickname(name);
        match guild_id.edit_member(&ctx.http, msg.author.id, edit).await {
            Ok(_) => vec![format::code_block(&format!("Nickname set to {}", name))],
            Err(e) => {
                warn!(user_id = msg.author.id.get(), error = %e, "nickname edit failed");
                vec![format::code_block("Bot lacks permission to change nicknames")]
            }
        }
    }

    /// Grant or revoke the configured admin role on a member.
    /// Lookup failures are logged and produce no reply.
    async fn edit_admin_role(
        &self,
        ctx: &Context,
        msg: &Message,
        target: u64,
        grant: bool,
    ) -> Vec<String> {
        let Some(guild_id) = msg.guild_id else {
            return Vec::new();
        };
        let cfg = &self.app.config;

        let role_id = match roles::role_id_by_name(ctx, guild_id, &cfg.admin_role).await {
            Ok(id) => id,
            Err(e) => {
                warn!(role = %cfg.admin_role, error = %e, "admin role lookup failed");
                return Vec::new();
            }
        };
        let member = match roles::get_member(
            ctx,
            guild_id,
            serenity::model::id::UserId::new(target),
        )
        .await
        {
            Ok(m) => m,
            Err(e) => {
                warn!(user_id = target, error = %e, "member lookup failed");
                return Vec::new();
            }
        };

        let result = if grant {
            member.add_role(&ctx.http, role_id).await
        } else {
            member.remove_role(&ctx.http, role_id).await
        };
        match result {
            Ok(()) => {
                let verb = if grant { "Added" } else { "Removed" };
                let preposition = if grant { "to" } else { "from" };
                vec![format::code_block(&format!(
                    "{} admin role {} {}",
                    verb,
                    preposition,
                    roles::display_name(&member)
                ))]
            }
            Err(e) => {
                warn!(user_id = target, error = %e, "role edit failed");
                Vec::new()
            }
        }
    }
}

/// Nick-or-username for the message author, from the partial member that
/// guild messages already carry.
fn author_display_name(msg: &Message) -> String {
    msg.member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .unwrap_or_else(|| msg.author.name.clone())
}

fn needs_roles(cmd: &Command) -> bool {
    matches!(
        cmd,
        Command::OverrideUsage
            | Command::OverrideClockIn(_)
            | Command::OverrideClockOut(_)
            | Command::Report
            | Command::SingleReport(_)
            | Command::Void { .. }
            | Command::Admin
            | Command::AddAdmin(_)
            | Command::RemoveAdmin(_)
            | Command::EmployeeDelete(_)
    )
}
