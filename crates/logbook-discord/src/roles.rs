//! Guild member and role lookups.
//!
//! Cache-first with HTTP fallback: the member cache is only as complete as
//! the gateway has made it, so anything user-facing falls back to a REST
//! fetch before giving up.

use serenity::model::guild::Member;
use serenity::model::id::{GuildId, RoleId, UserId};
use serenity::prelude::Context;
use tracing::warn;

use crate::error::DiscordError;

/// Display name used in every reply: nickname when set, username otherwise.
pub fn display_name(member: &Member) -> String {
    member
        .nick
        .clone()
        .unwrap_or_else(|| member.user.name.clone())
}

/// Fetch a member, cache first.
pub async fn get_member(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<Member, DiscordError> {
    {
        if let Some(guild) = ctx.cache.guild(guild_id) {
            if let Some(member) = guild.members.get(&user_id) {
                return Ok(member.clone());
            }
        }
    }
    Ok(ctx.http.get_member(guild_id, user_id).await?)
}

/// Display name for a user, falling back to a mention when the member
/// cannot be fetched (left the guild, say).
pub async fn display_name_or_mention(ctx: &Context, guild_id: GuildId, user_id: u64) -> String {
    match get_member(ctx, guild_id, UserId::new(user_id)).await {
        Ok(member) => display_name(&member),
        Err(e) => {
            warn!(user_id, error = %e, "member lookup failed, using mention");
            format!("<@{}>", user_id)
        }
    }
}

/// Role names held by the author of a message. Empty outside guilds or when
/// nothing can be resolved, which fails every role gate closed.
pub async fn author_role_names(
    ctx: &Context,
    msg: &serenity::model::channel::Message,
) -> Vec<String> {
    let Some(guild_id) = msg.guild_id else {
        return Vec::new();
    };

    // Guild messages carry the author's role ids already.
    let role_ids: Vec<RoleId> = match &msg.member {
        Some(partial) => partial.roles.clone(),
        None => match get_member(ctx, guild_id, msg.author.id).await {
            Ok(member) => member.roles,
            Err(e) => {
                warn!(user_id = msg.author.id.get(), error = %e, "author lookup failed");
                return Vec::new();
            }
        },
    };

    resolve_role_names(ctx, guild_id, &role_ids).await
}

/// Map role ids to names via the cached guild, or a REST guild fetch.
async fn resolve_role_names(ctx: &Context, guild_id: GuildId, role_ids: &[RoleId]) -> Vec<String> {
    {
        if let Some(guild) = ctx.cache.guild(guild_id) {
            return role_ids
                .iter()
                .filter_map(|id| guild.roles.get(id).map(|r| r.name.clone()))
                .collect();
        }
    }
    match ctx.http.get_guild(guild_id).await {
        Ok(guild) => role_ids
            .iter()
            .filter_map(|id| guild.roles.get(id).map(|r| r.name.clone()))
            .collect(),
        Err(e) => {
            warn!(error = %e, "guild fetch failed while resolving roles");
            Vec::new()
        }
    }
}

/// Find a role id by exact name.
pub async fn role_id_by_name(
    ctx: &Context,
    guild_id: GuildId,
    name: &str,
) -> Result<RoleId, DiscordError> {
    {
        if let Some(guild) = ctx.cache.guild(guild_id) {
            if let Some(role) = guild.role_by_name(name) {
                return Ok(role.id);
            }
        }
    }
    let guild = ctx.http.get_guild(guild_id).await?;
    guild
        .role_by_name(name)
        .map(|r| r.id)
        .ok_or_else(|| DiscordError::RoleNotFound {
            name: name.to_string(),
        })
}

/// Display names of every guild member holding the named role.
pub async fn members_with_role(ctx: &Context, guild_id: GuildId, role_name: &str) -> Vec<String> {
    let role_id = match role_id_by_name(ctx, guild_id, role_name).await {
        Ok(id) => id,
        Err(e) => {
            warn!(role_name, error = %e, "role lookup failed");
            return Vec::new();
        }
    };

    let cached: Option<Vec<String>> = ctx.cache.guild(guild_id).map(|guild| {
        guild
            .members
            .values()
            .filter(|m| m.roles.contains(&role_id))
            .map(display_name)
            .collect()
    });
    if let Some(names) = cached {
        if !names.is_empty() {
            return names;
        }
    }

    // Cold cache: pull one page of members over REST.
    match guild_id.members(&ctx.http, None, None).await {
        Ok(members) => members
            .iter()
            .filter(|m| m.roles.contains(&role_id))
            .map(display_name)
            .collect(),
        Err(e) => {
            warn!(error = %e, "member list fetch failed");
            Vec::new()
        }
    }
}
