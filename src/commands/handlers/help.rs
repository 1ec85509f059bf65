use crate::commands::{CommandReply, Context, Handler, HandlerResult};
use crate::render::{Embed, colour};
use async_trait::async_trait;

/// Lists every registered command with its description and aliases.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        let embed = ctx
            .registry
            .iter()
            .fold(Embed::new("Help", "", colour::HELP), |embed, command| {
                embed.field(
                    command.name(),
                    format!(
                        "{}\n**Aliases:** {}\n--",
                        command.description(),
                        command.aliases().join(", ")
                    ),
                )
            });
        Ok(CommandReply::embed(embed))
    }
}
