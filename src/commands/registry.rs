//! Command table: canonical names and aliases.

use super::context::{Context, Handler, HandlerResult};
use super::handlers;
use crate::config::Config;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A registered command.
pub struct CommandDescriptor {
    name: String,
    aliases: Vec<String>,
    description: String,
    handler: Box<dyn Handler>,
}

impl CommandDescriptor {
    pub fn new(
        name: impl Into<String>,
        aliases: Vec<String>,
        description: impl Into<String>,
        handler: Box<dyn Handler>,
    ) -> Self {
        Self {
            name: name.into(),
            aliases,
            description: description.into(),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub async fn run(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        self.handler.handle(ctx, args).await
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Maps command tokens to descriptors.
///
/// Every alias points at exactly one registered name, and no token is both a
/// name and an alias. Built once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    descriptors: Vec<CommandDescriptor>,
    names: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Nothing is inserted when any of its tokens collide.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name.as_str();
        if self.names.contains_key(name) || self.aliases.contains_key(name) {
            return Err(RegistryError::DuplicateCommand(name.to_string()));
        }

        for alias in &descriptor.aliases {
            let owner = if alias == name {
                Some(name)
            } else if let Some(&idx) = self.names.get(alias).or_else(|| self.aliases.get(alias)) {
                Some(self.descriptors[idx].name.as_str())
            } else {
                None
            };
            if let Some(owner) = owner {
                return Err(RegistryError::DuplicateAlias {
                    alias: alias.clone(),
                    command: name.to_string(),
                    owner: owner.to_string(),
                });
            }
        }

        let idx = self.descriptors.len();
        self.names.insert(descriptor.name.clone(), idx);
        for alias in &descriptor.aliases {
            self.aliases.insert(alias.clone(), idx);
        }
        debug!(command = %descriptor.name, aliases = ?descriptor.aliases, "registered command");
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Look up a token: names first, then aliases. Case-sensitive.
    pub fn resolve(&self, token: &str) -> Option<&CommandDescriptor> {
        self.names
            .get(token)
            .or_else(|| self.aliases.get(token))
            .map(|&idx| &self.descriptors[idx])
    }

    /// Commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Register every command named in the config.
pub fn build_registry(config: &Config) -> Result<AliasRegistry, RegistryError> {
    let mut registry = AliasRegistry::new();
    for (name, command) in &config.commands {
        let handler =
            handlers::lookup(name).ok_or_else(|| RegistryError::UnknownHandler(name.clone()))?;
        registry.register(CommandDescriptor::new(
            name.clone(),
            command.aliases.clone(),
            command.description.clone(),
            handler,
        ))?;
    }
    Ok(registry)
}
