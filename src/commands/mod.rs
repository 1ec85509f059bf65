//! Chat commands.
//!
//! - [`registry`]: names and aliases to descriptors
//! - [`context`]: what handlers receive and return
//! - [`dispatch`]: from message text to reply and follow-up action
//! - [`handlers`]: the commands themselves

mod context;
mod dispatch;
pub mod handlers;
mod registry;

pub use context::{
    ActionRequest, CommandReply, Context, Handler, HandlerResult, Invocation, Services,
};
pub use dispatch::{DispatchOutcome, Dispatcher, RoutedAction, parse_command_line};
pub use registry::{AliasRegistry, CommandDescriptor, build_registry};
