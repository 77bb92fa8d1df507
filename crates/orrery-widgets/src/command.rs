//! Deferred registry mutations from other threads.
//!
//! [`WidgetSubsystem`](crate::WidgetSubsystem) is only ever mutated from the
//! frame loop. Code running elsewhere (async loads on a task pool, input
//! callbacks holding no `&mut` to the subsystem, a widget reacting inside its
//! own callback) sends [`WidgetCommand`]s through a [`WidgetCommands`] handle.
//! They are applied, in send order, at the start of the next
//! [`begin_frame`](crate::WidgetSubsystem::begin_frame) or on an explicit
//! [`apply_pending_commands`](crate::WidgetSubsystem::apply_pending_commands).

use std::sync::mpsc::Sender;

use crate::owner::OwnerKey;
use crate::widget::{Widget, WidgetRef};

/// A registry mutation waiting to be applied on the frame thread.
pub enum WidgetCommand {
    Add {
        widget: WidgetRef,
        z_order: i32,
    },
    AddToEntity {
        widget: WidgetRef,
        owner: OwnerKey,
        z_order: i32,
    },
    Remove(WidgetRef),
    RemoveAllFromEntity(OwnerKey),
    SetZOrder {
        widget: WidgetRef,
        z_order: i32,
    },
    SetViewport(WidgetRef),
}

fn widget_name(widget: &WidgetRef) -> String {
    // The widget may be write-locked by its own callback while the command is logged.
    match widget.try_read() {
        Some(guard) => guard.name().to_string(),
        None => "<locked>".to_string(),
    }
}

impl std::fmt::Debug for WidgetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetCommand::Add { widget, z_order } => f
                .debug_struct("Add")
                .field("widget", &widget_name(widget))
                .field("z_order", z_order)
                .finish(),
            WidgetCommand::AddToEntity {
                widget,
                owner,
                z_order,
            } => f
                .debug_struct("AddToEntity")
                .field("widget", &widget_name(widget))
                .field("owner", owner)
                .field("z_order", z_order)
                .finish(),
            WidgetCommand::Remove(widget) => {
                f.debug_tuple("Remove").field(&widget_name(widget)).finish()
            }
            WidgetCommand::RemoveAllFromEntity(owner) => {
                f.debug_tuple("RemoveAllFromEntity").field(owner).finish()
            }
            WidgetCommand::SetZOrder { widget, z_order } => f
                .debug_struct("SetZOrder")
                .field("widget", &widget_name(widget))
                .field("z_order", z_order)
                .finish(),
            WidgetCommand::SetViewport(widget) => f
                .debug_tuple("SetViewport")
                .field(&widget_name(widget))
                .finish(),
        }
    }
}

/// Cloneable, thread-safe producer of [`WidgetCommand`]s.
///
/// Obtained from [`WidgetSubsystem::commands`](crate::WidgetSubsystem::commands).
/// Sending after the subsystem is gone silently drops the command.
#[derive(Clone)]
pub struct WidgetCommands {
    sender: Sender<WidgetCommand>,
}

impl WidgetCommands {
    pub(crate) fn new(sender: Sender<WidgetCommand>) -> Self {
        Self { sender }
    }

    pub fn send(&self, command: WidgetCommand) {
        if self.sender.send(command).is_err() {
            tracing::trace!("widget subsystem dropped; discarding command");
        }
    }

    pub fn add_widget(&self, widget: WidgetRef, z_order: i32) {
        self.send(WidgetCommand::Add { widget, z_order });
    }

    pub fn add_widget_to_entity(&self, widget: WidgetRef, owner: OwnerKey, z_order: i32) {
        self.send(WidgetCommand::AddToEntity {
            widget,
            owner,
            z_order,
        });
    }

    pub fn remove_widget(&self, widget: WidgetRef) {
        self.send(WidgetCommand::Remove(widget));
    }

    pub fn remove_all_widgets_from_entity(&self, owner: OwnerKey) {
        self.send(WidgetCommand::RemoveAllFromEntity(owner));
    }

    pub fn set_widget_z_order(&self, widget: WidgetRef, z_order: i32) {
        self.send(WidgetCommand::SetZOrder { widget, z_order });
    }

    pub fn set_viewport_widget(&self, widget: WidgetRef) {
        self.send(WidgetCommand::SetViewport(widget));
    }
}

impl std::fmt::Debug for WidgetCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetCommands").finish_non_exhaustive()
    }
}
