#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player agent that turns pointer presses into moves and shots.

use chess_with_guns_core::{AgentContext, Command, PlayerAgent, PointerInput};

/// Human-controlled agent driven by the pointer.
///
/// A press over a legal destination moves the piece there. Any other press
/// fires toward the pointer.
#[derive(Debug, Default)]
pub struct PointerControl;

impl PointerControl {
    /// Creates a new pointer-driven agent.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PlayerAgent for PointerControl {
    fn act(&mut self, context: &AgentContext<'_>, pointer: &mut PointerInput, out: &mut Vec<Command>) {
        let Some(position) = pointer.position() else {
            return;
        };
        if !pointer.take_press() {
            return;
        }

        let player = context.player.id;
        let hovered = context
            .occupancy
            .size()
            .cell_containing(position, context.cell_length);
        if let Some(cell) = hovered {
            if let Some((offset, _)) = context
                .destinations()
                .find(|(_, destination)| *destination == cell)
            {
                out.push(Command::MovePiece { player, offset });
                return;
            }
        }

        let origin = context.player.cell.center(context.cell_length);
        out.push(Command::Discharge {
            player,
            heading: origin.heading_to(position),
        });
    }
}
