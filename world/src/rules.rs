//! Chess-like movement evaluation against the occupancy board.

use chess_with_guns_core::{CellCoord, CellOffset, MoveTemplate, OccupancyView, Occupant, PieceKind};

/// Enumerates every legal offset for `piece` standing on `origin`.
///
/// Steps are legal when they land on an empty cell or a pickup. Rays extend
/// one cell at a time: empty cells are included and the sweep continues, a
/// pickup is included and ends the sweep, while the board edge or any other
/// occupant ends it without being included. Offsets come out in template
/// declaration order, then in ray-walk order.
#[must_use]
pub fn legal_moves(piece: PieceKind, origin: CellCoord, board: OccupancyView<'_>) -> Vec<CellOffset> {
    let mut moves = Vec::new();
    for template in piece.move_templates() {
        match *template {
            MoveTemplate::Step(offset) => {
                if let Some(occupant) = occupant_at(board, origin, offset) {
                    if occupant.is_enterable() {
                        moves.push(offset);
                    }
                }
            }
            MoveTemplate::Ray(direction) => sweep(board, origin, direction, &mut moves),
        }
    }
    moves
}

fn sweep(board: OccupancyView<'_>, origin: CellCoord, direction: CellOffset, out: &mut Vec<CellOffset>) {
    let mut distance = 1;
    loop {
        let offset = direction.scaled(distance);
        match occupant_at(board, origin, offset) {
            Some(Occupant::Empty) => out.push(offset),
            Some(Occupant::Pickup(_)) => {
                out.push(offset);
                return;
            }
            Some(Occupant::Piece(_)) | None => return,
        }
        distance += 1;
    }
}

fn occupant_at(board: OccupancyView<'_>, origin: CellCoord, offset: CellOffset) -> Option<Occupant> {
    board.occupant_at(
        i64::from(origin.column()) + i64::from(offset.dx()),
        i64::from(origin.row()) + i64::from(offset.dy()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;
    use chess_with_guns_core::{BoardSize, PickupKind, PieceColor, PieceRole};

    fn piece(role: PieceRole) -> PieceKind {
        PieceKind::new(PieceColor::White, role)
    }

    #[test]
    fn knight_in_corner_keeps_declaration_order() {
        let grid = Grid::new(BoardSize::new(6, 6));
        let moves = legal_moves(piece(PieceRole::Knight), CellCoord::new(0, 0), grid.view());
        assert_eq!(moves, vec![CellOffset::new(1, 2), CellOffset::new(2, 1)]);
    }

    #[test]
    fn rook_ray_stops_before_blocking_piece() {
        let mut grid = Grid::new(BoardSize::new(6, 6));
        let blocker = PieceKind::new(PieceColor::Black, PieceRole::Pawn);
        grid.set(CellCoord::new(3, 0), Occupant::Piece(blocker));

        let moves = legal_moves(piece(PieceRole::Rook), CellCoord::new(0, 0), grid.view());

        assert_eq!(
            moves,
            vec![
                CellOffset::new(0, 1),
                CellOffset::new(0, 2),
                CellOffset::new(0, 3),
                CellOffset::new(0, 4),
                CellOffset::new(0, 5),
                CellOffset::new(1, 0),
                CellOffset::new(2, 0),
            ]
        );
    }

    #[test]
    fn bishop_ray_ends_on_pickup() {
        let mut grid = Grid::new(BoardSize::new(6, 6));
        grid.set(CellCoord::new(4, 4), Occupant::Pickup(PickupKind::Health));

        let moves = legal_moves(piece(PieceRole::Bishop), CellCoord::new(2, 2), grid.view());

        let down_right: Vec<_> = moves
            .iter()
            .copied()
            .filter(|offset| offset.dx() > 0 && offset.dy() > 0)
            .collect();
        assert_eq!(down_right, vec![CellOffset::new(1, 1), CellOffset::new(2, 2)]);
    }

    #[test]
    fn pawn_step_onto_pickup_is_legal_but_onto_piece_is_not() {
        let mut grid = Grid::new(BoardSize::new(6, 6));
        let pawn = piece(PieceRole::Pawn);

        grid.set(CellCoord::new(2, 2), Occupant::Pickup(PickupKind::Ammo));
        assert_eq!(
            legal_moves(pawn, CellCoord::new(2, 3), grid.view()),
            vec![CellOffset::new(0, -1)]
        );

        grid.set(CellCoord::new(2, 2), Occupant::Piece(piece(PieceRole::King)));
        assert!(legal_moves(pawn, CellCoord::new(2, 3), grid.view()).is_empty());
    }

    #[test]
    fn pawn_on_far_edge_has_no_moves() {
        let grid = Grid::new(BoardSize::new(6, 6));
        assert!(legal_moves(piece(PieceRole::Pawn), CellCoord::new(3, 0), grid.view()).is_empty());
    }

    #[test]
    fn queen_in_centre_of_empty_board_reaches_every_line() {
        let grid = Grid::new(BoardSize::new(6, 6));
        let moves = legal_moves(piece(PieceRole::Queen), CellCoord::new(2, 2), grid.view());
        // 3 down, 3 down-right, 3 right, 2 up-right, 2 up, 2 up-left, 2 left, 2 down-left
        assert_eq!(moves.len(), 19);
        assert_eq!(moves[0], CellOffset::new(0, 1));
    }
}
