//! Puzzle render passes (main board and next-piece preview)

use super::Surface;
use crate::consts::{BLOCK_SIZE, BOARD_COLS, BOARD_ROWS, PREVIEW_BLOCK_SIZE};
use crate::sim::{Color, PuzzleState, Shape};

pub const BACKGROUND: Color = Color::BLACK;
pub const GRID_COLOR: Color = Color::hex(0x333333);

/// Cells are drawn one pixel short so the grid shows between them
const CELL_GAP: f32 = 1.0;
const GRID_LINE_WIDTH: f32 = 1.0;

pub fn render_puzzle(state: &PuzzleState, surface: &mut dyn Surface) {
    surface.clear(BACKGROUND);

    for (y, row) in state.board.rows().iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if let Some(color) = cell {
                draw_block(surface, x as f32, y as f32, *color);
            }
        }
    }

    if let Some(piece) = &state.current {
        for (x, y) in piece.cells() {
            draw_block(surface, x as f32, y as f32, piece.color);
        }
    }

    draw_grid(surface);
}

fn draw_block(surface: &mut dyn Surface, x: f32, y: f32, color: Color) {
    surface.fill_rect(
        x * BLOCK_SIZE,
        y * BLOCK_SIZE,
        BLOCK_SIZE - CELL_GAP,
        BLOCK_SIZE - CELL_GAP,
        color,
    );
}

/// Grid lines centered on every block boundary, spanning the whole surface
fn draw_grid(surface: &mut dyn Surface) {
    let size = surface.size();
    let half = GRID_LINE_WIDTH / 2.0;

    for x in 0..=BOARD_COLS {
        let px = x as f32 * BLOCK_SIZE - half;
        surface.fill_rect(px, 0.0, GRID_LINE_WIDTH, size.y, GRID_COLOR);
    }
    for y in 0..=BOARD_ROWS {
        let py = y as f32 * BLOCK_SIZE - half;
        surface.fill_rect(0.0, py, size.x, GRID_LINE_WIDTH, GRID_COLOR);
    }
}

/// Draw the upcoming piece centered on the preview surface. The preview is
/// cleared to transparent; with no next piece it stays empty.
pub fn render_next_piece(state: &PuzzleState, surface: &mut dyn Surface) {
    surface.clear(Color::BLACK.with_alpha(0.0));

    let Some(kind) = state.next else {
        return;
    };
    let shape = kind.shape();
    let origin = preview_origin(&shape, surface.size().x, surface.size().y);
    let color = kind.color();

    for (col, row) in shape.occupied() {
        surface.fill_rect(
            origin.0 + col as f32 * PREVIEW_BLOCK_SIZE,
            origin.1 + row as f32 * PREVIEW_BLOCK_SIZE,
            PREVIEW_BLOCK_SIZE - CELL_GAP,
            PREVIEW_BLOCK_SIZE - CELL_GAP,
            color,
        );
    }
}

fn preview_origin(shape: &Shape, width: f32, height: f32) -> (f32, f32) {
    (
        (width - shape.cols() as f32 * PREVIEW_BLOCK_SIZE) / 2.0,
        (height - shape.rows() as f32 * PREVIEW_BLOCK_SIZE) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::TetrominoKind;

    fn board_surface() -> DrawList {
        DrawList::new(
            BOARD_COLS as f32 * BLOCK_SIZE,
            BOARD_ROWS as f32 * BLOCK_SIZE,
        )
    }

    fn fill_rects(list: &DrawList, color: Color) -> Vec<(f32, f32, f32, f32)> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { x, y, w, h, color: c } if *c == color => {
                    Some((*x, *y, *w, *h))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_line_count() {
        let state = PuzzleState::new(1);
        let mut list = board_surface();

        render_puzzle(&state, &mut list);

        assert_eq!(list.commands()[0], DrawCommand::Clear { color: BACKGROUND });
        assert_eq!(list.count_color(GRID_COLOR), (BOARD_COLS + 1) + (BOARD_ROWS + 1));
    }

    #[test]
    fn test_grid_drawn_last() {
        let mut state = PuzzleState::new(1);
        state.start();
        let mut list = board_surface();

        render_puzzle(&state, &mut list);

        let grid = list.count_color(GRID_COLOR);
        let tail = &list.commands()[list.commands().len() - grid..];
        assert!(tail.iter().all(|c| matches!(
            c,
            DrawCommand::FillRect { color, .. } if *color == GRID_COLOR
        )));
    }

    #[test]
    fn test_locked_cell_drawn_29px() {
        let mut state = PuzzleState::new(1);
        let red = Color::hex(0xff0000);
        state.board.set(2, 19, Some(red));
        let mut list = board_surface();

        render_puzzle(&state, &mut list);

        assert_eq!(fill_rects(&list, red), vec![(60.0, 570.0, 29.0, 29.0)]);
    }

    #[test]
    fn test_current_piece_drawn() {
        let mut state = PuzzleState::new(5);
        state.start();
        let piece = state.current.clone().expect("piece after start");
        let mut list = board_surface();

        render_puzzle(&state, &mut list);

        assert_eq!(fill_rects(&list, piece.color).len(), 4);
    }

    #[test]
    fn test_preview_centered() {
        let mut state = PuzzleState::new(1);
        state.next = Some(TetrominoKind::I);
        let mut list = DrawList::new(100.0, 100.0);

        render_next_piece(&state, &mut list);

        // 4x1 blocks of 15px centered in 100x100
        let rects = fill_rects(&list, TetrominoKind::I.color());
        assert_eq!(
            rects,
            vec![
                (20.0, 42.5, 14.0, 14.0),
                (35.0, 42.5, 14.0, 14.0),
                (50.0, 42.5, 14.0, 14.0),
                (65.0, 42.5, 14.0, 14.0),
            ]
        );
    }

    #[test]
    fn test_preview_empty_without_next() {
        let state = PuzzleState::new(1);
        let mut list = DrawList::new(100.0, 100.0);

        render_next_piece(&state, &mut list);

        assert_eq!(list.commands().len(), 1);
    }
}
