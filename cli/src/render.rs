use std::fmt;
use sweeper_core::{BoardSnapshot, CellView};
use sweeper_session::GameEntry;

pub const fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Questioned => '?',
        CellView::Revealed(0) => ' ',
        CellView::Revealed(n) => (b'0' + n) as char,
        CellView::Mine => '*',
        CellView::Exploded => 'X',
        CellView::WrongFlag => '!',
    }
}

/// Plain-text board with row and column numbers, followed by the status line.
pub struct BoardView<'a>(pub &'a BoardSnapshot);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let width = snapshot.size.max(1).to_string().len();

        write!(f, "{:width$} ", "")?;
        for col in 0..snapshot.size {
            write!(f, " {col:>width$}")?;
        }
        writeln!(f)?;

        for (row, cells) in snapshot.rows().enumerate() {
            write!(f, "{row:>width$} ")?;
            for cell in cells {
                let view = cell.view(snapshot.outcome, snapshot.triggered_mine);
                write!(f, " {:>width$}", glyph(view))?;
            }
            writeln!(f)?;
        }

        write!(
            f,
            "mines: {}  flags: {}",
            snapshot.mine_count,
            snapshot.flag_count()
        )?;
        if !snapshot.message.is_empty() {
            write!(f, "\n{}", snapshot.message)?;
        }
        Ok(())
    }
}

pub struct GameList<'a>(pub &'a [GameEntry]);

impl fmt::Display for GameList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no saved games");
        }
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let record = &entry.record;
            write!(
                f,
                "{:>4}  {:<10}  {}  {:<20}  {}",
                record.id,
                record.status,
                record.modified_at.format("%Y-%m-%d %H:%M"),
                entry.owner_name,
                record.display_name
            )?;
        }
        Ok(())
    }
}
